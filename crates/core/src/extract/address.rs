//! Japanese address extraction with a US street-address fallback.

use serde::Serialize;

use super::pattern::{Capture, PatternSet};
use crate::config::KnownBuilding;
use crate::error::Error;
use crate::text::{has_cjk, normalize};

/// Returned as the address when Japanese text was found but nothing more specific resolved.
pub const AMBIGUOUS_SENTINEL: &str = "東京都";

const TOKYO_WARDS: &str = "台東区|江戸川区|豊島区|渋谷区|新宿区|千代田区|中央区|港区|文京区|墨田区|目黒区|大田区|世田谷区|中野区|杉並区|荒川区|北区|板橋区|練馬区|足立区|葛飾区|江東区|品川区";

const PREFECTURE: &str = r"(?:東京都|大阪府|京都府|北海道|[^\s]{2,3}県)";

/// Outcome of a Japanese address extraction.
///
/// `Ambiguous` and `NoSignal` are kept apart on purpose: the first means the text is Japanese
/// but no address resolved, the second means the text is not a Japanese listing at all and a
/// non-Japanese extractor should be tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "address", rename_all = "snake_case")]
pub enum AddressOutcome {
    Resolved(String),
    Ambiguous(String),
    NoSignal,
}

impl AddressOutcome {
    /// The address, only when it actually resolved.
    pub fn resolved(&self) -> Option<&str> {
        match self {
            AddressOutcome::Resolved(address) => Some(address),
            _ => None,
        }
    }

    /// The best available address, including the low-confidence sentinel.
    pub fn candidate(&self) -> Option<&str> {
        match self {
            AddressOutcome::Resolved(address) | AddressOutcome::Ambiguous(address) => {
                Some(address)
            }
            AddressOutcome::NoSignal => None,
        }
    }

    /// Whether the text carried Japanese evidence.
    pub fn is_japanese(&self) -> bool {
        !matches!(self, AddressOutcome::NoSignal)
    }
}

pub struct AddressExtractor {
    known_buildings: Vec<KnownBuilding>,
    patterns: PatternSet,
    foreign: PatternSet,
}

impl AddressExtractor {
    pub fn new(known_buildings: Vec<KnownBuilding>) -> Result<Self, Error> {
        let ward_pattern = format!(r"({TOKYO_WARDS})([^\s,、。:：]+)");
        let general_pattern =
            format!(r"{PREFECTURE}[^\s]{{2,3}}(?:市|区|町|村)[^\s]{{2,4}}(?:\d+-\d+-\d+|\d+-\d+|\d+)");
        let transit_pattern = format!(
            r"(?:JR山手線|東京メトロ)[\s\S]*?({PREFECTURE}[^\s]{{2,3}}(?:市|区|町|村)[^\s]{{2,4}})"
        );

        let patterns = PatternSet::compile(
            "address",
            &[
                (r"所在地[\s\S]*?[：:]\s*([^\n]+)", Capture::Group(1)),
                (r"物件概要[\s\S]*?住所表示[：:]\s*([^\n]+)", Capture::Group(1)),
                (r"住[居宅]表示[\s\S]*?[：:]\s*([^\n]+)", Capture::Group(1)),
                (
                    r"所在地\s*[^：:]*東京都([^\n\r]+)",
                    Capture::Prefixed {
                        prefix: "東京都",
                        group: 1,
                    },
                ),
                (ward_pattern.as_str(), Capture::WardPrefixed { ward: 1, rest: 2 }),
                (general_pattern.as_str(), Capture::Whole),
                (transit_pattern.as_str(), Capture::Group(1)),
                (
                    r"豊島区駒込[0-9\-]+",
                    Capture::Prefixed {
                        prefix: "東京都",
                        group: 0,
                    },
                ),
                (r"東京都[^\s]{3,20}", Capture::Whole),
                (
                    r"([^\s]{2,3}区)",
                    Capture::Prefixed {
                        prefix: "東京都",
                        group: 1,
                    },
                ),
                (r"(東京都[\s\S]{2,30}区[\s\S]{2,20}[0-9\-]+)", Capture::Group(1)),
            ],
        )?;

        // Single line only.
        let street = r"\d+[ \t]+[\w \t]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Place|Pl|Terrace|Ter|Way)";
        let with_zip = format!(r"(?i)({street},[ \t]+[\w \t]+,[ \t]+[A-Z]{{2}}[ \t]+\d{{5}})");
        let with_state = format!(r"(?i)({street},[ \t]+[\w \t]+,[ \t]+[A-Z]{{2}})");
        let street_only = format!(r"(?i)({street})");
        let foreign = PatternSet::compile(
            "foreign address",
            &[
                (with_zip.as_str(), Capture::Group(1)),
                (with_state.as_str(), Capture::Group(1)),
                (street_only.as_str(), Capture::Group(1)),
            ],
        )?;

        Ok(Self {
            known_buildings,
            patterns,
            foreign,
        })
    }

    /// Extract a Japanese address.
    ///
    /// Order: no CJK text means `NoSignal`; a known building resolves to its canonical
    /// address; then the structural patterns in priority order; finally `Ambiguous`.
    pub fn extract(&self, text: &str) -> AddressOutcome {
        if !has_cjk(text) {
            log::debug!("address: no CJK characters, not a Japanese listing");
            return AddressOutcome::NoSignal;
        }

        let text = normalize(text);

        if let Some(building) = self.known_buildings.iter().find(|b| b.matches(&text)) {
            log::debug!("address: known building {}", building.name);
            return AddressOutcome::Resolved(building.address.clone());
        }

        match self.patterns.first_match(&text) {
            Some(address) => AddressOutcome::Resolved(address),
            None => {
                log::debug!("address: Japanese text without a resolvable address");
                AddressOutcome::Ambiguous(AMBIGUOUS_SENTINEL.to_string())
            }
        }
    }

    /// Extract a US-style street address.
    pub fn extract_foreign(&self, text: &str) -> Option<String> {
        self.foreign.first_match(&normalize(text))
    }
}
