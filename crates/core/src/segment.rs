//! Splitting a multi-listing text blob into per-property segments.
//!
//! Three strategies run in order and the first one that accepts at least one segment wins:
//!
//! 1. [`SegmentStrategy::LabelSplit`]: split on `物件名:` and read labeled lines per chunk.
//! 2. [`SegmentStrategy::KeyValueLines`]: walk `key: value` lines, starting a new segment at
//!    every name key.
//! 3. [`SegmentStrategy::Blocks`]: split on blank lines, numbered headers and rules, keep blocks
//!    that mention both a price and an area, and run the field extractor on each.
//!
//! A segment without an address is always dropped.

use regex::Regex;
use serde::Serialize;

use crate::error::Error;
use crate::extract::{AddressOutcome, FieldExtractor};
use crate::text::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStrategy {
    LabelSplit,
    KeyValueLines,
    Blocks,
}

/// Raw, unprocessed field strings for one listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySegment {
    pub name: Option<String>,
    /// Never empty.
    pub address: String,
    pub floor: Option<String>,
    pub size: Option<String>,
    pub price: Option<String>,
    pub layout: Option<String>,
    pub station: Option<String>,
    pub building_type: Option<String>,
    pub year: Option<String>,
    /// Whether the segment came from a Japanese extraction path.
    pub is_japanese: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segmentation {
    /// The strategy that produced the segments, `None` when nothing was accepted.
    pub strategy: Option<SegmentStrategy>,
    pub segments: Vec<PropertySegment>,
}

/// Decoration allowed around a label key, e.g. `【価格】` or `■所在地`.
const BULLET_CHARS: &str = "・■●◆【】[]";

/// Regex class matching one of [`BULLET_CHARS`].
const BULLETS: &str = r"[・■●◆【】\[\]]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Name,
    Address,
    Floor,
    Size,
    Price,
    Layout,
    Station,
    BuildingType,
    Year,
}

impl Label {
    /// Labels read inside a `物件名:` chunk. The name is the chunk's first line.
    const FIELDS: [Label; 8] = [
        Label::Address,
        Label::Floor,
        Label::Size,
        Label::Price,
        Label::Layout,
        Label::Station,
        Label::BuildingType,
        Label::Year,
    ];

    fn keys(self) -> &'static [&'static str] {
        match self {
            Label::Name => &["物件名", "マンション名", "建物名"],
            Label::Address => &["住所", "所在地"],
            Label::Floor => &["階数", "所在階"],
            Label::Size => &["専有面積", "面積"],
            Label::Price => &["販売価格", "価格"],
            Label::Layout => &["間取り", "間取"],
            Label::Station => &["最寄り駅", "最寄駅", "交通"],
            Label::BuildingType => &["建物構造", "構造"],
            Label::Year => &["築年月", "竣工年月", "竣工年", "建築年"],
        }
    }

    fn from_key(key: &str) -> Option<Label> {
        let key = key
            .trim()
            .trim_matches(|c: char| BULLET_CHARS.contains(c))
            .trim();

        [Label::Name]
            .into_iter()
            .chain(Label::FIELDS)
            .find(|label| label.keys().contains(&key))
    }
}

/// A segment under construction. The first value seen for a field sticks.
#[derive(Debug, Default)]
struct Draft {
    name: Option<String>,
    address: Option<String>,
    floor: Option<String>,
    size: Option<String>,
    price: Option<String>,
    layout: Option<String>,
    station: Option<String>,
    building_type: Option<String>,
    year: Option<String>,
}

impl Draft {
    fn set(&mut self, label: Label, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        let slot = match label {
            Label::Name => &mut self.name,
            Label::Address => &mut self.address,
            Label::Floor => &mut self.floor,
            Label::Size => &mut self.size,
            Label::Price => &mut self.price,
            Label::Layout => &mut self.layout,
            Label::Station => &mut self.station,
            Label::BuildingType => &mut self.building_type,
            Label::Year => &mut self.year,
        };

        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    fn has_address(&self) -> bool {
        self.address.is_some()
    }

    fn finish(self, is_japanese: bool) -> Option<PropertySegment> {
        let address = self.address?;

        Some(PropertySegment {
            name: self.name,
            address,
            floor: self.floor,
            size: self.size,
            price: self.price,
            layout: self.layout,
            station: self.station,
            building_type: self.building_type,
            year: self.year,
            is_japanese,
        })
    }
}

pub struct ListingSegmenter {
    name_split: Regex,
    labels: Vec<(Label, Regex)>,
    header: Regex,
    rule: Regex,
    price_marker: Regex,
    area_marker: Regex,
}

impl ListingSegmenter {
    pub fn new() -> Result<Self, Error> {
        let labels = Label::FIELDS
            .into_iter()
            .map(|label| {
                let source = format!(
                    r"(?m)^[ \t]*{BULLETS}*[ \t]*(?:{})[ \t]*{BULLETS}*[ \t]*:[ \t]*([^\n]+)",
                    label.keys().join("|")
                );
                compile(&source).map(|re| (label, re))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name_split: compile(r"物件名[ \t]*:")?,
            labels,
            header: compile(r"^(?:物件情報\s*\d+|物件\s*\d+|No\.\s*\d+)")?,
            rule: compile(r"^(?:[━═─]{2,}|={3,}|-{3,})$")?,
            price_marker: compile(r"(?i)万|価格|\$|price")?,
            area_marker: compile(r"(?i)㎡|m²|m2|平米|坪|面積|sq\s*ft")?,
        })
    }

    /// Split `text` into property segments.
    pub fn segment(&self, text: &str, fields: &FieldExtractor) -> Segmentation {
        let text = normalize(text);

        let segments = self.split_on_name_label(&text);
        if !segments.is_empty() {
            return self.accepted(SegmentStrategy::LabelSplit, segments);
        }

        let segments = self.key_value_lines(&text);
        if !segments.is_empty() {
            return self.accepted(SegmentStrategy::KeyValueLines, segments);
        }

        let segments = self.blocks(&text, fields);
        if !segments.is_empty() {
            return self.accepted(SegmentStrategy::Blocks, segments);
        }

        log::debug!("segment: no strategy produced a segment with an address");
        Segmentation::default()
    }

    fn accepted(&self, strategy: SegmentStrategy, segments: Vec<PropertySegment>) -> Segmentation {
        log::debug!("segment: {:?} accepted {} segment(s)", strategy, segments.len());
        Segmentation {
            strategy: Some(strategy),
            segments,
        }
    }

    fn split_on_name_label(&self, text: &str) -> Vec<PropertySegment> {
        self.name_split
            .split(text)
            .skip(1)
            .filter_map(|chunk| {
                let mut draft = Draft::default();
                if let Some(first_line) = chunk.lines().next() {
                    draft.set(Label::Name, first_line);
                }
                for (label, re) in &self.labels {
                    if let Some(value) = re.captures(chunk).and_then(|caps| caps.get(1)) {
                        draft.set(*label, value.as_str());
                    }
                }
                draft.finish(true)
            })
            .collect()
    }

    fn key_value_lines(&self, text: &str) -> Vec<PropertySegment> {
        let mut segments = Vec::new();
        let mut current = Draft::default();

        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let Some(label) = Label::from_key(key) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }

            if label == Label::Name {
                let previous = std::mem::take(&mut current);
                if previous.has_address() {
                    segments.extend(previous.finish(true));
                }
            }

            current.set(label, value);
        }

        segments.extend(current.finish(true));
        segments
    }

    fn blocks(&self, text: &str, fields: &FieldExtractor) -> Vec<PropertySegment> {
        let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || self.rule.is_match(trimmed) {
                blocks.push(Vec::new());
            } else if self.header.is_match(trimmed) {
                blocks.push(vec![trimmed]);
            } else if let Some(block) = blocks.last_mut() {
                block.push(line);
            }
        }

        blocks
            .into_iter()
            .filter(|lines| !lines.is_empty())
            .map(|lines| lines.join("\n"))
            .filter(|block| self.price_marker.is_match(block) && self.area_marker.is_match(block))
            .filter_map(|block| self.single_listing(&block, fields))
            .collect()
    }

    /// Treat `text` as one listing and extract it field by field.
    ///
    /// Accepted only when the address resolves, either as a Japanese address or, for text
    /// without Japanese characters, as a US street address.
    pub fn single_listing(&self, text: &str, fields: &FieldExtractor) -> Option<PropertySegment> {
        let extracted = fields.extract_all(text);

        let (address, is_japanese) = match extracted.address {
            AddressOutcome::Resolved(address) => (address, true),
            AddressOutcome::NoSignal => (extracted.foreign_address?, false),
            AddressOutcome::Ambiguous(_) => {
                log::debug!("segment: dropping listing without a resolvable address");
                return None;
            }
        };

        let size = match (extracted.size, extracted.tsubo) {
            (Some(size), Some(tsubo)) if !size.contains('坪') => {
                Some(format!("{size} (約{tsubo}坪)"))
            }
            (Some(size), _) => Some(size),
            (None, Some(tsubo)) => Some(format!("約{tsubo}坪")),
            (None, None) => None,
        };

        Some(PropertySegment {
            name: extracted.property_name,
            address,
            floor: extracted.floor,
            size,
            price: extracted.price,
            layout: extracted.layout,
            station: extracted.station,
            building_type: extracted.building_type,
            year: extracted.year,
            is_japanese,
        })
    }
}

fn compile(source: &str) -> Result<Regex, Error> {
    Regex::new(source).map_err(|err| Error::Pattern {
        pattern: source.to_string(),
        source: err,
    })
}
