//! Field-level extraction from a single block of listing text.
//!
//! Every field owns an ordered [`PatternSet`]; labeled rules come first, generic structural rules
//! last, and the first non-empty match wins. Extraction never fails: a field is either present
//! or `None`. Defaults are applied later by the assembler.

mod address;
mod building;
mod layout;
mod name;
mod pattern;
mod price;
mod size;
mod station;
mod year;

use std::sync::OnceLock;

use serde::Serialize;

pub use address::{AddressExtractor, AddressOutcome, AMBIGUOUS_SENTINEL};
pub use layout::{canonicalize as canonicalize_layout, rooms_from_layout};
pub use pattern::{Capture, Pattern, PatternSet};
pub use year::construction_year;

use crate::config::{Config, KnownBuilding};
use crate::error::Error;
use crate::text::normalize;

/// Every field extracted from one listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    pub property_name: Option<String>,
    pub address: AddressOutcome,
    /// US street address, only looked for when the text has no Japanese signal.
    pub foreign_address: Option<String>,
    pub floor: Option<String>,
    pub size: Option<String>,
    pub tsubo: Option<String>,
    pub price: Option<String>,
    pub layout: Option<String>,
    pub station: Option<String>,
    pub building_type: Option<String>,
    pub year: Option<String>,
}

pub struct FieldExtractor {
    known_buildings: Vec<KnownBuilding>,
    address: AddressExtractor,
    name: PatternSet,
    floor: PatternSet,
    price: PatternSet,
    size: PatternSet,
    tsubo: PatternSet,
    layout: PatternSet,
    station: PatternSet,
    building_type: PatternSet,
    year: PatternSet,
}

impl FieldExtractor {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            known_buildings: config.known_buildings.clone(),
            address: AddressExtractor::new(config.known_buildings.clone())?,
            name: name::patterns()?,
            floor: name::floor_patterns()?,
            price: price::patterns()?,
            size: size::patterns()?,
            tsubo: size::tsubo_patterns()?,
            layout: layout::patterns()?,
            station: station::patterns()?,
            building_type: building::patterns()?,
            year: year::patterns()?,
        })
    }

    /// Extractor over the default configuration, compiled once.
    pub fn builtin() -> &'static FieldExtractor {
        static BUILTIN: OnceLock<FieldExtractor> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            FieldExtractor::new(&Config::default()).expect("built-in pattern tables compile")
        })
    }

    pub fn extract_address(&self, text: &str) -> AddressOutcome {
        self.address.extract(text)
    }

    pub fn extract_foreign_address(&self, text: &str) -> Option<String> {
        self.address.extract_foreign(text)
    }

    /// A labeled name line, else the canonical name of a recognized building.
    pub fn extract_property_name(&self, text: &str) -> Option<String> {
        let text = normalize(text);
        self.name.first_match(&text).or_else(|| {
            name::known_building_name(&self.known_buildings, &text).map(str::to_string)
        })
    }

    /// Floor as `N階`.
    pub fn extract_floor(&self, text: &str) -> Option<String> {
        self.floor.first_match(&normalize(text))
    }

    /// Price as written, e.g. `3,780万円`.
    pub fn extract_price(&self, text: &str) -> Option<String> {
        self.price.first_match(&normalize(text))
    }

    /// Floor area with its unit, e.g. `30.31㎡`.
    pub fn extract_size(&self, text: &str) -> Option<String> {
        self.size.first_match(&normalize(text))
    }

    /// Explicit tsubo figure without the unit, e.g. `9.16`.
    pub fn extract_tsubo(&self, text: &str) -> Option<String> {
        self.tsubo.first_match(&normalize(text))
    }

    /// Layout in canonical upper case, e.g. `2LDK`.
    pub fn extract_layout(&self, text: &str) -> Option<String> {
        self.layout
            .first_match(&normalize(text))
            .map(|layout| layout::canonicalize(&layout))
    }

    pub fn extract_station(&self, text: &str) -> Option<String> {
        self.station.first_match(&normalize(text))
    }

    pub fn extract_building_type(&self, text: &str) -> Option<String> {
        self.building_type.first_match(&normalize(text))
    }

    pub fn extract_year(&self, text: &str) -> Option<String> {
        self.year.first_match(&normalize(text))
    }

    /// Run every extractor over the same text.
    pub fn extract_all(&self, text: &str) -> ExtractedFields {
        let normalized = normalize(text);
        let address = self.extract_address(text);
        let foreign_address = match address {
            AddressOutcome::NoSignal => self.extract_foreign_address(&normalized),
            _ => None,
        };

        ExtractedFields {
            property_name: self.extract_property_name(&normalized),
            address,
            foreign_address,
            floor: self.extract_floor(&normalized),
            size: self.extract_size(&normalized),
            tsubo: self.extract_tsubo(&normalized),
            price: self.extract_price(&normalized),
            layout: self.extract_layout(&normalized),
            station: self.extract_station(&normalized),
            building_type: self.extract_building_type(&normalized),
            year: self.extract_year(&normalized),
        }
    }
}
