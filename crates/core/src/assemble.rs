//! Turning a [`PropertySegment`] into a [`NormalizedProperty`].

use serde::{Deserialize, Serialize};

use crate::config::AssemblyDefaults;
use crate::extract::{canonicalize_layout, rooms_from_layout};
use crate::geocode::Coordinates;
use crate::segment::PropertySegment;
use crate::units::{
    meters_to_sqft, meters_to_tsubo, parse_area_string, parse_man_yen_price_tagged,
    parse_tsubo_string, round2, tsubo_to_meters, Defaulted,
};

/// One listing, ready for display, geocoding and export.
///
/// Serialized field names follow the listing export format: `price` holds yen and `bedrooms`
/// holds the bedroom estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedProperty {
    pub id: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    pub area_meters: Option<f64>,
    pub area_tsubo: Option<f64>,
    pub sqft: Option<u64>,
    #[serde(rename = "price")]
    pub price_yen: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(rename = "bedrooms")]
    pub bedroom_estimate: u32,
    pub bathrooms: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_year: Option<String>,
    pub is_japanese: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Default for NormalizedProperty {
    fn default() -> Self {
        Self {
            id: String::new(),
            address: String::new(),
            property_name: None,
            floor: None,
            area_meters: None,
            area_tsubo: None,
            sqft: None,
            price_yen: 0,
            layout: None,
            bedroom_estimate: 0,
            bathrooms: 1,
            station: None,
            building_type: None,
            built_year: None,
            is_japanese: false,
            lat: None,
            lng: None,
        }
    }
}

impl NormalizedProperty {
    /// Coordinates, when both are set and not the `(0, 0)` placeholder.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                (lat != 0.0 || lng != 0.0).then(|| Coordinates::new(lat, lng))
            }
            _ => None,
        }
    }

    /// The record with its geocoding result written back.
    pub fn with_coordinates(self, coords: Coordinates) -> Self {
        Self {
            lat: Some(coords.lat),
            lng: Some(coords.lng),
            ..self
        }
    }

    /// Display name: the property name, else the address.
    pub fn display_name(&self) -> &str {
        self.property_name.as_deref().unwrap_or(&self.address)
    }
}

/// A property plus which of its numbers were substituted defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assembly {
    pub property: NormalizedProperty,
    pub price: Defaulted<u64>,
    pub area: Defaulted<f64>,
    pub bedrooms: Defaulted<u32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyAssembler {
    defaults: AssemblyDefaults,
}

impl PropertyAssembler {
    pub fn new(defaults: AssemblyDefaults) -> Self {
        Self { defaults }
    }

    pub fn assemble(&self, segment: &PropertySegment, id: impl Into<String>) -> NormalizedProperty {
        self.assemble_detailed(segment, id).property
    }

    pub fn assemble_detailed(&self, segment: &PropertySegment, id: impl Into<String>) -> Assembly {
        let price = match segment.price.as_deref() {
            Some(text) => parse_man_yen_price_tagged(text, self.defaults.price_yen),
            None => Defaulted::fallback(self.defaults.price_yen),
        };

        let size = segment.size.as_deref();
        let explicit_tsubo = size.and_then(parse_tsubo_string).filter(|t| *t > 0.0);
        let meters = size
            .and_then(parse_area_string)
            .filter(|m| *m > 0.0)
            .or_else(|| explicit_tsubo.map(|t| round2(tsubo_to_meters(t))));
        let area = Defaulted::from_option(meters, self.defaults.area_sqm);

        let area_tsubo = explicit_tsubo.unwrap_or_else(|| round2(meters_to_tsubo(area.value)));
        let sqft = meters_to_sqft(area.value).round() as u64;

        let layout = segment.layout.as_deref().map(canonicalize_layout);
        let bedrooms = match layout.as_deref().and_then(rooms_from_layout) {
            Some(rooms) => Defaulted::parsed(rooms),
            None => match meters {
                Some(m) => Defaulted::parsed(bedrooms_for_area(m)),
                None => Defaulted::fallback(self.defaults.bedrooms),
            },
        };

        if price.was_defaulted || area.was_defaulted {
            log::debug!(
                "assemble: {} uses defaults (price: {}, area: {})",
                segment.address,
                price.was_defaulted,
                area.was_defaulted
            );
        }

        let property = NormalizedProperty {
            id: id.into(),
            address: segment.address.clone(),
            property_name: segment.name.clone(),
            floor: segment.floor.clone(),
            area_meters: Some(area.value),
            area_tsubo: Some(area_tsubo),
            sqft: Some(sqft),
            price_yen: price.value,
            layout,
            bedroom_estimate: bedrooms.value,
            bathrooms: 1,
            station: segment.station.clone(),
            building_type: segment.building_type.clone(),
            built_year: segment.year.clone(),
            is_japanese: segment.is_japanese,
            lat: None,
            lng: None,
        };

        Assembly {
            property,
            price,
            area,
            bedrooms,
        }
    }
}

/// Bedroom estimate by floor area: under 30㎡ is one, under 60㎡ two, otherwise three.
pub fn bedrooms_for_area(meters: f64) -> u32 {
    if meters < 30.0 {
        1
    } else if meters < 60.0 {
        2
    } else {
        3
    }
}
