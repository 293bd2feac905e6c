//! Pure helpers for the geocoding collaborator.
//!
//! The core never geocodes by itself. The shell builds a query with [`search_query`], asks a
//! provider, runs [`correct_swap`] on the answer and writes it back once with
//! [`NormalizedProperty::with_coordinates`](crate::assemble::NormalizedProperty::with_coordinates).

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub const JAPAN_LAT: RangeInclusive<f64> = 30.0..=46.0;
pub const JAPAN_LNG: RangeInclusive<f64> = 129.0..=146.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn swapped(self) -> Self {
        Self {
            lat: self.lng,
            lng: self.lat,
        }
    }
}

const WARD_CENTROIDS: [(&str, Coordinates); 23] = [
    ("千代田区", Coordinates { lat: 35.6938, lng: 139.7534 }),
    ("中央区", Coordinates { lat: 35.6698, lng: 139.7727 }),
    ("港区", Coordinates { lat: 35.6586, lng: 139.7511 }),
    ("新宿区", Coordinates { lat: 35.6938, lng: 139.7034 }),
    ("文京区", Coordinates { lat: 35.7080, lng: 139.7520 }),
    ("台東区", Coordinates { lat: 35.7120, lng: 139.8107 }),
    ("墨田区", Coordinates { lat: 35.7083, lng: 139.8022 }),
    ("江東区", Coordinates { lat: 35.6693, lng: 139.8129 }),
    ("品川区", Coordinates { lat: 35.6092, lng: 139.7302 }),
    ("目黒区", Coordinates { lat: 35.6414, lng: 139.6981 }),
    ("大田区", Coordinates { lat: 35.5616, lng: 139.7168 }),
    ("世田谷区", Coordinates { lat: 35.6465, lng: 139.6533 }),
    ("渋谷区", Coordinates { lat: 35.6580, lng: 139.7016 }),
    ("中野区", Coordinates { lat: 35.7073, lng: 139.6638 }),
    ("杉並区", Coordinates { lat: 35.6991, lng: 139.6362 }),
    ("豊島区", Coordinates { lat: 35.7283, lng: 139.7190 }),
    ("北区", Coordinates { lat: 35.7552, lng: 139.7354 }),
    ("荒川区", Coordinates { lat: 35.7363, lng: 139.7829 }),
    ("板橋区", Coordinates { lat: 35.7618, lng: 139.7091 }),
    ("練馬区", Coordinates { lat: 35.7357, lng: 139.6512 }),
    ("足立区", Coordinates { lat: 35.7750, lng: 139.8049 }),
    ("葛飾区", Coordinates { lat: 35.7448, lng: 139.8469 }),
    ("江戸川区", Coordinates { lat: 35.7060, lng: 139.8680 }),
];

/// Query string for a geocoding provider. Appends `, Japan` unless the country is named.
pub fn search_query(address: &str) -> String {
    let address = address.trim();
    if address.contains("Japan") || address.contains("日本") {
        address.to_string()
    } else {
        format!("{address}, Japan")
    }
}

pub fn within_japan(coords: Coordinates) -> bool {
    JAPAN_LAT.contains(&coords.lat) && JAPAN_LNG.contains(&coords.lng)
}

/// Swap latitude and longitude when only the swapped pair lands in Japan.
pub fn correct_swap(coords: Coordinates) -> Coordinates {
    let swapped = coords.swapped();
    if !within_japan(coords) && within_japan(swapped) {
        log::debug!(
            "geocode: swapping ({}, {}) to ({}, {})",
            coords.lat,
            coords.lng,
            swapped.lat,
            swapped.lng
        );
        swapped
    } else {
        coords
    }
}

/// Approximate center of the first Tokyo special ward named in the address.
pub fn ward_centroid(address: &str) -> Option<Coordinates> {
    WARD_CENTROIDS
        .iter()
        .filter_map(|(ward, coords)| address.find(ward).map(|pos| (pos, ward.len(), *coords)))
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, _, coords)| coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKYO_STATION: Coordinates = Coordinates {
        lat: 35.6812,
        lng: 139.7671,
    };

    #[test]
    fn test_search_query_appends_japan() {
        assert_eq!(
            search_query("東京都豊島区駒込1-16-8"),
            "東京都豊島区駒込1-16-8, Japan"
        );
    }

    #[test]
    fn test_search_query_keeps_country() {
        assert_eq!(search_query("日本 東京都港区"), "日本 東京都港区");
        assert_eq!(search_query("Minato, Tokyo, Japan "), "Minato, Tokyo, Japan");
    }

    #[test]
    fn test_within_japan() {
        assert!(within_japan(TOKYO_STATION));
        assert!(!within_japan(Coordinates::new(139.7671, 35.6812)));
        assert!(!within_japan(Coordinates::new(40.7128, -74.0060)));
    }

    #[test]
    fn test_correct_swap_swaps_reversed_pair() {
        let corrected = correct_swap(Coordinates::new(139.7190, 35.7283));
        assert_eq!(corrected, Coordinates::new(35.7283, 139.7190));
    }

    #[test]
    fn test_correct_swap_keeps_valid_pair() {
        assert_eq!(correct_swap(TOKYO_STATION), TOKYO_STATION);
    }

    #[test]
    fn test_correct_swap_keeps_foreign_pair() {
        let new_york = Coordinates::new(40.7128, -74.0060);
        assert_eq!(correct_swap(new_york), new_york);
    }

    #[test]
    fn test_ward_centroid() {
        assert_eq!(
            ward_centroid("東京都豊島区駒込1-16-8"),
            Some(Coordinates::new(35.7283, 139.7190))
        );
        assert_eq!(
            ward_centroid("東京都江戸川区北小岩6丁目14-7"),
            Some(Coordinates::new(35.7060, 139.8680))
        );
        assert_eq!(
            ward_centroid("東京都北区田端1-2-3"),
            Some(Coordinates::new(35.7552, 139.7354))
        );
        assert_eq!(ward_centroid("埼玉県川口市本町4-1-8"), None);
    }

    #[test]
    fn test_every_ward_centroid_is_in_japan() {
        assert!(WARD_CENTROIDS.iter().all(|(_, c)| within_japan(*c)));
    }
}
