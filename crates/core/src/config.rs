use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Placeholder price used when a listing has no readable price (3,780万円).
pub const DEFAULT_PRICE_YEN: u64 = 37_800_000;

/// Placeholder floor area used when a listing has no readable size.
pub const DEFAULT_AREA_SQM: f64 = 40.0;

/// Bedroom count used when neither layout nor area gives a better estimate.
pub const DEFAULT_BEDROOMS: u32 = 2;

/// Extraction and assembly settings, loadable from TOML.
///
/// ```toml
/// [defaults]
/// price_yen = 37800000
///
/// [[known_buildings]]
/// name = "AXAS駒込Luxease"
/// address = "東京都豊島区駒込1-16-8"
/// markers = [["AXAS", "駒込"]]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: AssemblyDefaults,
    pub known_buildings: Vec<KnownBuilding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: AssemblyDefaults::default(),
            known_buildings: builtin_buildings(),
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        Ok(toml::from_str(source)?)
    }
}

/// Values substituted when a listing lacks a price, size or layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyDefaults {
    pub price_yen: u64,
    pub area_sqm: f64,
    pub bedrooms: u32,
}

impl Default for AssemblyDefaults {
    fn default() -> Self {
        Self {
            price_yen: DEFAULT_PRICE_YEN,
            area_sqm: DEFAULT_AREA_SQM,
            bedrooms: DEFAULT_BEDROOMS,
        }
    }
}

/// A building recognized by name or marker keywords, mapped to its canonical address.
///
/// OCR often garbles the address block of a listing sheet while the building name survives,
/// so an exact building hit is trusted over any structural address pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownBuilding {
    pub name: String,
    pub address: String,
    /// Each inner list is a set of keywords that must all appear in the text.
    #[serde(default)]
    pub markers: Vec<Vec<String>>,
}

impl KnownBuilding {
    pub fn new(name: &str, address: &str, markers: &[&[&str]]) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            markers: markers
                .iter()
                .map(|group| group.iter().map(|m| m.to_string()).collect())
                .collect(),
        }
    }

    /// Whether the text names this building outright or satisfies one marker group.
    ///
    /// Empty names and empty markers never match.
    pub fn matches(&self, text: &str) -> bool {
        (!self.name.is_empty() && text.contains(&self.name))
            || self.markers.iter().any(|group| {
                !group.is_empty()
                    && group
                        .iter()
                        .all(|marker| !marker.is_empty() && text.contains(marker.as_str()))
            })
    }
}

fn builtin_buildings() -> Vec<KnownBuilding> {
    vec![
        KnownBuilding::new(
            "AXAS駒込Luxease",
            "東京都豊島区駒込1-16-8",
            &[
                &["AXAS", "駒込"],
                &["アクサス", "駒込"],
                &["駒込", "Luxease"],
                &["駒込", "ラグジース"],
            ],
        ),
        KnownBuilding::new(
            "ジェイパレス浅草今戸",
            "東京都台東区今戸1-15-6号",
            &[&["ジェイパレス", "浅草"]],
        ),
        KnownBuilding::new(
            "セザール京成小岩",
            "東京都江戸川区北小岩6丁目14-7",
            &[&["セザール", "小岩"]],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.defaults.price_yen, 37_800_000);
        assert_eq!(config.defaults.area_sqm, 40.0);
        assert_eq!(config.defaults.bedrooms, 2);
        assert_eq!(config.known_buildings.len(), 3);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_defaults_override() {
        let config = Config::from_toml_str("[defaults]\nprice_yen = 50000000\n").unwrap();
        assert_eq!(config.defaults.price_yen, 50_000_000);
        assert_eq!(config.defaults.area_sqm, 40.0);
        assert_eq!(config.known_buildings.len(), 3);
    }

    #[test]
    fn test_known_buildings_replace_builtin() {
        let source = r#"
[[known_buildings]]
name = "パークタワー"
address = "東京都港区芝公園4-2-8"
markers = [["パーク", "芝公園"]]
"#;
        let config = Config::from_toml_str(source).unwrap();
        assert_eq!(config.known_buildings.len(), 1);
        assert_eq!(config.known_buildings[0].address, "東京都港区芝公園4-2-8");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("defaults = 3").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_known_building_matches() {
        let axas = &Config::default().known_buildings[0];
        assert!(axas.matches("AXAS駒込Luxease 6階"));
        assert!(axas.matches("アクサス 駒込"));
        assert!(!axas.matches("AXAS 田端"));
        assert!(!axas.matches("駒込駅 徒歩4分"));
    }

    #[test]
    fn test_empty_marker_group_never_matches() {
        let building = KnownBuilding {
            name: "X棟".to_string(),
            address: "東京都".to_string(),
            markers: vec![vec![]],
        };
        assert!(!building.matches("anything"));
    }

    #[test]
    fn test_empty_name_never_matches() {
        let config = Config::from_toml_str(
            "[[known_buildings]]\nname = \"\"\naddress = \"東京都港区1-1-1\"\nmarkers = [[\"\"]]\n",
        )
        .unwrap();

        let building = &config.known_buildings[0];
        assert!(!building.matches("所在地：東京都北区田端1-2-3"));
        assert!(!building.matches(""));
    }
}
