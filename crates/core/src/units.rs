use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::text::normalize;

/// Square feet in one square meter.
pub const SQFT_PER_SQM: f64 = 10.7639;

/// Square meters in one tsubo (坪).
pub const SQM_PER_TSUBO: f64 = 3.306;

/// Yen in one 万円.
pub const YEN_PER_MAN: u64 = 10_000;

pub fn meters_to_tsubo(m: f64) -> f64 {
    m / SQM_PER_TSUBO
}

pub fn tsubo_to_meters(t: f64) -> f64 {
    t * SQM_PER_TSUBO
}

pub fn meters_to_sqft(m: f64) -> f64 {
    m * SQFT_PER_SQM
}

pub fn sqft_to_meters(s: f64) -> f64 {
    s / SQFT_PER_SQM
}

/// Round to two decimal places, the precision areas are displayed and stored with.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// A value that was either parsed from the listing or substituted with a default.
///
/// Lets callers tell a real `3,780万円` apart from the placeholder price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Defaulted<T> {
    pub value: T,
    pub was_defaulted: bool,
}

impl<T> Defaulted<T> {
    pub fn parsed(value: T) -> Self {
        Self {
            value,
            was_defaulted: false,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            was_defaulted: true,
        }
    }

    pub fn from_option(value: Option<T>, default: T) -> Self {
        match value {
            Some(v) => Self::parsed(v),
            None => Self::fallback(default),
        }
    }
}

/// Parse a price string such as `3,780万円` into yen.
///
/// Keeps only digits and commas, drops the commas and multiplies by 10,000 when the text
/// contains `万`. Returns `None` when no digits survive or the result overflows.
pub fn parse_man_yen(text: &str) -> Option<u64> {
    let text = normalize(text);
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return None;
    }

    let amount = digits.parse::<u64>().ok()?;

    if text.contains('万') {
        amount.checked_mul(YEN_PER_MAN)
    } else {
        Some(amount)
    }
}

/// Parse a price string into yen, falling back to `default` when it cannot be read.
pub fn parse_man_yen_price(text: &str, default: u64) -> u64 {
    parse_man_yen(text).unwrap_or(default)
}

/// Same as [`parse_man_yen_price`], but reports whether the default was used.
pub fn parse_man_yen_price_tagged(text: &str, default: u64) -> Defaulted<u64> {
    Defaulted::from_option(parse_man_yen(text), default)
}

/// Extract a square-meter figure from a size string such as `30.31㎡ (約9.16坪)`.
///
/// Prefers the first number directly followed by `㎡`, `m²`, `m2`, `平米` or `平方メートル`.
/// Without a unit marker, the first number that is not a tsubo figure is used. Returns `None`
/// when the text carries no usable digits.
pub fn parse_area_string(text: &str) -> Option<f64> {
    static RE_AREA_UNIT: OnceLock<Regex> = OnceLock::new();
    let re_area_unit = RE_AREA_UNIT.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)\s*(?:㎡|m²|m2|平米|平方メートル)").unwrap()
    });

    static RE_NUMBER: OnceLock<Regex> = OnceLock::new();
    let re_number = RE_NUMBER.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(坪)?").unwrap());

    let text = normalize(text);

    if let Some(caps) = re_area_unit.captures(&text) {
        return caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
    }

    re_number
        .captures_iter(&text)
        .filter(|caps| caps.get(2).is_none())
        .find_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()))
}

/// Extract a tsubo figure from text such as `(約9.16坪)`.
pub fn parse_tsubo_string(text: &str) -> Option<f64> {
    static RE_TSUBO: OnceLock<Regex> = OnceLock::new();
    let re_tsubo = RE_TSUBO.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)\s*坪").unwrap());

    let text = normalize(text);
    re_tsubo
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Area conversions
    // ============================================================================

    #[test]
    fn test_meters_to_tsubo() {
        assert!((meters_to_tsubo(30.31) - 9.168).abs() < 1e-3);
    }

    #[test]
    fn test_tsubo_to_meters() {
        assert!((tsubo_to_meters(10.0) - 33.06).abs() < 1e-9);
    }

    #[test]
    fn test_meters_to_sqft() {
        assert_eq!(meters_to_sqft(30.31).round(), 326.0);
    }

    #[test]
    fn test_sqft_round_trip() {
        for x in [0.001, 1.0, 42.5, 307.0, 1234.56, 98765.4321] {
            assert!((meters_to_sqft(sqft_to_meters(x)) - x).abs() < 1e-3, "x = {x}");
        }
    }

    #[test]
    fn test_tsubo_round_trip() {
        for x in [1.0, 9.16, 100.0] {
            assert!((meters_to_tsubo(tsubo_to_meters(x)) - x).abs() < 1e-9);
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(9.168_179), 9.17);
        assert_eq!(round2(12.0), 12.0);
    }

    // ============================================================================
    // Price parsing
    // ============================================================================

    #[test]
    fn test_parse_man_yen_price_with_en() {
        assert_eq!(parse_man_yen_price("3,780万円", 0), 37_800_000);
    }

    #[test]
    fn test_parse_man_yen_price_without_en() {
        assert_eq!(parse_man_yen_price("3,780万", 0), 37_800_000);
    }

    #[test]
    fn test_parse_man_yen_price_garbage_uses_default() {
        assert_eq!(parse_man_yen_price("garbage", 37_800_000), 37_800_000);
    }

    #[test]
    fn test_parse_man_yen_price_full_width() {
        assert_eq!(parse_man_yen_price("４，３９０万円", 0), 43_900_000);
    }

    #[test]
    fn test_parse_man_yen_price_plain_yen() {
        assert_eq!(parse_man_yen_price("37800000円", 0), 37_800_000);
    }

    #[test]
    fn test_parse_man_yen_price_overflow_uses_default() {
        assert_eq!(parse_man_yen_price("99999999999999999万円", 7), 7);
    }

    #[test]
    fn test_parse_man_yen_price_tagged_reports_default() {
        let real = parse_man_yen_price_tagged("3,780万円", 37_800_000);
        let defaulted = parse_man_yen_price_tagged("価格未定", 37_800_000);

        assert_eq!(real.value, defaulted.value);
        assert!(!real.was_defaulted);
        assert!(defaulted.was_defaulted);
    }

    // ============================================================================
    // Area parsing
    // ============================================================================

    #[test]
    fn test_parse_area_string_square_meter_glyph() {
        assert_eq!(parse_area_string("30.31㎡"), Some(30.31));
    }

    #[test]
    fn test_parse_area_string_superscript() {
        assert_eq!(parse_area_string("30.31m²"), Some(30.31));
    }

    #[test]
    fn test_parse_area_string_heibei() {
        assert_eq!(parse_area_string("専有 54.76平米"), Some(54.76));
    }

    #[test]
    fn test_parse_area_string_no_numbers() {
        assert_eq!(parse_area_string("no numbers"), None);
    }

    #[test]
    fn test_parse_area_string_prefers_unit_over_tsubo() {
        assert_eq!(parse_area_string("約9.16坪 / 30.31㎡"), Some(30.31));
    }

    #[test]
    fn test_parse_area_string_tsubo_only() {
        assert_eq!(parse_area_string("約9.16坪"), None);
    }

    #[test]
    fn test_parse_area_string_bare_number() {
        assert_eq!(parse_area_string("59.58"), Some(59.58));
    }

    #[test]
    fn test_parse_tsubo_string() {
        assert_eq!(parse_tsubo_string("30.31㎡ (約9.16坪)"), Some(9.16));
        assert_eq!(parse_tsubo_string("30.31㎡"), None);
    }
}
