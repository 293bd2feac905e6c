use std::sync::OnceLock;

use regex::Regex;

use super::pattern::{Capture, PatternSet};
use crate::error::Error;

pub(crate) fn patterns() -> Result<PatternSet, Error> {
    PatternSet::compile(
        "layout",
        &[
            (
                r"(?i)間取り?[\s\S]*?(\d{1,2}\s*(?:S?LDK|S?DK|K|R))(?:[^A-Za-z]|$)",
                Capture::Group(1),
            ),
            (r"(?i)(\d{1,2}\s*S?L?DK)", Capture::Group(1)),
            (
                r"(?i)(?:^|[^\dA-Za-z])(\d[KR])(?:[^\dA-Za-z]|$)",
                Capture::Group(1),
            ),
        ],
    )
}

/// Canonical layout form: upper case, no inner whitespace (`2 ldk` becomes `2LDK`).
pub fn canonicalize(layout: &str) -> String {
    layout
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Room count from the leading digits of a layout, e.g. `3LDK` gives 3.
pub fn rooms_from_layout(layout: &str) -> Option<u32> {
    static RE_ROOMS: OnceLock<Regex> = OnceLock::new();
    let re_rooms = RE_ROOMS.get_or_init(|| Regex::new(r"^\s*(\d+)").unwrap());

    re_rooms
        .captures(layout)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<String> {
        patterns().unwrap().first_match(text).map(|l| canonicalize(&l))
    }

    #[test]
    fn test_labeled_layout() {
        assert_eq!(extract("間取り：2LDK"), Some("2LDK".to_string()));
    }

    #[test]
    fn test_labeled_one_k() {
        assert_eq!(extract("間取 2K\n専有面積 30.31㎡"), Some("2K".to_string()));
    }

    #[test]
    fn test_bare_lowercase_layout() {
        assert_eq!(extract("広々 3sldk タイプ"), Some("3SLDK".to_string()));
    }

    #[test]
    fn test_bare_one_room() {
        assert_eq!(extract("ワンルーム 1R 角部屋"), Some("1R".to_string()));
    }

    #[test]
    fn test_no_layout() {
        assert_eq!(extract("JR山手線 駒込駅 徒歩4分"), None);
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("2 ldk"), "2LDK");
    }

    #[test]
    fn test_rooms_from_layout() {
        assert_eq!(rooms_from_layout("3LDK"), Some(3));
        assert_eq!(rooms_from_layout("1R"), Some(1));
        assert_eq!(rooms_from_layout("LDK"), None);
    }

    #[test]
    fn test_idempotent() {
        let value = extract("間取り 2LDK").unwrap();
        assert_eq!(extract(&value), Some(value));
    }
}
