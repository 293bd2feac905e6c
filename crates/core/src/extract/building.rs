use super::pattern::{Capture, PatternSet};
use crate::error::Error;

/// Building structure rules (`RC造`, `鉄筋コンクリート造9階建`, ...).
pub(crate) fn patterns() -> Result<PatternSet, Error> {
    PatternSet::compile(
        "building type",
        &[
            (r"(?:建物構造|構造)[ \t]*[:：][ \t]*([^\n]+)", Capture::Group(1)),
            (
                r"(?:建物構造|構造)[\s\S]*?(鉄骨鉄筋コンクリート造?|鉄筋コンクリート造?|SRC造|RC造)",
                Capture::Group(1),
            ),
            (r"(RC造地上\d+階建)", Capture::Group(1)),
            (r"(鉄筋コンクリート造?\d+階建て?)", Capture::Group(1)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<String> {
        patterns().unwrap().first_match(text)
    }

    #[test]
    fn test_labeled_structure() {
        assert_eq!(
            extract("構造：鉄筋コンクリート造9階建\n築年月：2008年2月"),
            Some("鉄筋コンクリート造9階建".to_string())
        );
    }

    #[test]
    fn test_structure_keyword_after_label() {
        assert_eq!(extract("構造 SRC造 地上14階"), Some("SRC造".to_string()));
    }

    #[test]
    fn test_rc_above_ground() {
        assert_eq!(
            extract("RC造地上10階建 6階部分"),
            Some("RC造地上10階建".to_string())
        );
    }

    #[test]
    fn test_reinforced_concrete_floors() {
        assert_eq!(
            extract("鉄筋コンクリート9階建て"),
            Some("鉄筋コンクリート9階建て".to_string())
        );
    }

    #[test]
    fn test_no_structure() {
        assert_eq!(extract("2LDK 30.31㎡"), None);
    }
}
