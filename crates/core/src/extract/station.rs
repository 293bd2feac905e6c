use super::pattern::{Capture, PatternSet};
use crate::error::Error;

pub(crate) fn patterns() -> Result<PatternSet, Error> {
    PatternSet::compile(
        "station",
        &[
            (r"(?:最寄り?駅|交通)[ \t]*[:：][ \t]*([^\n]+)", Capture::Group(1)),
            (
                r"((?:銀座線|都営浅草線|常磐線|京成本線)[^\n]*?[^\s]+駅(?:[ \t]*徒歩\d+分)?)",
                Capture::Group(1),
            ),
            (
                r"([^\s]+線[^\n]*?[^\s]+駅(?:[ \t]*徒歩\d+分)?)",
                Capture::Group(1),
            ),
            (r"([^\s]+駅[^\n]*?徒歩\d+分)", Capture::Group(1)),
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
    fn test_labeled_station() {
        assert_eq!(
            extract("最寄駅: JR山手線 駒込駅 徒歩4分\n構造: RC造"),
            Some("JR山手線 駒込駅 徒歩4分".to_string())
        );
    }

    #[test]
    fn test_known_line() {
        assert_eq!(
            extract("2LDK\n銀座線 浅草駅 徒歩12分"),
            Some("銀座線 浅草駅 徒歩12分".to_string())
        );
    }

    #[test]
    fn test_any_line() {
        assert_eq!(
            extract("JR山手線 駒込駅 徒歩4分"),
            Some("JR山手線 駒込駅 徒歩4分".to_string())
        );
    }

    #[test]
    fn test_station_and_walk() {
        assert_eq!(
            extract("駒込駅から徒歩4分"),
            Some("駒込駅から徒歩4分".to_string())
        );
    }

    #[test]
    fn test_no_station() {
        assert_eq!(extract("2LDK 30.31㎡ 3,780万円"), None);
    }
}
