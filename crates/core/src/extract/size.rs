use super::pattern::{Capture, PatternSet};
use crate::error::Error;

pub(crate) fn patterns() -> Result<PatternSet, Error> {
    PatternSet::compile(
        "size",
        &[
            (
                r"(?:専有面積|面積)[\s\S]*?(\d+(?:\.\d+)?\s*(?:m²|㎡|m2|平米|平方メートル))",
                Capture::Group(1),
            ),
            (r"(\d+(?:\.\d+)?\s*(?:m²|㎡|平米))", Capture::Group(1)),
            (
                r"専有面積[^\d]*(\d+(?:\.\d+)?)",
                Capture::Suffixed {
                    group: 1,
                    suffix: "㎡",
                },
            ),
        ],
    )
}

pub(crate) fn tsubo_patterns() -> Result<PatternSet, Error> {
    PatternSet::compile(
        "tsubo",
        &[
            (r"約\s*(\d+(?:\.\d+)?)\s*坪", Capture::Group(1)),
            (r"(\d+(?:\.\d+)?)\s*坪", Capture::Group(1)),
        ],
    )
}
