use super::pattern::{Capture, PatternSet};
use crate::error::Error;

/// Price rules. Values come out as `N万円` or `N円` strings, ready for
/// [`crate::units::parse_man_yen`].
pub(crate) fn patterns() -> Result<PatternSet, Error> {
    PatternSet::compile(
        "price",
        &[
            (r"(?:価格|販売価格|価額)[\s\S]*?([0-9,]+万円)", Capture::Group(1)),
            (r"([0-9,]+万円)", Capture::Group(1)),
            (r"(?:価格|販売価格|価額)[^\d]*([\d,]+円)", Capture::Group(1)),
            (
                r"(?:価格|販売価格|価額)[^\d]*([\d,]+)(?:[^\d,円]|$)",
                Capture::Suffixed {
                    group: 1,
                    suffix: "万円",
                },
            ),
            (
                r"([0-9][0-9,]*)万",
                Capture::Suffixed {
                    group: 1,
                    suffix: "万円",
                },
            ),
        ],
    )
}
