use std::sync::OnceLock;

use regex::Regex;

use super::pattern::{Capture, PatternSet};
use crate::error::Error;

pub(crate) fn patterns() -> Result<PatternSet, Error> {
    PatternSet::compile(
        "year",
        &[
            (
                r"(?:築年月|竣工|建築年|完成)[\s\S]*?(\d{4}年\d{1,2}月|\d{4}年|(?:昭和|平成|令和)(?:\d{1,2}|元)年(?:\d{1,2}月)?)",
                Capture::Group(1),
            ),
            (r"(\d{4}年\d{1,2}月|\d{4}年)", Capture::Group(1)),
            (
                r"((?:昭和|平成|令和)(?:\d{1,2}|元)年(?:\d{1,2}月)?)",
                Capture::Group(1),
            ),
        ],
    )
}

/// Gregorian construction year of an extracted year string.
///
/// Accepts `2008年2月`, `2008年` and Japanese era dates such as `平成20年3月` or `令和元年`.
pub fn construction_year(text: &str) -> Option<i32> {
    static RE_GREGORIAN: OnceLock<Regex> = OnceLock::new();
    static RE_ERA: OnceLock<Regex> = OnceLock::new();

    let re_gregorian = RE_GREGORIAN.get_or_init(|| Regex::new(r"(\d{4})年").unwrap());
    let re_era = RE_ERA.get_or_init(|| Regex::new(r"(昭和|平成|令和)(\d{1,2}|元)年").unwrap());

    if let Some(caps) = re_gregorian.captures(text) {
        return caps[1].parse().ok();
    }

    let caps = re_era.captures(text)?;
    let offset = match &caps[1] {
        "昭和" => 1925,
        "平成" => 1988,
        "令和" => 2018,
        _ => return None,
    };
    let year: i32 = match &caps[2] {
        "元" => 1,
        n => n.parse().ok()?,
    };

    Some(offset + year)
}
