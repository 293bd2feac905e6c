//! Property name and floor rules.

use super::pattern::{Capture, PatternSet};
use crate::config::KnownBuilding;
use crate::error::Error;

pub(crate) fn patterns() -> Result<PatternSet, Error> {
    PatternSet::compile(
        "property name",
        &[(
            r"(?:物件名|マンション名|建物名)[ \t]*[:：][ \t]*([^\n]+)",
            Capture::Group(1),
        )],
    )
}

/// Floor rules. Every match is rewritten to `N階`; storey counts like `10階建` never match.
pub(crate) fn floor_patterns() -> Result<PatternSet, Error> {
    let floor = |source: &'static str| {
        (
            source,
            Capture::Suffixed {
                group: 1,
                suffix: "階",
            },
        )
    };

    PatternSet::compile(
        "floor",
        &[
            floor(r"(?:所在階|階数)[\s\S]*?(\d+)\s*(?:階|F)(?:[^建]|$)"),
            floor(r"(\d+)階(?:[^建\d]|$)"),
            floor(r"(\d+)\s*[Ff](?:[^A-Za-z]|$)"),
        ],
    )
}

/// Canonical name of the first known building the text mentions.
pub(crate) fn known_building_name<'a>(buildings: &'a [KnownBuilding], text: &str) -> Option<&'a str> {
    buildings
        .iter()
        .find(|b| b.matches(text))
        .map(|b| b.name.as_str())
}
