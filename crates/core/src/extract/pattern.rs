use regex::{Captures, Regex};

use crate::error::Error;

/// How the capture groups of a matched pattern become the extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// The whole match.
    Whole,
    /// A single capture group, verbatim.
    Group(usize),
    /// A capture group with a fixed prefix prepended.
    Prefixed { prefix: &'static str, group: usize },
    /// A capture group with `suffix` appended unless it already ends with it.
    Suffixed { group: usize, suffix: &'static str },
    /// A Tokyo ward name plus the text that follows it, placed under 東京都.
    WardPrefixed { ward: usize, rest: usize },
}

impl Capture {
    fn interpret(&self, caps: &Captures) -> Option<String> {
        let group = |i: usize| caps.get(i).map(|m| m.as_str().trim());

        let value = match *self {
            Capture::Whole => group(0)?.to_string(),
            Capture::Group(i) => group(i)?.to_string(),
            Capture::Prefixed { prefix, group: i } => {
                let value = group(i)?;
                if value.starts_with(prefix) {
                    value.to_string()
                } else {
                    format!("{prefix}{value}")
                }
            }
            Capture::Suffixed { group: i, suffix } => {
                let value = group(i)?;
                if value.ends_with(suffix) {
                    value.to_string()
                } else {
                    format!("{value}{suffix}")
                }
            }
            Capture::WardPrefixed { ward, rest } => {
                format!("東京都{}{}", group(ward)?, group(rest).unwrap_or_default())
            }
        };

        Some(value)
    }
}

/// One compiled rule: a regular expression plus its capture interpretation.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    capture: Capture,
}

impl Pattern {
    pub fn new(source: &str, capture: Capture) -> Result<Self, Error> {
        let regex = Regex::new(source).map_err(|source_err| Error::Pattern {
            pattern: source.to_string(),
            source: source_err,
        })?;
        Ok(Self { regex, capture })
    }

    /// Apply the pattern to `text`, returning the interpreted, trimmed value.
    ///
    /// Empty values count as no match so a later pattern gets its turn.
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.regex.captures(text)?;
        self.capture
            .interpret(&caps)
            .filter(|value| !value.is_empty())
    }
}

/// An ordered list of patterns for one field. Earlier entries win.
#[derive(Debug, Clone)]
pub struct PatternSet {
    field: &'static str,
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile a table of `(regex, capture)` rules, keeping their order.
    pub fn compile(field: &'static str, table: &[(&str, Capture)]) -> Result<Self, Error> {
        let patterns = table
            .iter()
            .map(|(source, capture)| Pattern::new(source, *capture))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { field, patterns })
    }

    /// Return the value of the first pattern that matches.
    pub fn first_match(&self, text: &str) -> Option<String> {
        self.patterns.iter().enumerate().find_map(|(idx, pattern)| {
            let value = pattern.apply(text)?;
            log::debug!("{}: pattern #{} matched {:?}", self.field, idx + 1, value);
            Some(value)
        })
    }
}
