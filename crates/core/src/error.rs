use thiserror::Error;

/// Errors raised while building extractors or moving property batches in and out of JSON.
///
/// Extraction, conversion, segmentation and assembly are total and never produce one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import payload must be a JSON array of properties")]
    NotAnArray,

    #[error("Record {index} is missing a valid `{field}`")]
    InvalidRecord { index: usize, field: &'static str },
}
