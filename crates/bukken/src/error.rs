#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("tesseract is not installed or not on PATH")]
    OcrUnavailable,

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Geocoding failed for `{address}`: {reason}")]
    GeocodingFailed { address: String, reason: String },

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}
