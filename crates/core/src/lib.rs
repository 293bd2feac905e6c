//! Core library for bukken
//!
//! This crate implements the **Functional Core** of the bukken application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The bukken project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`bukken_core`** (this crate): Pure transformation functions with zero I/O
//! - **`bukken`**: OCR, geocoding, file I/O and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Total**: Extraction, conversion and segmentation never fail; a missing field is `None`
//!   and a missing number is a documented default
//! - **Testable**: Can be tested with fixture strings, no mocking required
//!
//! # Module Organization
//!
//! The pipeline runs leaf first:
//!
//! - [`text`]: Width folding, Unicode composition and CJK detection
//! - [`units`]: m² / sqft / tsubo and 万円 / yen conversions
//! - [`extract`]: Ordered pattern lists for each listing field
//! - [`segment`]: Splitting a multi-listing text into per-property segments
//! - [`assemble`]: Building [`NormalizedProperty`] records with defaults applied
//! - [`pipeline`]: All of the above behind one call
//! - [`geocode`]: Helpers for the geocoding collaborator (query, swap check, ward centroids)
//! - [`export`]: JSON export/import and KML
//! - [`config`]: Known buildings and assembly defaults, loadable from TOML
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use bukken_core::{Config, Pipeline};
//!
//! let pipeline = Pipeline::new(&Config::default())?;
//! let text = "物件名：AXAS駒込Luxease\n住所：東京都豊島区駒込1-16-8\n面積：30.31㎡";
//!
//! let properties = pipeline.parse_listings(text, "jp-list");
//!
//! assert_eq!(properties.len(), 1);
//! assert_eq!(properties[0].sqft, Some(326));
//! assert_eq!(properties[0].price_yen, 37_800_000); // default price
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod geocode;
pub mod pipeline;
pub mod segment;
pub mod text;
pub mod units;

pub use assemble::{Assembly, NormalizedProperty, PropertyAssembler};
pub use config::Config;
pub use error::Error;
pub use extract::{AddressOutcome, ExtractedFields, FieldExtractor};
pub use geocode::Coordinates;
pub use pipeline::{Batch, BatchSource, Pipeline};
pub use segment::{ListingSegmenter, PropertySegment, SegmentStrategy};
pub use units::Defaulted;
