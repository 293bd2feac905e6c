use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod convert;
mod error;
mod fields;
mod geocode;
mod input;
mod kml;
mod ocr;
mod parse;
mod prelude;
mod validate;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Turn OCR'd Japanese real-estate listing sheets into geocoded property records"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// TOML file with known buildings and assembly defaults
    #[clap(long, env = "BUKKEN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Tesseract languages used when the input is an image
    #[clap(long, env = "BUKKEN_OCR_LANG", global = true, default_value = "eng+jpn")]
    ocr_lang: String,

    /// Whether to display additional information.
    #[clap(long, env = "BUKKEN_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Parse a listing sheet (text or image) into property records
    Parse(crate::parse::ParseOptions),

    /// Show every field extracted from a single listing
    Fields(crate::fields::FieldsOptions),

    /// Convert areas and prices between units
    Convert(crate::convert::App),

    /// Resolve coordinates for a JSON property batch
    Geocode(crate::geocode::GeocodeOptions),

    /// Render a JSON property batch as KML
    Kml(crate::kml::KmlOptions),

    /// Check a JSON property batch against the import rules
    Validate(crate::validate::ValidateOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Parse(options) => crate::parse::run(options, app.global).await,
        SubCommands::Fields(options) => crate::fields::run(options, app.global).await,
        SubCommands::Convert(sub_app) => crate::convert::run(sub_app, app.global).await,
        SubCommands::Geocode(options) => crate::geocode::run(options, app.global).await,
        SubCommands::Kml(options) => crate::kml::run(options, app.global).await,
        SubCommands::Validate(options) => crate::validate::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
