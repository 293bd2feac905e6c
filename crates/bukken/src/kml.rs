use crate::prelude::{eprintln, *};
use bukken_core::export::{import_json, to_kml};
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct KmlOptions {
    /// JSON property batch, or `-` for stdin
    #[arg(value_name = "JSON")]
    pub file: String,

    /// Document name shown by the map application
    #[arg(short, long, default_value = "Properties")]
    pub name: String,

    /// Write the KML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(options: KmlOptions, global: crate::Global) -> Result<()> {
    let source = crate::input::read_json(&options.file)?;
    let kml = render_kml(&source, &options.name)?;

    if global.verbose {
        eprintln!("{}", format_placemark_summary(&kml, &options.name));
    }

    match &options.output {
        Some(path) => write_kml(path, &kml)?,
        None => print!("{}", kml),
    }

    Ok(())
}

/// Strictly import `source` and render it as a KML document.
fn render_kml(source: &str, name: &str) -> Result<String> {
    let properties = import_json(source)?;
    Ok(to_kml(name, &properties))
}

fn format_placemark_summary(kml: &str, name: &str) -> String {
    f!(
        "{} placemark(s) in \"{}\"",
        kml.matches("<Placemark>").count(),
        name
    )
}

fn write_kml(path: &Path, kml: &str) -> Result<()> {
    std::fs::write(path, kml).with_context(|| f!("Failed to write {}", path.display()))
}
