use crate::prelude::{println, *};
use bukken_core::export::import_json;
use bukken_core::NormalizedProperty;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ValidateOptions {
    /// JSON property batch, or `-` for stdin
    #[arg(value_name = "JSON")]
    pub file: String,
}

pub async fn run(options: ValidateOptions, global: crate::Global) -> Result<()> {
    let source = crate::input::read_json(&options.file)?;

    match import_json(&source) {
        Ok(properties) => {
            print!("{}", format_valid_text(&properties));
            Ok(())
        }
        Err(err) => {
            println!("{} {}", "INVALID".red().bold(), err);
            Err(eyre!("{} is not an importable property batch", options.file))
        }
    }
}

fn format_valid_text(properties: &[NormalizedProperty]) -> String {
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["ID", "Address", "Lat", "Lng", "Japanese"]);

    for property in properties {
        table.add_row(prettytable::row![
            property.id,
            property.address,
            property.lat.map(|v| v.to_string()).unwrap_or_default(),
            property.lng.map(|v| v.to_string()).unwrap_or_default(),
            if property.is_japanese { "yes" } else { "no" }
        ]);
    }

    let japanese = properties.iter().filter(|p| p.is_japanese).count();

    f!(
        "{} {}\n\n{}\n{} Japanese, {} other\n",
        "VALID".green().bold(),
        f!("{} record(s)", properties.len()).dimmed(),
        table,
        japanese,
        properties.len() - japanese
    )
}
