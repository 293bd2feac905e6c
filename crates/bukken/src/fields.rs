use crate::prelude::{eprintln, println, *};
use bukken_core::extract::{construction_year, rooms_from_layout};
use bukken_core::{AddressOutcome, ExtractedFields, FieldExtractor};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct FieldsOptions {
    /// Listing text: a .txt file, an image, or `-` for stdin
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: FieldsOptions, global: crate::Global) -> Result<()> {
    let config = crate::input::load_config(&global)?;
    let extractor = FieldExtractor::new(&config)?;

    let text = crate::input::read_listing_text(&options.file, &global.ocr_lang).await?;
    let fields = extractor.extract_all(&text);

    if global.verbose {
        eprintln!("Known buildings: {}", config.known_buildings.len());
    }

    if options.json {
        println!("{}", format_fields_json(&fields)?);
    } else {
        print!("{}", format_fields_text(&fields));
    }

    Ok(())
}

fn format_fields_json(fields: &ExtractedFields) -> Result<String> {
    serde_json::to_string_pretty(fields).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn address_status(outcome: &AddressOutcome) -> String {
    match outcome {
        AddressOutcome::Resolved(_) => "resolved".green().to_string(),
        AddressOutcome::Ambiguous(_) => "ambiguous (no specific address)".yellow().to_string(),
        AddressOutcome::NoSignal => "no Japanese text".red().to_string(),
    }
}

fn format_fields_text(fields: &ExtractedFields) -> String {
    let mut table = crate::prelude::new_table();
    let value = |field: &Option<String>| or_dash(field.as_deref()).to_string();

    table.add_row(prettytable::row!["Address status", address_status(&fields.address)]);
    table.add_row(prettytable::row![
        "Address",
        or_dash(fields.address.candidate())
    ]);
    if let Some(foreign) = &fields.foreign_address {
        table.add_row(prettytable::row!["Foreign address", foreign]);
    }
    table.add_row(prettytable::row!["Name", value(&fields.property_name)]);
    table.add_row(prettytable::row!["Floor", value(&fields.floor)]);
    table.add_row(prettytable::row!["Size", value(&fields.size)]);
    table.add_row(prettytable::row!["Tsubo", value(&fields.tsubo)]);
    table.add_row(prettytable::row!["Price", value(&fields.price)]);
    table.add_row(prettytable::row!["Layout", value(&fields.layout)]);
    if let Some(rooms) = fields.layout.as_deref().and_then(rooms_from_layout) {
        table.add_row(prettytable::row!["Rooms", rooms]);
    }
    table.add_row(prettytable::row!["Station", value(&fields.station)]);
    table.add_row(prettytable::row!["Structure", value(&fields.building_type)]);
    table.add_row(prettytable::row!["Built", value(&fields.year)]);
    if let Some(year) = fields.year.as_deref().and_then(construction_year) {
        table.add_row(prettytable::row!["Built (year)", year]);
    }

    f!("\n{}\n\n{}\n", "EXTRACTED FIELDS".bright_cyan().bold(), table)
}
