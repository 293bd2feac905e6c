use crate::prelude::{eprintln, println, *};
use bukken_core::export::{export_json, format_price};
use bukken_core::{Assembly, Batch, BatchSource, NormalizedProperty, Pipeline};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ParseOptions {
    /// Listing sheet: a .txt file, an image, or `-` for stdin
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Prefix for record ids (defaults to `jp-list-<unix millis>`)
    #[arg(long)]
    pub id_prefix: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ParseOptions, global: crate::Global) -> Result<()> {
    let config = crate::input::load_config(&global)?;
    let pipeline = Pipeline::new(&config)?;

    let text = crate::input::read_listing_text(&options.file, &global.ocr_lang).await?;
    let id_prefix = options
        .id_prefix
        .clone()
        .unwrap_or_else(|| default_id_prefix(chrono::Utc::now().timestamp_millis()));

    if global.verbose {
        eprintln!("Read {} characters from {}", text.chars().count(), options.file);
        eprintln!("Record id prefix: {}", id_prefix);
    }

    let batch = pipeline.process(&text, &id_prefix);

    if options.json {
        println!("{}", format_parse_json(&batch)?);
    } else {
        print!("{}", format_parse_text(&batch));
    }

    Ok(())
}

pub fn default_id_prefix(unix_millis: i64) -> String {
    f!("jp-list-{unix_millis}")
}

/// The batch as an importable property list.
fn format_parse_json(batch: &Batch) -> Result<String> {
    Ok(export_json(&batch.properties())?)
}

fn source_label(source: BatchSource) -> String {
    match source {
        BatchSource::Segmented(strategy) => f!("{strategy:?} segmentation"),
        BatchSource::WholeText => "whole text".to_string(),
        BatchSource::Empty => "nothing found".to_string(),
    }
}

fn area_cell(assembly: &Assembly) -> String {
    let property = &assembly.property;
    let text = match (property.area_meters, property.area_tsubo) {
        (Some(meters), Some(tsubo)) => f!("{meters}㎡ ({tsubo}坪)"),
        (Some(meters), None) => f!("{meters}㎡"),
        _ => "-".to_string(),
    };

    mark_default(text, assembly.area.was_defaulted)
}

fn price_cell(assembly: &Assembly) -> String {
    mark_default(format_price(&assembly.property), assembly.price.was_defaulted)
}

fn mark_default(text: String, was_defaulted: bool) -> String {
    if was_defaulted {
        f!("{} *", text).yellow().to_string()
    } else {
        text
    }
}

fn property_count(count: usize) -> String {
    f!("{} PROPERT{}", count, if count == 1 { "Y" } else { "IES" })
}

fn build_parse_table(assemblies: &[Assembly]) -> prettytable::Table {
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row![
        "ID", "Name", "Address", "Floor", "Area", "Price", "Layout", "Beds"
    ]);

    for assembly in assemblies {
        let property: &NormalizedProperty = &assembly.property;
        table.add_row(prettytable::row![
            property.id,
            or_dash(property.property_name.as_deref()),
            property.address,
            or_dash(property.floor.as_deref()),
            area_cell(assembly),
            price_cell(assembly),
            or_dash(property.layout.as_deref()),
            property.bedroom_estimate
        ]);
    }

    table
}

fn format_parse_text(batch: &Batch) -> String {
    let mut result = String::new();

    result.push_str(&f!(
        "\n{} {}\n\n",
        property_count(batch.assemblies.len()).bright_cyan().bold(),
        f!("({})", source_label(batch.source)).dimmed()
    ));

    if batch.assemblies.is_empty() {
        result.push_str(&f!(
            "{}\n",
            "No listing with a resolvable address was found.".yellow()
        ));
        return result;
    }

    result.push_str(&build_parse_table(&batch.assemblies).to_string());

    if batch
        .assemblies
        .iter()
        .any(|a| a.price.was_defaulted || a.area.was_defaulted)
    {
        result.push_str(&f!(
            "\n{} {}\n",
            "*".yellow(),
            "value not found in the listing, default substituted".dimmed()
        ));
    }

    result.push('\n');
    result
}
