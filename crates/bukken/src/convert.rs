use crate::prelude::{println, *};
use bukken_core::units::{
    meters_to_sqft, meters_to_tsubo, parse_man_yen_price_tagged, round2, sqft_to_meters,
    tsubo_to_meters, Defaulted,
};

#[derive(Debug, clap::Parser)]
#[command(name = "convert")]
#[command(about = "Convert areas and prices between units")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Convert an area between square meters, square feet and tsubo
    #[clap(name = "area")]
    Area(AreaOptions),

    /// Convert a 万円 price string into yen
    #[clap(name = "price")]
    Price(PriceOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    Sqm,
    Sqft,
    Tsubo,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct AreaOptions {
    /// Area value
    #[arg(value_name = "VALUE")]
    pub value: f64,

    /// Unit of VALUE
    #[arg(short, long, value_enum, default_value = "sqm")]
    pub unit: AreaUnit,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct PriceOptions {
    /// Price text, e.g. "3,780万円"
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AreaConversion {
    pub sqm: f64,
    pub sqft: f64,
    pub tsubo: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceConversion {
    pub text: String,
    pub yen: u64,
    pub was_defaulted: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Area(options) => {
            let conversion = convert_area(options.value, options.unit);
            if options.json {
                println!("{}", format_json(&conversion)?);
            } else {
                print!("{}", format_area_text(&conversion));
            }
        }
        Commands::Price(options) => {
            let config = crate::input::load_config(&global)?;
            let conversion = convert_price(&options.text, config.defaults.price_yen);
            if options.json {
                println!("{}", format_json(&conversion)?);
            } else {
                print!("{}", format_price_text(&conversion));
            }
        }
    }

    Ok(())
}

pub fn convert_area(value: f64, unit: AreaUnit) -> AreaConversion {
    let sqm = match unit {
        AreaUnit::Sqm => value,
        AreaUnit::Sqft => sqft_to_meters(value),
        AreaUnit::Tsubo => tsubo_to_meters(value),
    };

    AreaConversion {
        sqm: round2(sqm),
        sqft: round2(meters_to_sqft(sqm)),
        tsubo: round2(meters_to_tsubo(sqm)),
    }
}

pub fn convert_price(text: &str, default: u64) -> PriceConversion {
    let Defaulted {
        value,
        was_defaulted,
    } = parse_man_yen_price_tagged(text, default);

    PriceConversion {
        text: text.to_string(),
        yen: value,
        was_defaulted,
    }
}

fn format_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_area_text(conversion: &AreaConversion) -> String {
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["㎡", conversion.sqm]);
    table.add_row(prettytable::row!["sqft", conversion.sqft]);
    table.add_row(prettytable::row!["坪", conversion.tsubo]);
    table.to_string()
}

fn format_price_text(conversion: &PriceConversion) -> String {
    if conversion.was_defaulted {
        f!(
            "{} {}\n",
            f!("¥{}", conversion.yen).yellow(),
            f!("(could not parse \"{}\", default price)", conversion.text).dimmed()
        )
    } else {
        f!("{}\n", f!("¥{}", conversion.yen).bright_cyan().bold())
    }
}
