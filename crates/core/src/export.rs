//! JSON and KML serialization of property lists.

use serde_json::Value;

use crate::assemble::NormalizedProperty;
use crate::error::Error;

/// Pretty-printed JSON array of properties.
pub fn export_json(properties: &[NormalizedProperty]) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(properties)?)
}

/// Parse an exported property list.
///
/// Every record needs a string `id`, a string `address` and numeric `lat` and `lng`. The first
/// record that does not comply rejects the whole batch.
pub fn import_json(source: &str) -> Result<Vec<NormalizedProperty>, Error> {
    read_records(
        source,
        &[
            ("id", is_string),
            ("address", is_string),
            ("lat", is_number),
            ("lng", is_number),
        ],
    )
}

/// Parse a property list that may still lack coordinates.
///
/// Only `id` and `address` are required; `lat`/`lng` may be missing or null.
pub fn read_batch(source: &str) -> Result<Vec<NormalizedProperty>, Error> {
    read_records(source, &[("id", is_string), ("address", is_string)])
}

type FieldCheck = (&'static str, fn(&Value) -> bool);

fn is_string(value: &Value) -> bool {
    value.is_string()
}

fn is_number(value: &Value) -> bool {
    value.is_number()
}

fn read_records(source: &str, checks: &[FieldCheck]) -> Result<Vec<NormalizedProperty>, Error> {
    let value: Value = serde_json::from_str(source)?;
    let Value::Array(records) = value else {
        return Err(Error::NotAnArray);
    };

    for (index, record) in records.iter().enumerate() {
        for &(field, check) in checks {
            if !record.get(field).is_some_and(check) {
                log::warn!("import: record {index} has no valid `{field}`");
                return Err(Error::InvalidRecord { index, field });
            }
        }
    }

    records
        .into_iter()
        .map(|record| serde_json::from_value(record).map_err(Error::from))
        .collect()
}

/// KML 2.2 document with one placemark per property that has coordinates.
pub fn to_kml(list_name: &str, properties: &[NormalizedProperty]) -> String {
    let mut kml = String::new();

    kml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    kml.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    kml.push_str("  <Document>\n");
    kml.push_str(&format!("    <name>{}</name>\n", escape(list_name)));

    for property in properties {
        let Some(coords) = property.coordinates() else {
            log::debug!("kml: skipping {} without coordinates", property.id);
            continue;
        };

        kml.push_str("    <Placemark>\n");
        kml.push_str(&format!(
            "      <name>{}</name>\n",
            escape(property.display_name())
        ));
        kml.push_str(&format!(
            "      <description>{}</description>\n",
            escape(&placemark_description(property))
        ));
        kml.push_str("      <Point>\n");
        kml.push_str(&format!(
            "        <coordinates>{},{},0</coordinates>\n",
            coords.lng, coords.lat
        ));
        kml.push_str("      </Point>\n");
        kml.push_str("    </Placemark>\n");
    }

    kml.push_str("  </Document>\n");
    kml.push_str("</kml>\n");
    kml
}

fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Address, floor or beds/baths, area and price, one per line.
pub fn placemark_description(property: &NormalizedProperty) -> String {
    let mut lines = vec![property.address.clone()];

    if property.is_japanese {
        lines.extend(property.floor.clone());
        lines.extend(property.area_meters.map(|meters| match property.area_tsubo {
            Some(tsubo) => format!("{meters}㎡ (約{tsubo:.2}坪)"),
            None => format!("{meters}㎡"),
        }));
    } else {
        lines.push(format!(
            "{} bed, {} bath",
            property.bedroom_estimate, property.bathrooms
        ));
        lines.extend(property.sqft.map(|sqft| format!("{sqft} sqft")));
    }

    if property.price_yen > 0 {
        lines.push(format!("Price: {}", format_price(property)));
    }

    lines.retain(|line| !line.is_empty());
    lines.join("\n")
}

/// `3780万円` for Japanese listings, `$450,000` otherwise.
pub fn format_price(property: &NormalizedProperty) -> String {
    if property.is_japanese {
        format!("{}万円", property.price_yen as f64 / 10_000.0)
    } else {
        format!("${}", group_thousands(property.price_yen))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}
