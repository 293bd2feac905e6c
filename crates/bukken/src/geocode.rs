use crate::prelude::{eprintln, println, *};
use bukken_core::export::{export_json, read_batch};
use bukken_core::geocode::{correct_swap, search_query, ward_centroid, within_japan};
use bukken_core::{Coordinates, NormalizedProperty};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::path::PathBuf;

const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Geocoding requests in flight at once.
const MAX_CONCURRENT_REQUESTS: usize = 8;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct GeocodeOptions {
    /// JSON property batch, or `-` for stdin
    #[arg(value_name = "JSON")]
    pub file: String,

    /// Use the built-in ward centroids instead of the Google Geocoding API
    #[arg(long)]
    pub offline: bool,

    /// Write the geocoded batch here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Google Maps API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

/// Where coordinates come from.
enum Geocoder {
    Google { client: reqwest::Client, key: String },
    Offline,
}

#[derive(Debug, Clone, PartialEq)]
enum Resolution {
    /// The record already had coordinates.
    Kept,
    Resolved { outside_japan: bool },
    Failed(String),
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

pub async fn run(options: GeocodeOptions, global: crate::Global) -> Result<()> {
    let source = crate::input::read_json(&options.file)?;
    let properties = read_batch(&source)?;

    let geocoder = if options.offline {
        Geocoder::Offline
    } else {
        let key = options
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_eyre("GOOGLE_MAPS_API_KEY is not set; pass --api-key or use --offline")?;
        Geocoder::Google {
            client: reqwest::Client::new(),
            key,
        }
    };

    if global.verbose {
        eprintln!(
            "Geocoding {} record(s) {}",
            properties.len(),
            if options.offline { "offline" } else { "with Google" }
        );
    }

    let results = resolve_all(&geocoder, properties).await;

    eprint_summary(&results);

    let properties: Vec<NormalizedProperty> =
        results.into_iter().map(|(property, _)| property).collect();
    let json = export_json(&properties)?;

    match &options.output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| f!("Failed to write {}", path.display()))?;
            if global.verbose {
                eprintln!("Wrote {}", path.display());
            }
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Resolve every record, at most [`MAX_CONCURRENT_REQUESTS`] at a time, keeping input order.
async fn resolve_all(
    geocoder: &Geocoder,
    properties: Vec<NormalizedProperty>,
) -> Vec<(NormalizedProperty, Resolution)> {
    stream::iter(properties)
        .map(|property| resolve_property(geocoder, property))
        .buffered(MAX_CONCURRENT_REQUESTS)
        .collect()
        .await
}

async fn resolve_property(
    geocoder: &Geocoder,
    property: NormalizedProperty,
) -> (NormalizedProperty, Resolution) {
    if property.coordinates().is_some() {
        return (property, Resolution::Kept);
    }

    let lookup = match geocoder {
        Geocoder::Google { client, key } => fetch_coordinates(client, key, &property.address).await,
        Geocoder::Offline => offline_coordinates(&property.address),
    };

    match lookup {
        Ok(coords) => {
            let coords = correct_swap(coords);
            let outside_japan = property.is_japanese && !within_japan(coords);
            if outside_japan {
                log::warn!(
                    "geocode: {} resolved outside Japan ({}, {})",
                    property.id,
                    coords.lat,
                    coords.lng
                );
            }
            (
                property.with_coordinates(coords),
                Resolution::Resolved { outside_japan },
            )
        }
        Err(err) => {
            log::warn!("geocode: {}: {}", property.id, err);
            (property, Resolution::Failed(err.to_string()))
        }
    }
}

fn offline_coordinates(address: &str) -> std::result::Result<Coordinates, Error> {
    ward_centroid(address).ok_or_else(|| Error::GeocodingFailed {
        address: address.to_string(),
        reason: "no known ward in address".to_string(),
    })
}

async fn fetch_coordinates(
    client: &reqwest::Client,
    key: &str,
    address: &str,
) -> std::result::Result<Coordinates, Error> {
    let failed = |reason: String| Error::GeocodingFailed {
        address: address.to_string(),
        reason,
    };

    let url = geocode_url(address, key);
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(failed(f!("HTTP {}", response.status())));
    }

    let body = response
        .json::<GeocodeResponse>()
        .await
        .map_err(|e| failed(e.to_string()))?;

    coordinates_from_response(body).map_err(failed)
}

fn geocode_url(address: &str, key: &str) -> String {
    f!(
        "{}?address={}&key={}",
        GOOGLE_GEOCODE_URL,
        urlencoding::encode(&search_query(address)),
        urlencoding::encode(key)
    )
}

fn coordinates_from_response(body: GeocodeResponse) -> std::result::Result<Coordinates, String> {
    if body.status != "OK" {
        return Err(match body.error_message {
            Some(message) => f!("{}: {}", body.status, message),
            None => body.status,
        });
    }

    body.results
        .first()
        .map(|result| Coordinates::new(result.geometry.location.lat, result.geometry.location.lng))
        .ok_or_else(|| "no results".to_string())
}

fn format_geocode_summary(results: &[(NormalizedProperty, Resolution)]) -> String {
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["ID", "Address", "Status", "Lat", "Lng"]);

    for (property, resolution) in results {
        let status = match resolution {
            Resolution::Kept => "kept".dimmed().to_string(),
            Resolution::Resolved {
                outside_japan: false,
            } => "resolved".green().to_string(),
            Resolution::Resolved {
                outside_japan: true,
            } => "resolved (outside Japan)".yellow().to_string(),
            Resolution::Failed(reason) => f!("failed: {}", reason).red().to_string(),
        };
        let (lat, lng) = property
            .coordinates()
            .map(|c| (c.lat.to_string(), c.lng.to_string()))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));

        table.add_row(prettytable::row![property.id, property.address, status, lat, lng]);
    }

    let failed = results
        .iter()
        .filter(|(_, r)| matches!(r, Resolution::Failed(_)))
        .count();

    f!(
        "{}\n{} of {} record(s) located\n",
        table,
        results.len() - failed,
        results.len()
    )
}

fn eprint_summary(results: &[(NormalizedProperty, Resolution)]) {
    eprintln!("{}", format_geocode_summary(results));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_property(id: &str, address: &str) -> NormalizedProperty {
        NormalizedProperty {
            id: id.to_string(),
            address: address.to_string(),
            is_japanese: true,
            ..Default::default()
        }
    }

    fn create_test_response(json: &str) -> GeocodeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_geocode_url_encodes_query() {
        let url = geocode_url("東京都港区", "k e y");

        assert!(url.starts_with("https://maps.googleapis.com/maps/api/geocode/json?address="));
        assert!(url.contains("%E6%9D%B1%E4%BA%AC%E9%83%BD"));
        assert!(url.contains("%2C%20Japan"));
        assert!(url.ends_with("&key=k%20e%20y"));
    }

    #[test]
    fn test_coordinates_from_response_ok() {
        let body = create_test_response(
            r#"{"status": "OK", "results": [{"geometry": {"location": {"lat": 35.7283, "lng": 139.719}}}]}"#,
        );

        assert_eq!(
            coordinates_from_response(body),
            Ok(Coordinates::new(35.7283, 139.719))
        );
    }

    #[test]
    fn test_coordinates_from_response_zero_results() {
        let body = create_test_response(r#"{"status": "ZERO_RESULTS", "results": []}"#);
        assert_eq!(coordinates_from_response(body), Err("ZERO_RESULTS".to_string()));
    }

    #[test]
    fn test_coordinates_from_response_denied() {
        let body = create_test_response(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        );
        assert_eq!(
            coordinates_from_response(body),
            Err("REQUEST_DENIED: The provided API key is invalid.".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_offline_uses_ward_centroid() {
        let property = create_test_property("jp-0", "東京都品川区西五反田1-2-3");

        let (property, resolution) = resolve_property(&Geocoder::Offline, property).await;

        assert_eq!(
            resolution,
            Resolution::Resolved {
                outside_japan: false
            }
        );
        assert_eq!(property.coordinates(), Some(Coordinates::new(35.6092, 139.7302)));
    }

    #[tokio::test]
    async fn test_resolve_offline_without_ward_fails() {
        let property = create_test_property("jp-0", "神奈川県横浜市西区みなとみらい2-2-1");

        let (property, resolution) = resolve_property(&Geocoder::Offline, property).await;

        assert!(matches!(resolution, Resolution::Failed(_)));
        assert_eq!(property.coordinates(), None);
    }

    #[tokio::test]
    async fn test_resolve_keeps_existing_coordinates() {
        let property = create_test_property("jp-0", "東京都港区")
            .with_coordinates(Coordinates::new(35.65, 139.75));

        let (property, resolution) = resolve_property(&Geocoder::Offline, property).await;

        assert_eq!(resolution, Resolution::Kept);
        assert_eq!(property.coordinates(), Some(Coordinates::new(35.65, 139.75)));
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_order() {
        let properties: Vec<_> = (0..20)
            .map(|i| {
                let address = if i % 2 == 0 {
                    "東京都品川区西五反田1-2-3"
                } else {
                    "神奈川県横浜市西区みなとみらい2-2-1"
                };
                create_test_property(&f!("jp-{i}"), address)
            })
            .collect();

        let results = resolve_all(&Geocoder::Offline, properties).await;

        assert_eq!(results.len(), 20);
        for (i, (property, resolution)) in results.iter().enumerate() {
            assert_eq!(property.id, f!("jp-{i}"));
            assert_eq!(i % 2 == 0, property.coordinates().is_some());
            assert_eq!(i % 2 == 1, matches!(resolution, Resolution::Failed(_)));
        }
    }

    #[test]
    fn test_format_geocode_summary() {
        let located = create_test_property("jp-0", "東京都港区")
            .with_coordinates(Coordinates::new(35.65, 139.75));
        let missing = create_test_property("jp-1", "大阪府");

        let summary = format_geocode_summary(&[
            (located, Resolution::Kept),
            (missing, Resolution::Failed("no known ward in address".to_string())),
        ]);

        assert!(summary.contains("kept"));
        assert!(summary.contains("failed: no known ward in address"));
        assert!(summary.contains("1 of 2 record(s) located"));
    }
}
