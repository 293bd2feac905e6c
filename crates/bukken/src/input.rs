use crate::prelude::{eprintln, *};
use bukken_core::Config;
use std::io::Read;
use std::path::Path;

/// Load `--config`, or the built-in configuration when none is given.
pub fn load_config(global: &crate::Global) -> Result<Config> {
    let Some(path) = &global.config else {
        return Ok(Config::default());
    };

    let source = std::fs::read_to_string(path)
        .with_context(|| f!("Failed to read config file {}", path.display()))?;
    let config = Config::from_toml_str(&source)
        .with_context(|| f!("Failed to parse config file {}", path.display()))?;

    if global.verbose {
        eprintln!(
            "Loaded {} known building(s) from {}",
            config.known_buildings.len(),
            path.display()
        );
    }

    Ok(config)
}

/// Listing text from a file, an image (through OCR) or stdin when `path` is `-`.
pub async fn read_listing_text(path: &str, ocr_lang: &str) -> Result<String> {
    if path == "-" {
        return read_stdin();
    }

    let path = Path::new(path);
    if crate::ocr::is_image(path) {
        return crate::ocr::image_to_text(path, ocr_lang).await;
    }

    let bytes =
        std::fs::read(path).with_context(|| f!("Failed to read {}", path.display()))?;
    String::from_utf8(bytes)
        .map_err(|_| Error::UnsupportedInput(f!("{} is not UTF-8 text", path.display())).into())
}

/// A JSON document from a file or stdin when `path` is `-`.
pub fn read_json(path: &str) -> Result<String> {
    if path == "-" {
        return read_stdin();
    }

    std::fs::read_to_string(path).with_context(|| f!("Failed to read {}", path))
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_global(config: Option<std::path::PathBuf>) -> crate::Global {
        crate::Global {
            config,
            ocr_lang: "eng+jpn".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn test_load_config_builtin() {
        let config = load_config(&create_test_global(None)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bukken.toml");
        std::fs::write(
            &path,
            "[defaults]\nprice_yen = 10000000\n\n[[known_buildings]]\nname = \"Test\"\naddress = \"東京都港区1-1-1\"\nmarkers = [[\"Test\"]]\n",
        )
        .unwrap();

        let config = load_config(&create_test_global(Some(path))).unwrap();

        assert_eq!(config.defaults.price_yen, 10_000_000);
        assert_eq!(config.known_buildings.len(), 1);
        assert_eq!(config.known_buildings[0].address, "東京都港区1-1-1");
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let global = create_test_global(Some(temp_dir.path().join("missing.toml")));
        assert!(load_config(&global).is_err());
    }

    #[tokio::test]
    async fn test_read_listing_text_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sheet.txt");
        std::fs::write(&path, "住所：東京都北区田端1-2-3\n").unwrap();

        let text = read_listing_text(path.to_str().unwrap(), "eng+jpn")
            .await
            .unwrap();

        assert_eq!(text, "住所：東京都北区田端1-2-3\n");
    }

    #[tokio::test]
    async fn test_read_listing_text_rejects_binary() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sheet.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = read_listing_text(path.to_str().unwrap(), "eng+jpn")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("is not UTF-8 text"));
    }
}
