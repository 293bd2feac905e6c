use crate::prelude::*;
use std::ffi::OsString;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

/// Whether the file should go through OCR rather than be read as text.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn tesseract_args(image: &Path, languages: &str) -> Vec<OsString> {
    vec![
        image.as_os_str().to_os_string(),
        OsString::from("stdout"),
        OsString::from("-l"),
        OsString::from(languages),
    ]
}

/// Run the `tesseract` binary over an image and return the recognized text.
///
/// `languages` is a tesseract language list such as `eng+jpn`.
pub async fn image_to_text(image: &Path, languages: &str) -> Result<String> {
    let binary = which::which("tesseract").map_err(|_| Error::OcrUnavailable)?;

    log::info!("ocr: {} with {}", image.display(), languages);

    let output = tokio::process::Command::new(binary)
        .args(tesseract_args(image, languages))
        .output()
        .await
        .context("Failed to run tesseract")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::OcrFailed(stderr).into());
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.trim().is_empty() {
        return Err(Error::OcrFailed(f!("no text recognized in {}", image.display())).into());
    }

    Ok(text)
}
