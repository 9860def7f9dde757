// Diagnostic screenshots written when a check fails
use super::results::TIMESTAMP_FORMAT;
use chrono::Local;
use image::ImageFormat;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("Failed to write screenshot {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to convert screenshot to PNG: {source}")]
    Convert {
        #[from]
        source: image::ImageError,
    },
}

pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub async fn create(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(prefix: &str) -> String {
        format!("{prefix}_{}.png", Local::now().format(TIMESTAMP_FORMAT))
    }

    /// Write `bytes` as `<prefix>_<timestamp>.png`, replacing any file of that name.
    pub async fn save(&self, prefix: &str, bytes: &[u8]) -> Result<PathBuf, ScreenshotError> {
        let png = to_png(bytes)?;
        let path = self.dir.join(Self::file_name(prefix));
        tokio::fs::write(&path, &png)
            .await
            .map_err(|source| ScreenshotError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

/// PNG passes through untouched; other image formats (JPEG from some drivers) are re-encoded.
pub fn to_png(bytes: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    if bytes.starts_with(PNG_SIGNATURE) {
        return Ok(bytes.to_vec());
    }
    let img = image::load_from_memory(bytes)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
