//! Local upload sink for payment proofs and menu/seating images.
//!
//! Files are written under the configured directory with a random name and
//! served back at `/uploads/<name>`.

use crate::errors::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Largest accepted file (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Accepted file extensions, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// URL prefix the stored files are served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Reference to a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// Generated file name
    pub file_name: String,
    /// Path under which the file is served, e.g. `/uploads/<uuid>.jpg`
    pub url: String,
}

/// Writes uploads into one directory.
#[derive(Debug, Clone)]
pub struct UploadSink {
    dir: PathBuf,
}

impl UploadSink {
    /// Sink writing into `dir`; the directory is created on first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validates and stores one file.
    ///
    /// # Errors
    /// Returns [`Error::Upload`] if the file is empty, too large or has an
    /// unsupported extension, and [`Error::Io`] if writing fails.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn store(&self, original_name: Option<&str>, data: &[u8]) -> Result<StoredFile> {
        let extension = validate_upload(original_name, data)?;
        let file_name = format!("{}.{extension}", uuid::Uuid::new_v4());

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), data).await?;

        info!(file_name = %file_name, "Upload stored");
        Ok(StoredFile {
            url: format!("{PUBLIC_PREFIX}/{file_name}"),
            file_name,
        })
    }
}

/// Checks size and extension; returns the normalized extension.
///
/// # Errors
/// Returns [`Error::Upload`] describing the first failed check.
pub fn validate_upload(original_name: Option<&str>, data: &[u8]) -> Result<String> {
    if data.is_empty() {
        return Err(upload_error("Empty file"));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(upload_error(format!(
            "File too large: {} bytes (max {MAX_UPLOAD_BYTES})",
            data.len()
        )));
    }

    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(upload_error(format!(
            "Unsupported format '{extension}'. Supported: {}",
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }
    Ok(extension)
}

fn upload_error(message: impl Into<String>) -> Error {
    Error::Upload {
        message: message.into(),
    }
}
