use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::{
    fs,
    io::{AsyncRead, AsyncWriteExt},
};
use uuid::Uuid;

use crate::config::AppConfig;

/// UploadError
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file too large: {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: u64, max: u64 },

    #[error("file type not allowed: {0:?}")]
    ExtensionNotAllowed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// 1. UploadStore Contract
/// UploadStore
///
/// Validates and persists uploaded assets. Handlers only see this trait, so tests and
/// alternative backends can be swapped in without touching them.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Checks `declared_size` against the size limit, then the extension of `declared_name`
    /// against the allow-list, and only then copies `reader` to a freshly named file.
    ///
    /// Returns the path the file was written to. The declared name is never part of it.
    async fn save(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        declared_name: &str,
        declared_size: u64,
    ) -> Result<PathBuf, UploadError>;
}

// 2. Local Disk Implementation
/// LocalUploadStore
///
/// Writes accepted uploads under a managed directory as `<random hex><.ext>`. The directory
/// is created on first use. A failed copy leaves whatever was written in place.
#[derive(Clone, Debug)]
pub struct LocalUploadStore {
    upload_dir: PathBuf,
    max_size: u64,
    // Lowercase, leading dot.
    allowed_extensions: Vec<String>,
}

impl LocalUploadStore {
    pub fn new(upload_dir: impl Into<PathBuf>, max_size: u64, allowed_extensions: Vec<String>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_size,
            allowed_extensions,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.upload_dir.clone(),
            config.max_upload_size,
            config.allowed_extensions.clone(),
        )
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Case-insensitive: `photo.JPG` matches an allow-list entry of `.jpg`.
    pub fn is_allowed_extension(&self, file_name: &str) -> bool {
        let ext = extension_of(file_name);
        self.allowed_extensions.iter().any(|allowed| *allowed == ext)
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn save(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        declared_name: &str,
        declared_size: u64,
    ) -> Result<PathBuf, UploadError> {
        if declared_size > self.max_size {
            return Err(UploadError::TooLarge {
                size: declared_size,
                max: self.max_size,
            });
        }

        if !self.is_allowed_extension(declared_name) {
            return Err(UploadError::ExtensionNotAllowed(extension_of(declared_name)));
        }
        let ext = extension_of(declared_name);

        fs::create_dir_all(&self.upload_dir).await?;

        let dest = self.upload_dir.join(format!("{}{}", random_name(), ext));
        let mut file = fs::File::create(&dest).await?;
        let written = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;

        tracing::info!(path = %dest.display(), bytes = written, "upload stored");
        Ok(dest)
    }
}

/// Lowercase extension including the dot, or an empty string when there is none.
///
/// A bare dotfile such as `.png` counts as a name without an extension, so it never matches
/// the allow-list.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// 32 hex characters from a v4 UUID (OS randomness).
fn random_name() -> String {
    Uuid::new_v4().simple().to_string()
}

/// UploadState
///
/// The concrete type used to share the upload store across the application state.
pub type UploadState = Arc<dyn UploadStore>;
