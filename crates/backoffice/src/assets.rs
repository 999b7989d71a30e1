//! Image uploads written under a resource-scoped public path.
//!
//! Uploaded files land at `<root>/<kind>s/<filename>` and are referenced by
//! the externally servable path `/customers/<filename>` or
//! `/products/<filename>`. The filename is the upload's original name reduced
//! to its final path component; a second upload with the same name silently
//! overwrites the first (accepted collision policy).
//!
//! Asset writes happen before the database write. A filesystem failure here
//! aborts the whole mutation; a database failure afterwards leaves the
//! written file behind (known, unreconciled partial-failure gap).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::forms::ImageUpload;

/// Errors that can occur while persisting an upload.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The upload's filename has no usable final component.
    #[error("invalid upload filename: {0:?}")]
    InvalidFilename(String),

    /// Filesystem write failed.
    #[error("failed to write asset: {0}")]
    Io(#[from] std::io::Error),
}

/// The resource kind an asset belongs to, which picks its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Customer,
    Product,
}

impl ResourceKind {
    /// Directory (and public path prefix) for this resource's assets.
    #[must_use]
    pub const fn dir(&self) -> &'static str {
        match self {
            Self::Customer => "customers",
            Self::Product => "products",
        }
    }
}

/// Writes uploaded images under a configured public root directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Create an asset store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist an upload and return its externally servable path.
    ///
    /// With no upload, returns an empty path and performs no write. The
    /// resource directory is created on demand; an existing file with the
    /// same name is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError`] if the filename is unusable or the filesystem
    /// write fails. Callers must treat any error as fatal to the mutation:
    /// no database write may follow a failed asset write.
    pub async fn save(
        &self,
        kind: ResourceKind,
        upload: Option<&ImageUpload>,
    ) -> Result<String, AssetError> {
        let Some(upload) = upload else {
            return Ok(String::new());
        };

        let filename = Path::new(&upload.filename)
            .file_name()
            .ok_or_else(|| AssetError::InvalidFilename(upload.filename.clone()))?
            .to_string_lossy()
            .into_owned();

        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), &upload.bytes).await?;

        tracing::debug!(kind = kind.dir(), filename = %filename, "Stored uploaded asset");
        Ok(format!("/{}/{}", kind.dir(), filename))
    }
}
