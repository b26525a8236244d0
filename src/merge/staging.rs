//! Per-merge working copies of uploaded catalog stores.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Upload not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported file type: {0} (expected one of: {1})")]
    UnsupportedExtension(String, String),

    #[error("Staging I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A private copy of an uploaded store inside its own temporary directory.
///
/// The directory is removed by [`release`](Self::release) or, failing that,
/// when the value is dropped.
#[derive(Debug)]
pub struct StagedCatalog {
    dir: TempDir,
    file: PathBuf,
}

impl StagedCatalog {
    /// Copies `upload` into a fresh `anicat-merge-*` directory under
    /// `root`. Extensions are compared case-insensitively.
    pub async fn stage(
        root: &Path,
        upload: &Path,
        accepted_extensions: &[String],
    ) -> Result<Self, StagingError> {
        if !tokio::fs::metadata(upload)
            .await
            .is_ok_and(|meta| meta.is_file())
        {
            return Err(StagingError::NotFound(upload.to_path_buf()));
        }

        let extension = upload
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !accepted_extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(&extension))
        {
            return Err(StagingError::UnsupportedExtension(
                upload.display().to_string(),
                accepted_extensions.join(", "),
            ));
        }

        tokio::fs::create_dir_all(root).await?;
        let dir = tempfile::Builder::new()
            .prefix("anicat-merge-")
            .tempdir_in(root)?;
        let file = dir.path().join(format!("catalog.{extension}"));

        // A failed copy drops `staged`, which removes the directory.
        let staged = Self { dir, file };
        tokio::fs::copy(upload, &staged.file).await?;

        debug!(
            "Staged {} at {}",
            upload.display(),
            staged.file.display()
        );

        Ok(staged)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the staging directory. Never fails.
    pub async fn release(self) {
        let dir = self.dir;
        let path = dir.path().to_path_buf();

        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => debug!("Removed staging directory {}", path.display()),
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {}
            Ok(Err(e)) => warn!(
                "Failed to remove staging directory {}: {}",
                path.display(),
                e
            ),
            Err(e) => warn!("Staging cleanup task failed: {}", e),
        }
    }
}

/// Removes a staging directory. Never fails: a missing path counts as
/// removed and other errors are only logged.
pub async fn release(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => debug!("Removed staging directory {}", dir.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Failed to remove staging directory {}: {}",
            dir.display(),
            e
        ),
    }
}
