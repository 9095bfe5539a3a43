//! Upload directory storage service implementation
//!
//! [`FilesService`] owns one directory and writes uploaded image bytes into it under names chosen
//! by the caller (in practice `<image id>.<extension>`).
//!
//! # Behaviour
//!
//! - The directory is created lazily on the first write, never in the constructor
//! - File names must be a single path component; separators and `..` are rejected
//! - Deletion reports success as a boolean and never propagates I/O errors, so a missing file
//!   during cleanup is not fatal to the caller
//! - The service is stateless apart from the directory path and implements `Clone`

use crate::{FilesError, FilesResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Service for storing uploaded image files in a directory
#[derive(Debug, Clone)]
pub struct FilesService {
    upload_dir: PathBuf,
}

impl FilesService {
    /// Creates a new `FilesService` rooted at `upload_dir`.
    ///
    /// No filesystem access happens here; see [`Self::ensure_upload_dir`].
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Returns the directory files are written to
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Creates the upload directory (and parents) if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path exists but is not a directory
    /// - directory creation fails (I/O)
    pub fn ensure_upload_dir(&self) -> FilesResult<()> {
        if self.upload_dir.exists() {
            if !self.upload_dir.is_dir() {
                return Err(FilesError::InvalidUploadDirectory(format!(
                    "Path is not a directory: {}",
                    self.upload_dir.display()
                )));
            }
            return Ok(());
        }

        fs::create_dir_all(&self.upload_dir).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create upload directory {}: {}",
                    self.upload_dir.display(),
                    e
                ),
            ))
        })?;
        tracing::info!(dir = %self.upload_dir.display(), "created upload directory");
        Ok(())
    }

    /// Returns the path a file called `file_name` would be stored at.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidPath`] if `file_name` is blank, contains a path separator,
    /// a NUL byte, or a `..` sequence.
    pub fn path_for(&self, file_name: &str) -> FilesResult<PathBuf> {
        validate_file_name(file_name)?;
        Ok(self.upload_dir.join(file_name))
    }

    /// Writes `bytes` to `<upload_dir>/<file_name>` and returns the path.
    ///
    /// An existing file of the same name is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if the name is invalid, the directory cannot be created, or the
    /// write fails.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> FilesResult<PathBuf> {
        let path = self.path_for(file_name)?;
        self.ensure_upload_dir()?;

        fs::write(&path, bytes).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write file to {}: {}", path.display(), e),
            ))
        })?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "stored upload");
        Ok(path)
    }

    /// Returns true if a file exists at `path`.
    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Deletes the file at `path`.
    ///
    /// Returns `true` if a file was removed and `false` otherwise; failures are logged, not
    /// propagated.
    pub fn delete(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "deleted upload");
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "upload already absent");
                false
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to delete upload");
                false
            }
        }
    }
}

/// Best-effort media type detection from the leading bytes of a file.
///
/// Returns `None` when the content is not recognised. The result is advisory only; the declared
/// media type of an upload remains authoritative.
pub fn detect_media_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

fn validate_file_name(file_name: &str) -> FilesResult<()> {
    if file_name.trim().is_empty() {
        return Err(FilesError::InvalidPath("file name cannot be empty".into()));
    }

    if file_name.contains(|c: char| matches!(c, '/' | '\\' | '\0')) || file_name.contains("..") {
        return Err(FilesError::InvalidPath(format!(
            "file name must be a single path component: '{}'",
            file_name
        )));
    }

    Ok(())
}
