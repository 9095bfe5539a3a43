//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Services never read process-wide environment variables while
//! handling an operation.

use crate::constants::MAX_FILE_SIZE;
use crate::error::{ServiceError, ServiceResult};
use crate::policy::ImagePolicy;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    images_file: PathBuf,
    entities_file: PathBuf,
    upload_dir: PathBuf,
    max_file_size: u64,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidConfig`] if both stores point at the same file, or if
    /// `max_file_size` is zero or above [`MAX_FILE_SIZE`].
    pub fn new(
        images_file: PathBuf,
        entities_file: PathBuf,
        upload_dir: PathBuf,
        max_file_size: u64,
    ) -> ServiceResult<Self> {
        if images_file == entities_file {
            return Err(ServiceError::InvalidConfig(format!(
                "record store and entity store must use different files, both are {}",
                images_file.display()
            )));
        }
        check_max_file_size(max_file_size)?;

        Ok(Self {
            images_file,
            entities_file,
            upload_dir,
            max_file_size,
        })
    }

    pub fn images_file(&self) -> &Path {
        &self.images_file
    }

    pub fn entities_file(&self) -> &Path {
        &self.entities_file
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Rules for the upload flow, capped at the configured size.
    pub fn upload_policy(&self) -> ImagePolicy {
        ImagePolicy::upload().with_max_size(self.max_file_size)
    }

    /// Rules for the catalog flow, capped at the configured size.
    pub fn library_policy(&self) -> ImagePolicy {
        ImagePolicy::library().with_max_size(self.max_file_size)
    }
}

/// Parse the size cap from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`MAX_FILE_SIZE`].
pub fn max_file_size_from_env_value(value: Option<String>) -> ServiceResult<u64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(MAX_FILE_SIZE);
    };

    let parsed = value.parse::<u64>().map_err(|e| {
        ServiceError::InvalidConfig(format!("max file size '{}' is not a byte count: {}", value, e))
    })?;
    check_max_file_size(parsed)?;
    Ok(parsed)
}

fn check_max_file_size(max_file_size: u64) -> ServiceResult<()> {
    if max_file_size == 0 || max_file_size > MAX_FILE_SIZE {
        return Err(ServiceError::InvalidConfig(format!(
            "max file size must be between 1 and {} bytes, got {}",
            MAX_FILE_SIZE, max_file_size
        )));
    }
    Ok(())
}
