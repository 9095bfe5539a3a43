//! Upload service for flat image records.
//!
//! [`ImageService`] is what a transport layer talks to. An upload is validated completely
//! (media type, size, pixel dimensions, filename, caption, labels) before anything touches the
//! disk; only then is the file written and the record stored. If storing the record fails, the
//! written file is removed again so no orphan is left in the upload directory.

use crate::config::CoreConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::media_type::MediaType;
use crate::policy::ImagePolicy;
use crate::record::{Dimensions, ImageRecord, NewImageRecord};
use crate::store::JsonStore;
use chrono::Utc;
use image::ImageReader;
use imgvault_files::{detect_media_type, FilesService};
use imgvault_uuid::ImageId;
use serde::Serialize;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

type IdSource = Arc<dyn Fn() -> ImageId + Send + Sync>;

/// An upload as received from a transport layer.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Name of the file on the uploader's side.
    pub filename: String,
    /// Declared media type, e.g. `image/png`.
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub caption: String,
    pub labels: Vec<String>,
}

/// The view of a stored record handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: String,
    pub filename: String,
    pub caption: String,
    pub labels: Vec<String>,
    pub uploaded_at: String,
    pub file_size: u64,
    pub mime_type: String,
}

impl From<&ImageRecord> for ImageResponse {
    fn from(record: &ImageRecord) -> Self {
        Self {
            id: record.id().to_owned(),
            filename: record.filename().to_owned(),
            caption: record.caption().to_owned(),
            labels: record.labels().to_vec(),
            uploaded_at: record.uploaded_at().to_rfc3339(),
            file_size: record.file_size(),
            mime_type: record.mime_type().to_owned(),
        }
    }
}

#[derive(Clone)]
pub struct ImageService {
    store: Arc<JsonStore<ImageRecord>>,
    files: FilesService,
    policy: ImagePolicy,
    id_source: IdSource,
}

impl fmt::Debug for ImageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageService")
            .field("store", &self.store.path())
            .field("upload_dir", &self.files.upload_dir())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ImageService {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            store: Arc::new(JsonStore::new(cfg.images_file())),
            files: FilesService::new(cfg.upload_dir()),
            policy: cfg.upload_policy(),
            id_source: Arc::new(ImageId::generate),
        }
    }

    /// Replaces the identifier generator.
    pub fn with_id_source<F>(mut self, id_source: F) -> Self
    where
        F: Fn() -> ImageId + Send + Sync + 'static,
    {
        self.id_source = Arc::new(id_source);
        self
    }

    /// Validates and stores an upload.
    ///
    /// The file is written as `<id>.<ext>`, where the extension follows the declared media type.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] for any rule the upload breaks
    /// - [`ServiceError::UnreadableDimensions`] if the bytes are not a decodable image header
    /// - [`ServiceError::Files`] or [`ServiceError::Store`] if persisting fails
    pub fn upload(&self, request: UploadRequest) -> ServiceResult<ImageResponse> {
        let UploadRequest {
            filename,
            mime_type,
            bytes,
            caption,
            labels,
        } = request;

        self.policy.check_media_type(&mime_type)?;
        let extension = MediaType::from_mime_type(&mime_type)?.to_extension()?;
        let file_size = bytes.len() as u64;
        self.policy.check_size(file_size)?;
        let metadata = read_dimensions(&bytes)?;

        if let Some(detected) = detect_media_type(&bytes) {
            if detected != mime_type {
                tracing::warn!(
                    declared = %mime_type,
                    detected,
                    filename = %filename,
                    "declared media type does not match content"
                );
            }
        }

        let id = (self.id_source)();
        let file_name = format!("{}{}", id, extension.with_dot());
        let file_path = self.files.path_for(&file_name)?;

        let record = ImageRecord::create_with_policy(
            NewImageRecord {
                id: id.to_string(),
                filename,
                file_path,
                caption,
                labels,
                uploaded_at: Utc::now(),
                file_size,
                mime_type,
                metadata,
            },
            &self.policy,
        )?;

        let stored_path = self.files.save(&file_name, &bytes)?;
        let response = ImageResponse::from(&record);

        if let Err(e) = self.store.save(record) {
            if !self.files.delete(&stored_path) {
                tracing::warn!(path = %stored_path.display(), "failed to remove orphaned upload");
            }
            return Err(e.into());
        }

        tracing::info!(id = %response.id, size = file_size, "image uploaded");
        Ok(response)
    }

    /// Returns the record with `id`, or `None`.
    pub fn get(&self, id: &str) -> ServiceResult<Option<ImageResponse>> {
        Ok(self.store.find_by_id(id)?.as_ref().map(ImageResponse::from))
    }

    /// Returns every record in storage order.
    pub fn list(&self) -> ServiceResult<Vec<ImageResponse>> {
        Ok(self
            .store
            .find_all()?
            .iter()
            .map(ImageResponse::from)
            .collect())
    }

    /// Deletes the record with `id`, then its stored file.
    ///
    /// Returns `false` if there is no such record. The file is only touched once the record is
    /// gone; a file that is already missing does not fail the deletion.
    pub fn delete(&self, id: &str) -> ServiceResult<bool> {
        let Some(record) = self.store.find_by_id(id)? else {
            return Ok(false);
        };

        if !self.store.delete_by_id(id)? {
            return Ok(false);
        }

        let path = record.file_path();
        if !self.files.exists(path) {
            tracing::warn!(id, path = %path.display(), "stored file was already missing");
        } else if !self.files.delete(path) {
            tracing::warn!(id, path = %path.display(), "stored file was not removed");
        }

        tracing::info!(id, "image deleted");
        Ok(true)
    }
}

fn read_dimensions(bytes: &[u8]) -> ServiceResult<Dimensions> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ServiceError::UnreadableDimensions(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ServiceError::UnreadableDimensions(e.to_string()))?;

    Ok(Dimensions::new(width, height)?)
}
