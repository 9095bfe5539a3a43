use std::path::PathBuf;

/// Validation failures raised while building value objects, the image aggregate, or a flat
/// image record. Each variant is a distinct kind so callers can match on it directly.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("invalid image id: {0}")]
    InvalidFormat(#[from] imgvault_uuid::UuidError),
    #[error("unsupported extension: '{0}'")]
    UnsupportedExtension(String),
    #[error("unsupported mime type: '{0}'")]
    UnsupportedMimeType(String),
    #[error("no extension found in file name: '{0}'")]
    MissingExtension(String),
    #[error("no extension maps to mime type '{0}'")]
    NoMatchingExtension(String),
    #[error("content is not valid base64: {0}")]
    InvalidEncoding(String),
    #[error("image content cannot be empty")]
    EmptyContent,
    #[error("extension '{extension}' does not match mime type '{media_type}' (expected '{expected}')")]
    InconsistentMediaType {
        extension: String,
        media_type: String,
        expected: String,
    },

    #[error("filename cannot be empty")]
    EmptyFilename,
    #[error("file size must be positive")]
    InvalidSize,
    #[error("file size {size} exceeds the limit of {limit} bytes")]
    SizeExceeded { size: u64, limit: u64 },
    #[error("caption cannot be empty")]
    EmptyCaption,
    #[error("at least one label must be provided")]
    NoLabels,
    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("invalid labels: {0}")]
    InvalidLabels(String),
}

pub type ImageResult<T> = std::result::Result<T, ImageError>;

/// Failures of the JSON-file store.
///
/// A missing backing file is not an error (it reads as an empty dataset); every other read
/// problem is surfaced.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write store file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {} is corrupt: {reason}", .path.display())]
    CorruptStore { path: PathBuf, reason: String },
    #[error(
        "store file {} holds '{found}' records, expected '{expected}'",
        .path.display()
    )]
    SchemaMismatch {
        path: PathBuf,
        expected: &'static str,
        found: String,
    },
    #[error("failed to serialize store contents: {0}")]
    Serialization(serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the upload and catalog services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ImageError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("file storage error: {0}")]
    Files(#[from] imgvault_files::FilesError),
    #[error("unable to read image dimensions: {0}")]
    UnreadableDimensions(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
