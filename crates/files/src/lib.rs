//! imgvault File Storage
//!
//! This crate stores the raw bytes of uploaded images in a single flat directory and hands back
//! the path each file was written to. It knows nothing about captions, labels or records; those
//! live in `imgvault-core`, which keeps the returned path alongside its own metadata.
//!
//! ## Layout
//!
//! ```text
//! <upload_dir>/          # created on first write
//! ├── 6f1c…-…-…-…-….jpg
//! └── 9a3e…-…-…-…-….png
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use imgvault_files::FilesService;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = FilesService::new("uploads");
//! let path = service.save("550e8400-e29b-41d4-a716-446655440000.png", b"\x89PNG...")?;
//! assert!(service.delete(&path));
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;

pub use constants::DEFAULT_UPLOAD_DIR;
pub use files::{detect_media_type, FilesService};

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Upload directory path exists but is not a directory
    #[error("Invalid upload directory: {0}")]
    InvalidUploadDirectory(String),

    /// File name would escape the upload directory or is otherwise unusable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FilesResult<T> = Result<T, FilesError>;
