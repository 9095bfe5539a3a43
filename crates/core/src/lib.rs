//! # imgvault Core
//!
//! Core business logic for the imgvault image store.
//!
//! This crate contains the validated domain types and their persistence:
//! - Value objects: [`ImageId`], [`Extension`], [`MediaType`], [`ImageContent`]
//! - The [`Image`] aggregate and the flat [`ImageRecord`]
//! - [`ImagePolicy`], the media type and size rules both models validate against
//! - [`JsonStore`], a JSON-file store with upsert semantics
//! - [`ImageService`] (upload flow) and [`ImageCatalog`] (aggregate flow)
//!
//! **No transport concerns**: HTTP handling, multipart decoding and routing belong to the caller.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod extension;
pub mod image;
pub mod media_type;
pub mod policy;
pub mod record;
pub mod service;
pub mod store;
pub mod validation;

pub use catalog::ImageCatalog;
pub use config::{max_file_size_from_env_value, CoreConfig};
pub use content::ImageContent;
pub use error::{
    ImageError, ImageResult, ServiceError, ServiceResult, StoreError, StoreResult,
};
pub use extension::Extension;
pub use image::{Image, ImageInfo, ImageSnapshot};
pub use imgvault_uuid::ImageId;
pub use media_type::MediaType;
pub use policy::ImagePolicy;
pub use record::{Dimensions, ImageRecord, NewImageRecord};
pub use service::{ImageResponse, ImageService, UploadRequest};
pub use store::{JsonStore, StoredRecord};
pub use validation::parse_labels;
