//! Constants used throughout the imgvault core crate.

/// Maximum accepted image size in bytes (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default store file for flat image records.
pub const IMAGES_JSON_FILE: &str = "images.json";

/// Default store file for image aggregate snapshots.
pub const ENTITIES_JSON_FILE: &str = "image_entities.json";

/// Schema tag written into the flat record store file.
pub const IMAGE_RECORD_KIND: &str = "image-record";

/// Schema tag written into the aggregate snapshot store file.
pub const IMAGE_ENTITY_KIND: &str = "image-entity";
