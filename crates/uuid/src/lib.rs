//! Image identifier utilities.
//!
//! Every image known to imgvault is addressed by an opaque identifier whose canonical form is a
//! **version-4 UUID in hyphenated form** (36 characters, 8-4-4-4-12).
//!
//! This crate provides:
//! - A wrapper type ([`ImageId`]) that *guarantees* the UUID v4 grammar once constructed.
//! - Generation from the `uuid` crate's v4 generator, or from any caller-supplied random source
//!   via [`ImageId::generate_from_rng`].
//!
//! ## Canonical form
//! - Length: 36
//! - Groups: 8-4-4-4-12 hexadecimal digits
//! - Version nibble (first digit of the third group): `4`
//! - Variant nibble (first digit of the fourth group): one of `8`, `9`, `a`, `b`
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! Notes:
//! - Generated identifiers are always lowercase.
//! - Parsing is case-insensitive but does **not** normalise: an imported identifier keeps the
//!   casing it was supplied with, and equality is exact string equality.

mod image_id;

pub use image_id::ImageId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Input is not a version-4 UUID in hyphenated form
    #[error("Invalid image id format: {0}")]
    InvalidFormat(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
