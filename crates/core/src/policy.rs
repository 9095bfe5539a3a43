//! Validation rule sets.
//!
//! Both domain models share one implementation of the "which media types, how large" rules. A
//! deployment picks the policy; the flat upload flow uses [`ImagePolicy::upload`], the aggregate
//! flow defaults to [`ImagePolicy::library`].

use crate::constants::MAX_FILE_SIZE;
use crate::error::{ImageError, ImageResult};
use crate::media_type::MediaType;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePolicy {
    allowed_media_types: BTreeSet<String>,
    max_size_bytes: u64,
}

impl ImagePolicy {
    /// Builds a policy from explicit media type strings (matched exactly) and a size cap.
    pub fn new<I, S>(allowed_media_types: I, max_size_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_media_types: allowed_media_types.into_iter().map(Into::into).collect(),
            max_size_bytes,
        }
    }

    /// Flat record rules: `image/jpeg` and `image/png` only, at most 10 MiB.
    pub fn upload() -> Self {
        Self::new([MediaType::Jpeg.as_str(), MediaType::Png.as_str()], MAX_FILE_SIZE)
    }

    /// Every supported media type, at most 10 MiB.
    pub fn library() -> Self {
        Self::new(MediaType::ALL.iter().map(|m| m.as_str()), MAX_FILE_SIZE)
    }

    /// Returns a copy with a different size cap.
    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn allows(&self, media_type: &str) -> bool {
        self.allowed_media_types.contains(media_type)
    }

    /// # Errors
    ///
    /// [`ImageError::InvalidSize`] for zero, [`ImageError::SizeExceeded`] above the cap.
    pub fn check_size(&self, size: u64) -> ImageResult<()> {
        if size == 0 {
            return Err(ImageError::InvalidSize);
        }
        if size > self.max_size_bytes {
            return Err(ImageError::SizeExceeded {
                size,
                limit: self.max_size_bytes,
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// [`ImageError::UnsupportedMimeType`] unless `media_type` is in the allowed set.
    pub fn check_media_type(&self, media_type: &str) -> ImageResult<()> {
        if self.allows(media_type) {
            Ok(())
        } else {
            Err(ImageError::UnsupportedMimeType(media_type.to_owned()))
        }
    }
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self::upload()
    }
}
