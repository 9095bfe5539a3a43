//! Raw image bytes with a base64 view.
//!
//! [`ImageContent`] owns exactly one decoded byte buffer. Content supplied as base64 is decoded
//! once at construction and the text form is re-derived on demand, so the two views can never
//! disagree and size/equality are always measured on decoded bytes.

use crate::error::{ImageError, ImageResult};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use std::fmt;

/// Standard alphabet; padding optional on input, always written on output.
const CONTENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const MAX_PADDING: usize = 2;

#[derive(Clone, PartialEq, Eq)]
pub struct ImageContent {
    bytes: Vec<u8>,
}

impl ImageContent {
    /// Builds content from base64 text.
    ///
    /// # Errors
    ///
    /// - [`ImageError::EmptyContent`] if `encoded` is empty
    /// - [`ImageError::InvalidEncoding`] if it is not `[A-Za-z0-9+/]*` followed by at most two
    ///   `=`, or does not decode
    pub fn from_base64(encoded: &str) -> ImageResult<Self> {
        if encoded.is_empty() {
            return Err(ImageError::EmptyContent);
        }
        check_base64_grammar(encoded)?;

        let bytes = CONTENT_ENGINE
            .decode(encoded)
            .map_err(|e| ImageError::InvalidEncoding(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    /// Builds content from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::EmptyContent`] if `bytes` is empty.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> ImageResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ImageError::EmptyContent);
        }
        Ok(Self { bytes })
    }

    pub fn to_base64(&self) -> String {
        CONTENT_ENGINE.encode(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoded size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Unreachable through the constructors, which reject empty input.
    pub fn is_empty(&self) -> bool {
        self.size_bytes() == 0
    }

    pub fn within_limit(&self, max_bytes: u64) -> bool {
        self.size_bytes() <= max_bytes
    }
}

impl fmt::Debug for ImageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageContent")
            .field("size_bytes", &self.size_bytes())
            .finish()
    }
}

fn check_base64_grammar(encoded: &str) -> ImageResult<()> {
    let body_len = encoded.trim_end_matches('=').len();
    let (body, padding) = encoded.split_at(body_len);

    if padding.len() > MAX_PADDING {
        return Err(ImageError::InvalidEncoding(format!(
            "at most {} padding characters allowed, found {}",
            MAX_PADDING,
            padding.len()
        )));
    }

    if let Some(bad) = body
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '+' || *c == '/'))
    {
        return Err(ImageError::InvalidEncoding(format!(
            "unexpected character {:?}",
            bad
        )));
    }

    Ok(())
}
