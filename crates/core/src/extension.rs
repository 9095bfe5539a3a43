//! Image file extensions.
//!
//! [`Extension`] is a closed set of the extensions imgvault accepts. Construction normalises the
//! input (one leading dot stripped, lowercased) and rejects anything outside the set, so a held
//! value is always one of the supported tokens.

use crate::error::{ImageError, ImageResult};
use crate::media_type::MediaType;
use std::fmt;
use std::str::FromStr;

/// A supported image file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Jpg,
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Svg,
    Tiff,
    Ico,
}

impl Extension {
    /// Every supported extension, in mapping-table order.
    ///
    /// The inverse media type lookup scans this order, so the first extension listed for a
    /// media type wins (`image/jpeg` resolves to `jpg`).
    pub const ALL: [Extension; 9] = [
        Extension::Jpg,
        Extension::Jpeg,
        Extension::Png,
        Extension::Gif,
        Extension::Bmp,
        Extension::Webp,
        Extension::Svg,
        Extension::Tiff,
        Extension::Ico,
    ];

    /// Parses an extension token such as `"png"`, `".PNG"` or `"Jpeg"`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnsupportedExtension`] if the normalised token is empty, contains
    /// non-alphanumeric characters, or is not in the supported set.
    pub fn parse(input: &str) -> ImageResult<Self> {
        let normalised = input.strip_prefix('.').unwrap_or(input).to_lowercase();

        if normalised.is_empty() || !normalised.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ImageError::UnsupportedExtension(input.to_owned()));
        }

        Self::ALL
            .into_iter()
            .find(|ext| ext.as_str() == normalised)
            .ok_or_else(|| ImageError::UnsupportedExtension(input.to_owned()))
    }

    /// Derives the extension from the text after the last `.` of a file name.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::MissingExtension`] if the name contains no `.`, otherwise any
    /// error from [`Extension::parse`].
    pub fn from_file_name(file_name: &str) -> ImageResult<Self> {
        let (_, ext) = file_name
            .rsplit_once('.')
            .ok_or_else(|| ImageError::MissingExtension(file_name.to_owned()))?;
        Self::parse(ext)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Jpg => "jpg",
            Extension::Jpeg => "jpeg",
            Extension::Png => "png",
            Extension::Gif => "gif",
            Extension::Bmp => "bmp",
            Extension::Webp => "webp",
            Extension::Svg => "svg",
            Extension::Tiff => "tiff",
            Extension::Ico => "ico",
        }
    }

    /// Returns the extension prefixed with a dot, e.g. `".jpg"`.
    pub fn with_dot(&self) -> String {
        format!(".{}", self.as_str())
    }

    /// The forward mapping table: the canonical media type for this extension.
    pub fn media_type(&self) -> MediaType {
        match self {
            Extension::Jpg | Extension::Jpeg => MediaType::Jpeg,
            Extension::Png => MediaType::Png,
            Extension::Gif => MediaType::Gif,
            Extension::Bmp => MediaType::Bmp,
            Extension::Webp => MediaType::Webp,
            Extension::Svg => MediaType::SvgXml,
            Extension::Tiff => MediaType::Tiff,
            Extension::Ico => MediaType::XIcon,
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Extension {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Extension::parse(s)
    }
}

impl serde::Serialize for Extension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Extension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Extension::parse(&s).map_err(serde::de::Error::custom)
    }
}
