//! Image media (MIME) types and their mapping to [`Extension`].
//!
//! The forward table lives in [`Extension::media_type`]; the inverse here is derived from it by
//! scanning [`Extension::ALL`] in order, so the two directions cannot drift apart. Two of the
//! supported types (`image/jpg`, `image/vnd.microsoft.icon`) are accepted aliases with no forward
//! entry and therefore no inverse.

use crate::error::{ImageError, ImageResult};
use crate::extension::Extension;
use std::fmt;
use std::str::FromStr;

/// A supported image media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Jpeg,
    Jpg,
    Png,
    Gif,
    Bmp,
    Webp,
    SvgXml,
    Tiff,
    XIcon,
    VndMicrosoftIcon,
}

impl MediaType {
    pub const ALL: [MediaType; 10] = [
        MediaType::Jpeg,
        MediaType::Jpg,
        MediaType::Png,
        MediaType::Gif,
        MediaType::Bmp,
        MediaType::Webp,
        MediaType::SvgXml,
        MediaType::Tiff,
        MediaType::XIcon,
        MediaType::VndMicrosoftIcon,
    ];

    /// Parses a MIME type string, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnsupportedMimeType`] unless the lowercased input starts with
    /// `image/` and is one of the supported types.
    pub fn from_mime_type(input: &str) -> ImageResult<Self> {
        let normalised = input.to_lowercase();
        if !normalised.starts_with("image/") {
            return Err(ImageError::UnsupportedMimeType(input.to_owned()));
        }

        Self::ALL
            .into_iter()
            .find(|media_type| media_type.as_str() == normalised)
            .ok_or_else(|| ImageError::UnsupportedMimeType(input.to_owned()))
    }

    /// Looks up the media type for an extension token through the forward table.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnsupportedExtension`] if the token is not a supported extension.
    pub fn from_extension(extension: &str) -> ImageResult<Self> {
        Extension::parse(extension).map(|ext| ext.media_type())
    }

    /// Inverse lookup: the first extension whose forward entry is this media type.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::NoMatchingExtension`] for alias types with no forward entry.
    pub fn to_extension(&self) -> ImageResult<Extension> {
        Extension::ALL
            .into_iter()
            .find(|ext| ext.media_type() == *self)
            .ok_or_else(|| ImageError::NoMatchingExtension(self.as_str().to_owned()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Jpg => "image/jpg",
            MediaType::Png => "image/png",
            MediaType::Gif => "image/gif",
            MediaType::Bmp => "image/bmp",
            MediaType::Webp => "image/webp",
            MediaType::SvgXml => "image/svg+xml",
            MediaType::Tiff => "image/tiff",
            MediaType::XIcon => "image/x-icon",
            MediaType::VndMicrosoftIcon => "image/vnd.microsoft.icon",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::from_mime_type(s)
    }
}

impl serde::Serialize for MediaType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for MediaType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MediaType::from_mime_type(&s).map_err(serde::de::Error::custom)
    }
}
