//! The image aggregate.
//!
//! [`Image`] binds an identifier, content, extension and media type together. Every path that
//! builds one (fresh creation, creation from a file name, reconstruction from storage) recomputes
//! the media type the extension maps to and refuses to proceed if the supplied media type
//! differs. There is no stored "already validated" flag to bypass.
//!
//! Equality is identity: two `Image` values with the same [`ImageId`] are the same logical image,
//! even if one is a stale copy.

use crate::constants::IMAGE_ENTITY_KIND;
use crate::content::ImageContent;
use crate::error::{ImageError, ImageResult};
use crate::extension::Extension;
use crate::media_type::MediaType;
use crate::policy::ImagePolicy;
use crate::store::StoredRecord;
use chrono::{DateTime, Utc};
use imgvault_uuid::ImageId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Image {
    id: ImageId,
    content: ImageContent,
    extension: Extension,
    media_type: MediaType,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Image {
    /// Creates a new image with a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InconsistentMediaType`] if `media_type` is not the media type
    /// `extension` maps to.
    pub fn create(
        content: ImageContent,
        extension: Extension,
        media_type: MediaType,
    ) -> ImageResult<Self> {
        Self::create_with_id(ImageId::generate(), content, extension, media_type)
    }

    /// As [`Image::create`], with a caller-allocated identifier.
    pub fn create_with_id(
        id: ImageId,
        content: ImageContent,
        extension: Extension,
        media_type: MediaType,
    ) -> ImageResult<Self> {
        check_consistency(extension, media_type)?;

        let now = Utc::now();
        Ok(Self {
            id,
            content,
            extension,
            media_type,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a new image, deriving extension and media type from `file_name`.
    ///
    /// # Errors
    ///
    /// Any error of [`Extension::from_file_name`].
    pub fn create_from_file_name(file_name: &str, content: ImageContent) -> ImageResult<Self> {
        let extension = Extension::from_file_name(file_name)?;
        let media_type = MediaType::from_extension(extension.as_str())?;
        Self::create(content, extension, media_type)
    }

    /// Rebuilds an image from persisted fields, keeping both timestamps verbatim.
    ///
    /// # Errors
    ///
    /// Any value-object error for `id`, `extension` or `mime_type`, then
    /// [`ImageError::InconsistentMediaType`].
    pub fn reconstruct(
        id: &str,
        content: ImageContent,
        extension: &str,
        mime_type: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> ImageResult<Self> {
        let id = ImageId::parse(id)?;
        let extension = Extension::parse(extension)?;
        let media_type = MediaType::from_mime_type(mime_type)?;
        check_consistency(extension, media_type)?;

        Ok(Self {
            id,
            content,
            extension,
            media_type,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> &ImageId {
        &self.id
    }

    pub fn content(&self) -> &ImageContent {
        &self.content
    }

    pub fn extension(&self) -> Extension {
        self.extension
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Canonical stored file name: `<id>.<extension>`.
    pub fn generate_file_name(&self) -> String {
        format!("{}{}", self.id, self.extension.with_dot())
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.size_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn within_limit(&self, max_bytes: u64) -> bool {
        self.content.within_limit(max_bytes)
    }

    /// Checks media type and size against a deployment policy.
    pub fn validate_against(&self, policy: &ImagePolicy) -> ImageResult<()> {
        policy.check_media_type(self.media_type.as_str())?;
        policy.check_size(self.size_bytes())
    }

    /// Swaps the content and refreshes `updated_at`. Identity, format and `created_at` stay.
    pub fn replace_content(&mut self, content: ImageContent) {
        self.content = content;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            id: self.id.to_string(),
            extension: self.extension,
            media_type: self.media_type,
            size: self.size_bytes(),
            file_name: self.generate_file_name(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn to_snapshot(&self) -> ImageSnapshot {
        ImageSnapshot {
            id: self.id.to_string(),
            extension: self.extension.as_str().to_owned(),
            media_type: self.media_type.as_str().to_owned(),
            content: self.content.to_base64(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Rebuilds an image from its persisted form via [`Image::reconstruct`].
    pub fn from_snapshot(snapshot: &ImageSnapshot) -> ImageResult<Self> {
        let content = ImageContent::from_base64(&snapshot.content)?;
        Self::reconstruct(
            &snapshot.id,
            content,
            &snapshot.extension,
            &snapshot.media_type,
            snapshot.created_at,
            snapshot.updated_at,
        )
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Image {}

fn check_consistency(extension: Extension, media_type: MediaType) -> ImageResult<()> {
    let expected = MediaType::from_extension(extension.as_str())?;
    if expected != media_type {
        return Err(ImageError::InconsistentMediaType {
            extension: extension.as_str().to_owned(),
            media_type: media_type.as_str().to_owned(),
            expected: expected.as_str().to_owned(),
        });
    }
    Ok(())
}

/// Read-only summary of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub id: String,
    pub extension: Extension,
    pub media_type: MediaType,
    pub size: u64,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted form of an [`Image`]. Fields are stored as plain strings and are only trusted
/// after [`Image::from_snapshot`] has re-run validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSnapshot {
    pub id: String,
    pub extension: String,
    pub media_type: String,
    /// base64
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredRecord for ImageSnapshot {
    const KIND: &'static str = IMAGE_ENTITY_KIND;

    fn record_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn content() -> ImageContent {
        ImageContent::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap()
    }

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_create_consistent_pair() {
        let image = Image::create(content(), Extension::Jpg, MediaType::Jpeg).unwrap();

        assert_eq!(image.extension(), Extension::Jpg);
        assert_eq!(image.media_type(), MediaType::Jpeg);
        assert_eq!(image.created_at(), image.updated_at());
        assert!(ImageId::is_valid(image.id().as_str()));
    }

    #[test]
    fn test_create_inconsistent_pair() {
        let result = Image::create(content(), Extension::Jpg, MediaType::Png);

        match result {
            Err(ImageError::InconsistentMediaType {
                extension,
                media_type,
                expected,
            }) => {
                assert_eq!(extension, "jpg");
                assert_eq!(media_type, "image/png");
                assert_eq!(expected, "image/jpeg");
            }
            other => panic!("Expected InconsistentMediaType, got {:?}", other),
        }
    }

    #[test]
    fn test_consistency_over_every_pair() {
        for ext in Extension::ALL {
            for media_type in MediaType::ALL {
                let result = Image::create(content(), ext, media_type);
                let expected = MediaType::from_extension(ext.as_str()).unwrap();
                if expected == media_type {
                    assert!(result.is_ok(), "{} / {} rejected", ext, media_type);
                } else {
                    assert!(
                        matches!(result, Err(ImageError::InconsistentMediaType { .. })),
                        "{} / {} accepted",
                        ext,
                        media_type
                    );
                }
            }
        }
    }

    #[test]
    fn test_alias_media_types_never_consistent() {
        assert!(Image::create(content(), Extension::Jpg, MediaType::Jpg).is_err());
        assert!(Image::create(content(), Extension::Ico, MediaType::VndMicrosoftIcon).is_err());
        assert!(Image::create(content(), Extension::Ico, MediaType::XIcon).is_ok());
    }

    #[test]
    fn test_create_from_file_name() {
        let image = Image::create_from_file_name("holiday.PNG", content()).unwrap();

        assert_eq!(image.extension(), Extension::Png);
        assert_eq!(image.media_type(), MediaType::Png);
    }

    #[test]
    fn test_create_from_file_name_errors() {
        assert!(matches!(
            Image::create_from_file_name("holiday", content()),
            Err(ImageError::MissingExtension(_))
        ));
        assert!(matches!(
            Image::create_from_file_name("holiday.heic", content()),
            Err(ImageError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_generate_file_name() {
        let id = ImageId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let image = Image::create_with_id(id, content(), Extension::Webp, MediaType::Webp).unwrap();

        assert_eq!(
            image.generate_file_name(),
            "550e8400-e29b-41d4-a716-446655440000.webp"
        );
    }

    #[test]
    fn test_reconstruct_keeps_timestamps() {
        let image = Image::reconstruct(
            "550e8400-e29b-41d4-a716-446655440000",
            content(),
            "JPEG",
            "image/jpeg",
            at(2020),
            at(2021),
        )
        .unwrap();

        assert_eq!(image.created_at(), at(2020));
        assert_eq!(image.updated_at(), at(2021));
        assert_eq!(image.extension(), Extension::Jpeg);
    }

    #[test]
    fn test_reconstruct_propagates_value_object_errors() {
        let bad_id = Image::reconstruct("nope", content(), "jpg", "image/jpeg", at(2020), at(2020));
        assert!(matches!(bad_id, Err(ImageError::InvalidFormat(_))));

        let bad_ext = Image::reconstruct(
            "550e8400-e29b-41d4-a716-446655440000",
            content(),
            "exe",
            "image/jpeg",
            at(2020),
            at(2020),
        );
        assert!(matches!(bad_ext, Err(ImageError::UnsupportedExtension(_))));

        let bad_mime = Image::reconstruct(
            "550e8400-e29b-41d4-a716-446655440000",
            content(),
            "jpg",
            "text/html",
            at(2020),
            at(2020),
        );
        assert!(matches!(bad_mime, Err(ImageError::UnsupportedMimeType(_))));
    }

    #[test]
    fn test_reconstruct_runs_consistency_check() {
        let result = Image::reconstruct(
            "550e8400-e29b-41d4-a716-446655440000",
            content(),
            "gif",
            "image/png",
            at(2020),
            at(2020),
        );
        assert!(matches!(
            result,
            Err(ImageError::InconsistentMediaType { .. })
        ));
    }

    #[test]
    fn test_equality_is_identity() {
        let original = Image::reconstruct(
            "550e8400-e29b-41d4-a716-446655440000",
            content(),
            "jpg",
            "image/jpeg",
            at(2020),
            at(2020),
        )
        .unwrap();
        let stale = Image::reconstruct(
            "550e8400-e29b-41d4-a716-446655440000",
            ImageContent::from_bytes(vec![1, 2, 3]).unwrap(),
            "png",
            "image/png",
            at(2019),
            at(2019),
        )
        .unwrap();
        let other = Image::create(content(), Extension::Jpg, MediaType::Jpeg).unwrap();

        assert_eq!(original, stale);
        assert_ne!(original, other);
    }

    #[test]
    fn test_size_delegation() {
        let image = Image::create(content(), Extension::Jpg, MediaType::Jpeg).unwrap();

        assert_eq!(image.size_bytes(), 5);
        assert!(!image.is_empty());
        assert!(image.within_limit(5));
        assert!(!image.within_limit(4));
    }

    #[test]
    fn test_replace_content_touches_updated_at_only() {
        let mut image = Image::reconstruct(
            "550e8400-e29b-41d4-a716-446655440000",
            content(),
            "jpg",
            "image/jpeg",
            at(2020),
            at(2021),
        )
        .unwrap();

        let replacement = ImageContent::from_bytes(vec![9; 16]).unwrap();
        image.replace_content(replacement.clone());

        assert_eq!(image.content(), &replacement);
        assert_eq!(image.created_at(), at(2020));
        assert!(image.updated_at() > at(2021));
    }

    #[test]
    fn test_validate_against_policy() {
        let gif = Image::create(content(), Extension::Gif, MediaType::Gif).unwrap();

        assert!(gif.validate_against(&ImagePolicy::library()).is_ok());
        assert!(matches!(
            gif.validate_against(&ImagePolicy::upload()),
            Err(ImageError::UnsupportedMimeType(_))
        ));
        assert!(matches!(
            gif.validate_against(&ImagePolicy::library().with_max_size(4)),
            Err(ImageError::SizeExceeded { .. })
        ));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let image = Image::create_from_file_name("logo.svg", content()).unwrap();
        let snapshot = image.to_snapshot();

        assert_eq!(snapshot.media_type, "image/svg+xml");
        assert_eq!(snapshot.content, content().to_base64());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("mediaType").is_some());
        assert!(json.get("createdAt").is_some());

        let back = Image::from_snapshot(&snapshot).unwrap();
        assert_eq!(back, image);
        assert_eq!(back.content(), image.content());
        assert_eq!(back.created_at(), image.created_at());
        assert_eq!(back.updated_at(), image.updated_at());
    }

    #[test]
    fn test_from_snapshot_rejects_tampered_media_type() {
        let mut snapshot = Image::create_from_file_name("a.png", content())
            .unwrap()
            .to_snapshot();
        snapshot.media_type = "image/gif".into();

        assert!(matches!(
            Image::from_snapshot(&snapshot),
            Err(ImageError::InconsistentMediaType { .. })
        ));
    }

    #[test]
    fn test_info() {
        let image = Image::create_from_file_name("a.tiff", content()).unwrap();
        let info = image.info();

        assert_eq!(info.id, image.id().to_string());
        assert_eq!(info.size, 5);
        assert_eq!(info.file_name, image.generate_file_name());
        assert_eq!(info.media_type, MediaType::Tiff);
    }
}
