//! Flat image records.
//!
//! [`ImageRecord`] is the self-contained record the upload flow persists: where the bytes live,
//! what the uploader said about them, and how big they are. It is fully validated at
//! construction and immutable afterwards. Deserialisation re-checks the rules that do not depend
//! on an [`ImagePolicy`], so a record written under any policy reads back unchanged.

use crate::constants::IMAGE_RECORD_KIND;
use crate::error::{ImageError, ImageResult};
use crate::media_type::MediaType;
use crate::policy::ImagePolicy;
use crate::store::StoredRecord;
use chrono::{DateTime, Utc};
use imgvault_types::{Labels, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pixel dimensions of an image; both sides strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DimensionsDto")]
pub struct Dimensions {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct DimensionsDto {
    width: u32,
    height: u32,
}

impl TryFrom<DimensionsDto> for Dimensions {
    type Error = ImageError;

    fn try_from(dto: DimensionsDto) -> Result<Self, Self::Error> {
        Dimensions::new(dto.width, dto.height)
    }
}

impl Dimensions {
    /// # Errors
    ///
    /// [`ImageError::InvalidDimensions`] if either side is zero.
    pub fn new(width: u32, height: u32) -> ImageResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Unvalidated input for [`ImageRecord::create`].
#[derive(Debug, Clone)]
pub struct NewImageRecord {
    pub id: String,
    pub filename: String,
    pub file_path: PathBuf,
    pub caption: String,
    pub labels: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
    pub file_size: u64,
    pub mime_type: String,
    pub metadata: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ImageRecordDto", into = "ImageRecordDto")]
pub struct ImageRecord {
    id: String,
    filename: NonEmptyText,
    file_path: PathBuf,
    caption: NonEmptyText,
    labels: Labels,
    uploaded_at: DateTime<Utc>,
    file_size: u64,
    mime_type: String,
    metadata: Dimensions,
}

impl ImageRecord {
    /// Validates `fields` against [`ImagePolicy::upload`].
    pub fn create(fields: NewImageRecord) -> ImageResult<Self> {
        Self::create_with_policy(fields, &ImagePolicy::upload())
    }

    /// Validates `fields` against an explicit policy.
    ///
    /// Checks run in this order and stop at the first failure: filename, size, media type,
    /// caption, labels. The caption is stored trimmed and blank labels are dropped.
    ///
    /// # Errors
    ///
    /// [`ImageError::EmptyFilename`], [`ImageError::InvalidSize`],
    /// [`ImageError::SizeExceeded`], [`ImageError::UnsupportedMimeType`],
    /// [`ImageError::EmptyCaption`] or [`ImageError::NoLabels`].
    pub fn create_with_policy(fields: NewImageRecord, policy: &ImagePolicy) -> ImageResult<Self> {
        Self::build(fields, Some(policy))
    }

    /// Rebuilds a persisted record. Policy rules are not re-applied: the size only has to be
    /// positive and the media type only has to be a supported one.
    fn from_stored(fields: NewImageRecord) -> ImageResult<Self> {
        Self::build(fields, None)
    }

    fn build(fields: NewImageRecord, policy: Option<&ImagePolicy>) -> ImageResult<Self> {
        let filename = NonEmptyText::new(&fields.filename).map_err(|_| ImageError::EmptyFilename)?;
        match policy {
            Some(policy) => {
                policy.check_size(fields.file_size)?;
                policy.check_media_type(&fields.mime_type)?;
            }
            None => {
                if fields.file_size == 0 {
                    return Err(ImageError::InvalidSize);
                }
                MediaType::from_mime_type(&fields.mime_type)?;
            }
        }
        let caption = NonEmptyText::new(&fields.caption).map_err(|_| ImageError::EmptyCaption)?;
        let labels = Labels::new(fields.labels).map_err(|_| ImageError::NoLabels)?;

        Ok(Self {
            id: fields.id,
            filename,
            file_path: fields.file_path,
            caption,
            labels,
            uploaded_at: fields.uploaded_at,
            file_size: fields.file_size,
            mime_type: fields.mime_type,
            metadata: fields.metadata,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn filename(&self) -> &str {
        self.filename.as_str()
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn caption(&self) -> &str {
        self.caption.as_str()
    }

    pub fn labels(&self) -> &[String] {
        self.labels.as_slice()
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn metadata(&self) -> Dimensions {
        self.metadata
    }
}

impl StoredRecord for ImageRecord {
    const KIND: &'static str = IMAGE_RECORD_KIND;

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// On-disk shape of an [`ImageRecord`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageRecordDto {
    id: String,
    filename: String,
    file_path: PathBuf,
    caption: String,
    labels: Vec<String>,
    uploaded_at: DateTime<Utc>,
    file_size: u64,
    mime_type: String,
    metadata: Dimensions,
}

impl TryFrom<ImageRecordDto> for ImageRecord {
    type Error = ImageError;

    fn try_from(dto: ImageRecordDto) -> Result<Self, Self::Error> {
        ImageRecord::from_stored(NewImageRecord {
            id: dto.id,
            filename: dto.filename,
            file_path: dto.file_path,
            caption: dto.caption,
            labels: dto.labels,
            uploaded_at: dto.uploaded_at,
            file_size: dto.file_size,
            mime_type: dto.mime_type,
            metadata: dto.metadata,
        })
    }
}

impl From<ImageRecord> for ImageRecordDto {
    fn from(record: ImageRecord) -> Self {
        Self {
            id: record.id,
            filename: record.filename.into_string(),
            file_path: record.file_path,
            caption: record.caption.into_string(),
            labels: record.labels.into_vec(),
            uploaded_at: record.uploaded_at,
            file_size: record.file_size,
            mime_type: record.mime_type,
            metadata: record.metadata,
        }
    }
}
