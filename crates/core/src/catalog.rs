//! Catalog of image aggregates.
//!
//! [`ImageCatalog`] persists [`Image`] values as [`ImageSnapshot`]s in their own store file. Every
//! snapshot read back goes through [`Image::reconstruct`], so a hand-edited file with a mismatched
//! extension and media type surfaces as a validation error rather than a bad image.

use crate::config::CoreConfig;
use crate::content::ImageContent;
use crate::error::ServiceResult;
use crate::image::{Image, ImageSnapshot};
use crate::policy::ImagePolicy;
use crate::store::JsonStore;

#[derive(Debug)]
pub struct ImageCatalog {
    store: JsonStore<ImageSnapshot>,
    policy: ImagePolicy,
}

impl ImageCatalog {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            store: JsonStore::new(cfg.entities_file()),
            policy: cfg.library_policy(),
        }
    }

    /// Replaces the validation rules applied on import and content replacement.
    pub fn with_policy(mut self, policy: ImagePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Creates an image from `file_name` and `content`, validates it and stores it.
    ///
    /// Extension and media type are both derived from `file_name`.
    pub fn import(&self, file_name: &str, content: ImageContent) -> ServiceResult<Image> {
        let image = Image::create_from_file_name(file_name, content)?;
        image.validate_against(&self.policy)?;

        self.store.save(image.to_snapshot())?;
        tracing::info!(
            id = %image.id(),
            media_type = %image.media_type(),
            size = image.size_bytes(),
            "image imported"
        );
        Ok(image)
    }

    pub fn get(&self, id: &str) -> ServiceResult<Option<Image>> {
        match self.store.find_by_id(id)? {
            Some(snapshot) => Ok(Some(Image::from_snapshot(&snapshot)?)),
            None => Ok(None),
        }
    }

    pub fn list(&self) -> ServiceResult<Vec<Image>> {
        let images = self
            .store
            .find_all()?
            .iter()
            .map(Image::from_snapshot)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(images)
    }

    /// Swaps the content of the image with `id`, refreshing its `updated_at`.
    ///
    /// Returns `None` if there is no such image. The new content must satisfy the catalog policy.
    pub fn replace_content(&self, id: &str, content: ImageContent) -> ServiceResult<Option<Image>> {
        let Some(mut image) = self.get(id)? else {
            return Ok(None);
        };

        image.replace_content(content);
        image.validate_against(&self.policy)?;

        self.store.save(image.to_snapshot())?;
        tracing::info!(id, size = image.size_bytes(), "image content replaced");
        Ok(Some(image))
    }

    /// Returns `false` if there is no image with `id`.
    pub fn remove(&self, id: &str) -> ServiceResult<bool> {
        let removed = self.store.delete_by_id(id)?;
        if removed {
            tracing::info!(id, "image removed");
        }
        Ok(removed)
    }
}
