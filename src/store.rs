//! The set of images the user has dropped in.
//!
//! The store is owned by the composition root and only mutated through
//! [`ImageStore::add`], [`ImageStore::remove`] and [`ImageStore::set_active`].
//! Batch runs read a [`snapshot`](ImageStore::snapshot) and never mutate it.

use crate::constants::MAX_FILE_SIZE;
use crate::error::{PackError, Result};
use crate::formats::MediaType;
use crate::processing::decode_image;
use image::GenericImageView;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TrackedImage {
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub media_type: MediaType,
    pub width: u32,
    pub height: u32,
    /// Inactive images stay tracked but are left out of batch runs.
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The name was already tracked; it is active again and keeps its first payload.
    Reactivated,
}

#[derive(Debug, Default)]
pub struct ImageStore {
    images: BTreeMap<String, TrackedImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new image, or re-activate one with the same name.
    ///
    /// A new payload is decoded once to validate it and learn its natural size; the
    /// decoded raster is released before this returns.
    ///
    /// # Errors
    /// * `FileTooLarge` if the payload exceeds `MAX_FILE_SIZE`
    /// * `Decode` if the payload is not a decodable image. The store is left
    ///   untouched, so the image is never tracked.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
        media_type: MediaType,
    ) -> Result<AddOutcome> {
        let name = name.into();

        if let Some(existing) = self.images.get_mut(&name) {
            existing.active = true;
            return Ok(AddOutcome::Reactivated);
        }

        let size = bytes.len() as u64;
        if size > MAX_FILE_SIZE {
            return Err(PackError::FileTooLarge(size, MAX_FILE_SIZE));
        }

        let (width, height) = decode_image(&name, &bytes, media_type)?.dimensions();

        self.images.insert(
            name.clone(),
            TrackedImage {
                name,
                bytes: bytes.into(),
                media_type,
                width,
                height,
                active: true,
            },
        );

        Ok(AddOutcome::Added)
    }

    pub fn remove(&mut self, name: &str) -> Option<TrackedImage> {
        self.images.remove(name)
    }

    pub fn set_active(&mut self, name: &str, active: bool) -> Result<()> {
        let image = self
            .images
            .get_mut(name)
            .ok_or_else(|| PackError::ImageNotFound(name.to_string()))?;
        image.active = active;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TrackedImage> {
        self.images.get(name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.images.values().filter(|image| image.active).count()
    }

    /// Point-in-time copy of the active images, in name order. Payloads are shared,
    /// not copied.
    pub fn snapshot(&self) -> Vec<TrackedImage> {
        self.images
            .values()
            .filter(|image| image.active)
            .cloned()
            .collect()
    }
}
