//! Texture and material registry.
//!
//! Textures live in an ordered table whose index doubles as the texture unit
//! the texture is bound to, so the table can never grow past
//! [`MAX_TEXTURE_UNITS`]. Materials are a plain ordered list. Both are filled
//! once while the scene loads and only read afterwards.
//!
//! Tags are not deduplicated. Lookups scan in insertion order and return the
//! first match.

use std::path::Path;

use crate::{
    data_structures::material::Material,
    error::{TextureError, TextureResult},
    resources::texture::{DecodedImage, decode_image},
};

/// Number of texture units a fragment shader can sample from.
pub const MAX_TEXTURE_UNITS: usize = 16;

/// GPU side of texture registration.
///
/// `upload` creates a 2D texture with repeat wrapping, linear filtering and a
/// full mip chain. `bind` attaches an uploaded texture to a texture unit.
pub trait TextureUploader {
    type Handle: Copy + std::fmt::Debug;

    fn upload(&mut self, image: &DecodedImage, label: &str) -> TextureResult<Self::Handle>;
    fn bind(&mut self, unit: usize, handle: Self::Handle);
    fn release(&mut self, handle: Self::Handle);
}

#[derive(Clone, Debug)]
pub struct TextureEntry<H> {
    pub tag: String,
    pub handle: H,
}

#[derive(Debug)]
pub struct TextureRegistry<H> {
    entries: Vec<TextureEntry<H>>,
}

impl<H> Default for TextureRegistry<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Copy + std::fmt::Debug> TextureRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode `path`, upload it and register it under `tag`.
    ///
    /// Returns the texture unit the texture will be bound to. On any failure
    /// the table is left untouched.
    pub fn register_texture<U>(
        &mut self,
        uploader: &mut U,
        path: &Path,
        tag: &str,
    ) -> TextureResult<usize>
    where
        U: TextureUploader<Handle = H>,
    {
        let result = self.try_register(uploader, path, tag);
        if let Err(e) = &result {
            log::error!("Could not load image {}: {}", path.display(), e);
        }
        result
    }

    fn try_register<U>(&mut self, uploader: &mut U, path: &Path, tag: &str) -> TextureResult<usize>
    where
        U: TextureUploader<Handle = H>,
    {
        if self.entries.len() >= MAX_TEXTURE_UNITS {
            return Err(TextureError::CapacityExceeded {
                capacity: MAX_TEXTURE_UNITS,
            });
        }
        let image = decode_image(path)?;
        if image.channels != 3 && image.channels != 4 {
            return Err(TextureError::UnsupportedChannels(image.channels));
        }
        log::info!(
            "Successfully loaded image: {}, width: {}, height: {}, channels: {}",
            path.display(),
            image.width,
            image.height,
            image.channels
        );
        let handle = uploader.upload(&image, tag)?;
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
        });
        Ok(self.entries.len() - 1)
    }

    /// Bind every registered texture to the unit matching its position.
    pub fn bind_all_textures<U>(&self, uploader: &mut U)
    where
        U: TextureUploader<Handle = H>,
    {
        for (unit, entry) in self.entries.iter().enumerate() {
            uploader.bind(unit, entry.handle);
        }
    }

    pub fn find_texture_unit(&self, tag: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.tag == tag)
    }

    pub fn find_texture_handle(&self, tag: &str) -> Option<H> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.handle)
    }

    /// Release all GPU textures and empty the table.
    pub fn destroy_textures<U>(&mut self, uploader: &mut U)
    where
        U: TextureUploader<Handle = H>,
    {
        for entry in self.entries.drain(..) {
            log::debug!("releasing texture {}", entry.tag);
            uploader.release(entry.handle);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn register_material(&mut self, material: Material) {
        self.materials.push(material);
    }

    /// First material registered under `tag`, if any.
    pub fn find_material(&self, tag: &str) -> Option<&Material> {
        self.materials.iter().find(|material| material.tag == tag)
    }
}
