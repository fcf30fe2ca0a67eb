//! Error types for resource loading.
//!
//! Everything that can go wrong while turning an image file into a registered
//! texture ends up as a [`TextureError`]. Failed loads leave the registry
//! unchanged. Lookup misses are not errors; they are reported as `None`.

use std::fmt;

/// Result type for texture loading operations.
pub type TextureResult<T> = Result<T, TextureError>;

/// Reasons a texture could not be registered.
#[derive(Debug)]
pub enum TextureError {
    /// The image file could not be read.
    Io(std::io::Error),

    /// The file was read but could not be decoded as an image.
    Decode(image::ImageError),

    /// Only RGB (3) and RGBA (4) images can be uploaded.
    UnsupportedChannels(u8),

    /// Every texture unit is already taken.
    CapacityExceeded { capacity: usize },

    /// The backend refused the upload.
    Upload(String),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Io(e) => write!(f, "could not read image: {}", e),
            TextureError::Decode(e) => write!(f, "could not decode image: {}", e),
            TextureError::UnsupportedChannels(n) => {
                write!(f, "not implemented to handle image with {} channels", n)
            }
            TextureError::CapacityExceeded { capacity } => {
                write!(f, "all {} texture units are in use", capacity)
            }
            TextureError::Upload(msg) => write!(f, "texture upload failed: {}", msg),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io(e) => Some(e),
            TextureError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::Decode(e)
    }
}
