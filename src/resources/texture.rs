use std::path::Path;

use image::{DynamicImage, GenericImageView};

use crate::error::{TextureError, TextureResult};

/// Decoded pixel data ready for upload.
///
/// Pixels are tightly packed with `channels` bytes per texel. Rows are
/// already flipped so the first row is the bottom of the source image, which
/// is what a texture coordinate of `v = 0` samples.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl DecodedImage {
    /// Expand to four channels. RGB gets an opaque alpha channel.
    pub fn to_rgba8(&self) -> TextureResult<Vec<u8>> {
        match self.channels {
            4 => Ok(self.pixels.clone()),
            3 => Ok(self
                .pixels
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect()),
            n => Err(TextureError::UnsupportedChannels(n)),
        }
    }
}

pub fn load_binary(path: &Path) -> TextureResult<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

/// Read and decode an image file, flipping it vertically.
pub fn decode_image(path: &Path) -> TextureResult<DecodedImage> {
    let data = load_binary(path)?;
    decode_image_bytes(&data)
}

/// Decode encoded image bytes (PNG, JPEG, ...), flipping them vertically.
///
/// The channel count is the one stored in the file. Formats with more than
/// eight bits per channel are narrowed to eight bits but keep their channel
/// count.
pub fn decode_image_bytes(bytes: &[u8]) -> TextureResult<DecodedImage> {
    let img = image::load_from_memory(bytes)?.flipv();
    let (width, height) = img.dimensions();
    let channels = img.color().channel_count();
    let pixels = match channels {
        1 => img.to_luma8().into_raw(),
        2 => img.to_luma_alpha8().into_raw(),
        3 => img.to_rgb8().into_raw(),
        _ => to_rgba(img).into_raw(),
    };
    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
    })
}

fn to_rgba(img: DynamicImage) -> image::RgbaImage {
    match img {
        DynamicImage::ImageRgba8(rgba) => rgba,
        other => other.to_rgba8(),
    }
}
