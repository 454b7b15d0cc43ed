/// Surface capture: RGBA pixels in, encoded image handle out

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::frame::{EncodedImage, ImageFormat, ImageHandle};
use crate::{Error, Result};

/// A drawing surface whose current pixels can be read as tightly packed RGBA8.
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);
    /// Row-major RGBA8 pixels, `width * height * 4` bytes
    fn rgba(&self) -> &[u8];
}

impl Surface for RgbaImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn rgba(&self) -> &[u8] {
        self.as_raw()
    }
}

/// Owned pixel buffer, e.g. the framebuffer of a software renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PixelSurface {
    /// Surface filled with one colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self { width, height, pixels }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rgba(&self) -> &[u8] {
        &self.pixels
    }
}

/// How a surface is encoded on capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodingOptions {
    pub format: ImageFormat,
    /// 0.0 to 1.0; only used by JPEG
    pub quality: f32,
}

impl EncodingOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(Error::InvalidConfig(format!(
                "quality must be within 0.0..=1.0, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Jpeg,
            quality: 0.95,
        }
    }
}

/// Encode the current pixels of `surface`.
///
/// JPEG output drops the alpha channel.
pub fn capture<S: Surface + ?Sized>(surface: &S, options: &EncodingOptions) -> Result<ImageHandle> {
    options.validate()?;
    let (width, height) = surface.size();
    let rgba = surface.rgba();
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || rgba.len() != expected {
        return Err(Error::InvalidFrame(format!(
            "surface {}x{} has {} bytes, expected {}",
            width,
            height,
            rgba.len(),
            expected
        )));
    }

    let mut data = Vec::new();
    match options.format {
        ImageFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            JpegEncoder::new_with_quality(&mut data, options.jpeg_quality()).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        ImageFormat::Png => {
            PngEncoder::new(&mut data).write_image(rgba, width, height, ExtendedColorType::Rgba8)?;
        }
    }

    debug!(
        "captured {}x{} surface as {:?} ({} bytes)",
        width,
        height,
        options.format,
        data.len()
    );
    Ok(ImageHandle::new(EncodedImage::new(options.format, width, height, data)))
}

/// Wrap an already encoded PNG or JPEG blob, reading its format and pixel
/// size from the header.
pub fn import_encoded(data: Vec<u8>) -> Result<ImageHandle> {
    if data.is_empty() {
        return Err(Error::InvalidFrame("encoded image is empty".to_string()));
    }
    let format = match image::guess_format(&data)? {
        image::ImageFormat::Png => ImageFormat::Png,
        image::ImageFormat::Jpeg => ImageFormat::Jpeg,
        other => {
            return Err(Error::CaptureFailed(format!(
                "unsupported image format {:?}",
                other
            )))
        }
    };
    let (width, height) = ImageReader::with_format(Cursor::new(&data), to_codec_format(format)).into_dimensions()?;
    Ok(ImageHandle::new(EncodedImage::new(format, width, height, data)))
}

pub(crate) fn to_codec_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Png => image::ImageFormat::Png,
    }
}
