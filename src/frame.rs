//! Captured frames and the append-only buffer that collects them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Encoding of a captured image blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// An encoded raster image together with its pixel size.
///
/// `id` is the hex SHA-256 of the encoded bytes, so two captures of an
/// identical surface share an id and the document builder can embed them once.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: ImageFormat,
    pub width_px: u32,
    pub height_px: u32,
    pub data: Vec<u8>,
    id: String,
}

impl EncodedImage {
    pub fn new(format: ImageFormat, width_px: u32, height_px: u32, data: Vec<u8>) -> Self {
        let id = hex::encode(Sha256::digest(&data));
        Self {
            format,
            width_px,
            height_px,
            data,
            id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("format", &self.format)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("bytes", &self.data.len())
            .field("id", &self.id)
            .finish()
    }
}

/// Shared, immutable reference to a captured image.
///
/// Cloning is cheap; placement commands carry clones of the handle that was
/// appended to the frame buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle(Arc<EncodedImage>);

impl ImageHandle {
    pub fn new(image: EncodedImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn image(&self) -> &EncodedImage {
        &self.0
    }

    pub fn id(&self) -> &str {
        self.0.id()
    }

    pub fn format(&self) -> ImageFormat {
        self.0.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0.data
    }

    pub fn is_empty(&self) -> bool {
        self.0.data.is_empty()
    }

    /// Width over height of the source pixels.
    pub fn aspect_ratio(&self) -> f64 {
        self.0.width_px as f64 / self.0.height_px as f64
    }

    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidFrame("image handle has no data".to_string()));
        }
        if self.0.width_px == 0 || self.0.height_px == 0 {
            return Err(Error::InvalidFrame(format!(
                "image {} has zero size {}x{}",
                short_id(self.id()),
                self.0.width_px,
                self.0.height_px
            )));
        }
        Ok(())
    }
}

impl Serialize for ImageHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

pub(crate) fn short_id(id: &str) -> &str {
    &id[..id.len().min(12)]
}

/// One unit of the capture sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Image(ImageHandle),
    PageBreak,
}

impl Frame {
    pub fn is_image(&self) -> bool {
        matches!(self, Frame::Image(_))
    }
}

/// Ordered, append-only sequence of frames captured during a session.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    frames: Vec<Frame>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an image frame. Rejects empty or zero-sized images and leaves
    /// the buffer untouched in that case.
    pub fn append(&mut self, image: ImageHandle) -> Result<()> {
        image.validate()?;
        self.frames.push(Frame::Image(image));
        Ok(())
    }

    /// Append an explicit page break.
    pub fn append_break(&mut self) {
        self.frames.push(Frame::PageBreak);
    }

    /// Read-only view of the frames in capture order.
    pub fn snapshot(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_image()).count()
    }
}
