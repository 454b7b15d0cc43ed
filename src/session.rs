//! Synchronous capture session.
//!
//! A `CaptureSession` owns one document's configuration and frame buffer. It
//! is the single-threaded counterpart of [`crate::Recorder`]: capture frames
//! from a surface, insert page breaks, then consume the session to produce
//! the document.

use log::debug;

use crate::assembler::{assemble, DocumentBuilder, DocumentOutput};
use crate::frame::{Frame, FrameBuffer, ImageHandle};
use crate::rendering::{capture, layout, DocumentPlan, EncodingOptions, LayoutConfig, Surface};
use crate::{DocumentConfig, Result};

pub struct CaptureSession {
    config: DocumentConfig,
    layout: LayoutConfig,
    encoding: EncodingOptions,
    frames: FrameBuffer,
}

impl CaptureSession {
    /// Validate `config` once and start with an empty buffer.
    pub fn new(config: DocumentConfig) -> Result<Self> {
        let layout = config.layout_config()?;
        let encoding = config.encoding_options()?;
        Ok(Self {
            config,
            layout,
            encoding,
            frames: FrameBuffer::new(),
        })
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Encode the surface's current pixels and append them as the next frame.
    pub fn capture<S: Surface + ?Sized>(&mut self, surface: &S) -> Result<ImageHandle> {
        let handle = capture(surface, &self.encoding)?;
        self.frames.append(handle.clone())?;
        debug!("session frame {} captured", self.frames.len());
        Ok(handle)
    }

    /// Append an image captured elsewhere (e.g. an engine screenshot).
    pub fn append(&mut self, image: ImageHandle) -> Result<()> {
        self.frames.append(image)
    }

    /// Force the next image onto a fresh page.
    pub fn next_page(&mut self) {
        self.frames.append_break();
    }

    pub fn frames(&self) -> &[Frame] {
        self.frames.snapshot()
    }

    /// Preview the layout of the frames captured so far.
    pub fn plan(&self) -> Result<DocumentPlan> {
        layout(self.frames.snapshot(), &self.layout)
    }

    /// Lay out every frame and assemble the document with `builder`.
    pub fn finish<B: DocumentBuilder>(self, builder: B) -> Result<DocumentOutput> {
        let plan = layout(self.frames.snapshot(), &self.layout)?;
        assemble(&plan, builder, &self.config.filename)
    }

    /// [`Self::finish`] with the built-in PDF builder.
    #[cfg(feature = "pdf")]
    pub fn finish_pdf(self) -> Result<DocumentOutput> {
        self.finish(crate::pdf::PdfBuilder::new())
    }
}
