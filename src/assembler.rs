//! Document assembly: drive a [`DocumentBuilder`] through a [`DocumentPlan`].
//!
//! The builder is the only side-effecting stage of the pipeline. It is taken
//! by value, so when any call fails the half-built document is dropped along
//! with it and the caller sees nothing but the error.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::info;
use sha2::{Digest, Sha256};

use crate::frame::ImageHandle;
use crate::rendering::{DocumentPlan, PageSetup};
use crate::{Error, Result};

/// Output encoder driven by [`assemble`].
///
/// Coordinates are millimetres from the top-left corner of the page.
pub trait DocumentBuilder {
    /// Start a new page; subsequent placements land on it.
    fn open_page(&mut self, page: &PageSetup) -> Result<()>;

    /// Draw `image` into the given rectangle of the current page.
    fn place_image(&mut self, image: &ImageHandle, x: f64, y: f64, width: f64, height: f64) -> Result<()>;

    /// Finish the document and return its encoded bytes.
    fn finalize(self) -> Result<Vec<u8>>
    where
        Self: Sized;

    /// MIME type of the finalized bytes.
    fn mime(&self) -> &'static str {
        "application/pdf"
    }
}

/// Run `plan` through `builder`.
///
/// Pages are opened in order starting at page 0. A plan with zero pages still
/// produces one blank page, since documents are never empty.
pub fn assemble<B: DocumentBuilder>(plan: &DocumentPlan, mut builder: B, filename: &str) -> Result<DocumentOutput> {
    let pages = plan.page_count.max(1);
    for page_index in 0..pages {
        builder.open_page(&plan.page).map_err(assembly_error)?;
        for cmd in plan.commands_for_page(page_index) {
            builder
                .place_image(&cmd.image, cmd.x, cmd.y, cmd.width, cmd.height)
                .map_err(assembly_error)?;
        }
    }
    let mime = builder.mime();
    let bytes = builder.finalize().map_err(assembly_error)?;
    info!(
        "assembled {} ({} pages, {} images, {} bytes)",
        filename,
        pages,
        plan.commands.len(),
        bytes.len()
    );
    Ok(DocumentOutput {
        bytes,
        mime,
        filename: filename.to_string(),
    })
}

fn assembly_error(err: Error) -> Error {
    match err {
        Error::AssemblyFailed(_) => err,
        other => Error::AssemblyFailed(other.to_string()),
    }
}

/// Content-addressed reference to a finished document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    /// Hex SHA-256 of the bytes
    pub id: String,
    pub len: usize,
    pub mime: &'static str,
}

/// A finished document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutput {
    bytes: Vec<u8>,
    mime: &'static str,
    filename: String,
}

impl DocumentOutput {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Cheap addressable reference; prefer this over [`Self::to_data_uri`].
    pub fn blob(&self) -> BlobRef {
        BlobRef {
            id: hex::encode(Sha256::digest(&self.bytes)),
            len: self.bytes.len(),
            mime: self.mime,
        }
    }

    /// Inline `data:` URI. Grows by a third over the raw size.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Call recorded by [`RecordingBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderCall {
    OpenPage(PageSetup),
    PlaceImage {
        image_id: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// In-memory builder that records every call and finalizes to a plain text
/// transcript. Optionally fails on the n-th call.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    calls: Vec<BuilderCall>,
    fail_at: Option<usize>,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the call with this zero-based index.
    pub fn failing_at(call_index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(call_index),
        }
    }

    pub fn calls(&self) -> &[BuilderCall] {
        &self.calls
    }

    fn record(&mut self, call: BuilderCall) -> Result<()> {
        if self.fail_at == Some(self.calls.len()) {
            return Err(Error::AssemblyFailed(format!("injected failure at call {}", self.calls.len())));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl DocumentBuilder for RecordingBuilder {
    fn open_page(&mut self, page: &PageSetup) -> Result<()> {
        self.record(BuilderCall::OpenPage(*page))
    }

    fn place_image(&mut self, image: &ImageHandle, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.record(BuilderCall::PlaceImage {
            image_id: image.id().to_string(),
            x,
            y,
            width,
            height,
        })
    }

    fn finalize(self) -> Result<Vec<u8>> {
        if self.fail_at == Some(self.calls.len()) {
            return Err(Error::AssemblyFailed("injected failure at finalize".to_string()));
        }
        let mut out = String::new();
        for call in &self.calls {
            match call {
                BuilderCall::OpenPage(p) => out.push_str(&format!(
                    "page {:?} {:.3}x{:.3}\n",
                    p.orientation, p.size.width, p.size.height
                )),
                BuilderCall::PlaceImage {
                    image_id,
                    x,
                    y,
                    width,
                    height,
                } => out.push_str(&format!(
                    "image {} {:.3} {:.3} {:.3} {:.3}\n",
                    crate::frame::short_id(image_id),
                    x,
                    y,
                    width,
                    height
                )),
            }
        }
        Ok(out.into_bytes())
    }

    fn mime(&self) -> &'static str {
        "text/plain"
    }
}
