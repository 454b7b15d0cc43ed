//! RFox Pages
//!
//! Paginate captured raster frames into a grid document. Snapshots of a
//! drawing surface are collected in order, laid out on a fixed rows x columns
//! grid per page and handed to a document builder (PDF by default).
//!
//! # Pipeline
//!
//! - **Capture**: encode surface pixels as JPEG/PNG ([`rendering::raster`])
//! - **Frame buffer**: append-only sequence of images and page breaks ([`FrameBuffer`])
//! - **Layout**: pure computation of every image rectangle ([`rendering::layout`])
//! - **Assembly**: drive a [`DocumentBuilder`] through the plan ([`assembler`])
//!
//! # Example
//!
//! ```no_run
//! use rfpages::{CaptureSession, DocumentConfig, GridSpec, PixelSurface};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DocumentConfig {
//!     grid: GridSpec::new(2, 2),
//!     filename: "frames.pdf".to_string(),
//!     ..Default::default()
//! };
//!
//! let mut session = CaptureSession::new(config)?;
//! let surface = PixelSurface::filled(320, 240, [255, 255, 255, 255]);
//! session.capture(&surface)?;
//! session.next_page();
//! session.capture(&surface)?;
//!
//! let output = session.finish_pdf()?;
//! output.save(output.filename())?;
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;

pub mod error;
pub use error::{Error, Result};

pub mod assembler;
pub mod frame;
pub mod page;
pub mod rendering;
pub mod session;

// Async-friendly recorder that serialises appends from capture tasks
pub mod async_api;

// lopdf-backed document builder
#[cfg(feature = "pdf")]
pub mod pdf;

pub use assembler::{assemble, BlobRef, DocumentBuilder, DocumentOutput, RecordingBuilder};
pub use async_api::Recorder;
pub use frame::{EncodedImage, Frame, FrameBuffer, ImageFormat, ImageHandle};
pub use page::{CellSize, Dimensions, GridSpec, Margins, Orientation, PageTemplate, PaperSize};
pub use rendering::{
    capture, import_encoded, layout, DocumentPlan, EncodingOptions, LayoutConfig, PageSetup, PixelSurface,
    PlacementCommand, Surface,
};
pub use session::CaptureSession;

#[cfg(feature = "pdf")]
pub use pdf::PdfBuilder;

/// Document configuration
///
/// Every field is optional when loaded from JSON; missing fields take the
/// defaults below:
/// - 3x3 grid, portrait A4, 20 mm page margins on every side
/// - images centred in their cells (`image_margin: None`)
/// - JPEG capture at quality 0.95
/// - output file name `untitled.pdf`
///
/// # Examples
///
/// ```
/// let cfg = rfpages::DocumentConfig::default();
/// assert_eq!(cfg.grid.rows, 3);
/// assert_eq!(cfg.filename, "untitled.pdf");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Cells per page
    pub grid: GridSpec,
    /// Page orientation
    pub orientation: Orientation,
    /// Paper template
    pub paper: PaperSize,
    /// Page margins in millimetres
    pub margin: Margins,
    /// Fixed inset around each image; `None` centres images in their cells
    pub image_margin: Option<Margins>,
    /// Encoding used when capturing surfaces
    pub image_format: ImageFormat,
    /// JPEG quality, 0.0 to 1.0
    pub quality: f32,
    /// Name given to the finished document
    pub filename: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            orientation: Orientation::Portrait,
            paper: PaperSize::A4,
            margin: Margins::uniform(20.0),
            image_margin: None,
            image_format: ImageFormat::Jpeg,
            quality: 0.95,
            filename: "untitled.pdf".to_string(),
        }
    }
}

impl DocumentConfig {
    /// Parse a JSON configuration; unknown keys are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(format!("config JSON: {}", e)))
    }

    pub fn template(&self) -> PageTemplate {
        PageTemplate::new(self.paper, self.margin, self.orientation)
    }

    /// Validated layout parameters.
    pub fn layout_config(&self) -> Result<LayoutConfig> {
        let cfg = LayoutConfig {
            template: self.template(),
            grid: self.grid,
            image_margin: self.image_margin,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn encoding_options(&self) -> Result<EncodingOptions> {
        let options = EncodingOptions {
            format: self.image_format,
            quality: self.quality,
        };
        options.validate()?;
        Ok(options)
    }
}

/// Lay out `frames` and assemble them with `builder` in one call.
pub fn render<B: DocumentBuilder>(frames: &FrameBuffer, config: &DocumentConfig, builder: B) -> Result<DocumentOutput> {
    let plan = layout(frames.snapshot(), &config.layout_config()?)?;
    assemble(&plan, builder, &config.filename)
}
