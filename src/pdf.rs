//! PDF document builder backed by `lopdf`.
//!
//! Layout coordinates are millimetres from the top-left page corner; PDF user
//! space is points from the bottom-left corner. Every distinct image (by
//! content id) is embedded once as an image XObject and drawn with a `cm`
//! transform per placement.

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use log::debug;

use crate::assembler::DocumentBuilder;
use crate::frame::{ImageFormat, ImageHandle};
use crate::rendering::raster::to_codec_format;
use crate::rendering::PageSetup;
use crate::{Error, Result};

/// Points per millimetre (1 inch = 72 points = 25.4 mm)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

#[inline]
pub fn mm_to_pt(mm: f64) -> f32 {
    (mm * POINTS_PER_MM) as f32
}

struct OpenPage {
    width_pt: f32,
    height_pt: f32,
    operations: Vec<Operation>,
    xobjects: Vec<String>,
}

/// Builds a PDF in memory; nothing is written until [`DocumentBuilder::finalize`].
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    current: Option<OpenPage>,
    images: HashMap<String, (String, ObjectId)>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            current: None,
            images: HashMap::new(),
        }
    }

    /// XObject name for `image`, embedding it on first use.
    fn xobject_for(&mut self, image: &ImageHandle) -> Result<String> {
        if let Some((name, _)) = self.images.get(image.id()) {
            return Ok(name.clone());
        }
        let stream = image_stream(image)?;
        let id = self.doc.add_object(stream);
        let name = format!("Im{}", self.images.len() + 1);
        debug!("embedded image {} as /{}", crate::frame::short_id(image.id()), name);
        self.images.insert(image.id().to_string(), (name.clone(), id));
        Ok(name)
    }

    fn xobject_id(&self, name: &str) -> Option<ObjectId> {
        self.images
            .values()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    fn close_page(&mut self) -> Result<()> {
        let Some(page) = self.current.take() else {
            return Ok(());
        };
        let content = Content {
            operations: page.operations,
        };
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut xobjects = lopdf::Dictionary::new();
        for name in &page.xobjects {
            if let Some(id) = self.xobject_id(name) {
                xobjects.set(name.as_bytes().to_vec(), id);
            }
        }
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page.width_pt.into(), page.height_pt.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "XObject" => xobjects },
        });
        self.page_ids.push(page_id);
        Ok(())
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder for PdfBuilder {
    fn open_page(&mut self, page: &PageSetup) -> Result<()> {
        self.close_page()?;
        self.current = Some(OpenPage {
            width_pt: mm_to_pt(page.size.width),
            height_pt: mm_to_pt(page.size.height),
            operations: Vec::new(),
            xobjects: Vec::new(),
        });
        Ok(())
    }

    fn place_image(&mut self, image: &ImageHandle, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        if self.current.is_none() {
            return Err(Error::AssemblyFailed("place_image called before open_page".to_string()));
        }
        let name = self.xobject_for(image)?;
        let Some(page) = self.current.as_mut() else {
            return Err(Error::AssemblyFailed("no open page".to_string()));
        };
        let w = mm_to_pt(width);
        let h = mm_to_pt(height);
        let left = mm_to_pt(x);
        let bottom = page.height_pt - mm_to_pt(y) - h;
        page.operations.push(Operation::new("q", vec![]));
        page.operations.push(Operation::new(
            "cm",
            vec![w.into(), 0.into(), 0.into(), h.into(), left.into(), bottom.into()],
        ));
        page.operations.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
        page.operations.push(Operation::new("Q", vec![]));
        if !page.xobjects.contains(&name) {
            page.xobjects.push(name);
        }
        Ok(())
    }

    fn finalize(mut self) -> Result<Vec<u8>> {
        self.close_page()?;
        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        debug!("pdf finalized: {} pages, {} bytes", count, bytes.len());
        Ok(bytes)
    }
}

/// Image XObject for an encoded frame. JPEG passes through as DCTDecode;
/// PNG is decoded to 8-bit RGB and left to document-level Flate compression.
fn image_stream(image: &ImageHandle) -> Result<Stream> {
    let decoded = image::load_from_memory_with_format(image.bytes(), to_codec_format(image.format()))?;
    let width = decoded.width() as i64;
    let height = decoded.height() as i64;

    let stream = match image.format() {
        ImageFormat::Jpeg => {
            let color_space = if decoded.color().channel_count() < 3 {
                "DeviceGray"
            } else {
                "DeviceRGB"
            };
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => color_space,
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                image.bytes().to_vec(),
            )
            .with_compression(false)
        }
        ImageFormat::Png => Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            decoded.to_rgb8().into_raw(),
        ),
    };
    Ok(stream)
}
