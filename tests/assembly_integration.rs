//! End-to-end tests: capture, layout and assembly into PDF and transcripts

use rfpages::assembler::BuilderCall;
use rfpages::{
    assemble, layout, render, CaptureSession, DocumentBuilder, DocumentConfig, Error, FrameBuffer, GridSpec,
    ImageFormat, ImageHandle, LayoutConfig, Orientation, PageSetup, PixelSurface, RecordingBuilder,
};

fn surface(shade: u8) -> PixelSurface {
    let mut s = PixelSurface::filled(40, 30, [shade, shade, shade, 255]);
    s.set_pixel(0, 0, [255, 0, 0, 255]);
    s
}

/// Builder that only counts calls, used to check what reaches a custom backend.
#[derive(Default)]
struct CountingBuilder {
    pages: Vec<PageSetup>,
    images: usize,
}

impl DocumentBuilder for CountingBuilder {
    fn open_page(&mut self, page: &PageSetup) -> rfpages::Result<()> {
        self.pages.push(*page);
        Ok(())
    }

    fn place_image(&mut self, _image: &ImageHandle, _x: f64, _y: f64, _w: f64, _h: f64) -> rfpages::Result<()> {
        if self.pages.is_empty() {
            return Err(Error::AssemblyFailed("no page".into()));
        }
        self.images += 1;
        Ok(())
    }

    fn finalize(self) -> rfpages::Result<Vec<u8>> {
        Ok(format!("{} {}", self.pages.len(), self.images).into_bytes())
    }

    fn mime(&self) -> &'static str {
        "text/plain"
    }
}

#[test]
fn custom_builder_sees_every_page_and_image() {
    let mut frames = FrameBuffer::new();
    let img = rfpages::capture(&surface(10), &Default::default()).unwrap();
    for _ in 0..4 {
        frames.append(img.clone()).unwrap();
    }
    frames.append_break();
    frames.append_break();

    let config = DocumentConfig {
        grid: GridSpec::new(1, 3),
        orientation: Orientation::Landscape,
        ..Default::default()
    };
    let out = render(&frames, &config, CountingBuilder::default()).unwrap();
    // 3 + 1 images, then two literal breaks
    assert_eq!(out.bytes(), b"4 4");
}

#[test]
fn empty_document_is_one_blank_page() {
    let plan = layout(&[], &LayoutConfig::default()).unwrap();
    let out = assemble(&plan, CountingBuilder::default(), "blank.pdf").unwrap();
    assert_eq!(out.bytes(), b"1 0");
}

#[test]
fn recording_builder_gets_plan_coordinates() {
    let mut session = CaptureSession::new(DocumentConfig {
        image_format: ImageFormat::Png,
        ..Default::default()
    })
    .unwrap();
    session.capture(&surface(100)).unwrap();
    session.capture(&surface(200)).unwrap();
    let plan = session.plan().unwrap();

    let mut builder = RecordingBuilder::new();
    builder.open_page(&plan.page).unwrap();
    for c in &plan.commands {
        builder.place_image(&c.image, c.x, c.y, c.width, c.height).unwrap();
    }
    match &builder.calls()[2] {
        BuilderCall::PlaceImage { x, width, .. } => {
            assert_eq!(*x, plan.commands[1].x);
            assert_eq!(*width, plan.commands[1].width);
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn failure_mid_document_returns_no_output() {
    let mut frames = FrameBuffer::new();
    let img = rfpages::capture(&surface(1), &Default::default()).unwrap();
    for _ in 0..12 {
        frames.append(img.clone()).unwrap();
    }
    let res = render(&frames, &DocumentConfig::default(), RecordingBuilder::failing_at(11));
    assert!(matches!(res, Err(Error::AssemblyFailed(_))));
}

#[cfg(feature = "pdf")]
mod pdf {
    use super::*;
    use rfpages::PdfBuilder;

    #[test]
    fn session_writes_loadable_pdf() {
        let mut session = CaptureSession::new(DocumentConfig::default()).unwrap();
        for shade in 0..10u8 {
            session.capture(&surface(shade * 20)).unwrap();
        }
        session.next_page();
        session.capture(&surface(255)).unwrap();

        let out = session.finish_pdf().unwrap();
        assert_eq!(out.filename(), "untitled.pdf");
        assert!(out.to_data_uri().starts_with("data:application/pdf;base64,"));

        let doc = lopdf::Document::load_mem(out.bytes()).expect("valid pdf");
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn blank_pdf_still_has_a_page() {
        let plan = layout(&[], &LayoutConfig::default()).unwrap();
        let out = assemble(&plan, PdfBuilder::new(), "blank.pdf").unwrap();
        let doc = lopdf::Document::load_mem(out.bytes()).expect("valid pdf");
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn pdf_output_is_deterministic() {
        let build = || {
            let mut session = CaptureSession::new(DocumentConfig {
                image_format: ImageFormat::Png,
                ..Default::default()
            })
            .unwrap();
            session.capture(&surface(42)).unwrap();
            session.capture(&surface(43)).unwrap();
            session.finish_pdf().unwrap()
        };
        assert_eq!(build().blob(), build().blob());
    }
}
