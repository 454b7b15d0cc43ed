//! Grid capture example - draws a moving square and captures every frame

use rfpages::{CaptureSession, DocumentConfig, GridSpec, Orientation, PixelSurface};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("RFox Pages - Grid Capture Example\n");

    let config = DocumentConfig {
        grid: GridSpec::new(2, 3),
        orientation: Orientation::Landscape,
        filename: "grid_capture.pdf".to_string(),
        ..Default::default()
    };
    let mut session = CaptureSession::new(config)?;

    // A tiny software "sketch": a square sliding across a white canvas
    let (w, h) = (160u32, 90u32);
    for frame in 0..14u32 {
        let mut surface = PixelSurface::filled(w, h, [255, 255, 255, 255]);
        let left = (frame * 10) % (w - 20);
        for y in 35..55 {
            for x in left..left + 20 {
                surface.set_pixel(x, y, [220, 40, 40, 255]);
            }
        }
        session.capture(&surface)?;

        // second half of the animation goes on its own pages
        if frame == 6 {
            session.next_page();
        }
    }

    let plan = session.plan()?;
    print!("{}", plan.describe());

    let output = session.finish_pdf()?;
    output.save(output.filename())?;
    let blob = output.blob();
    println!("\nWrote {} ({} bytes, sha256 {})", output.filename(), blob.len, blob.id);

    Ok(())
}
