//! Layout scenarios and invariants of the pagination engine

use rfpages::{
    layout, DocumentPlan, EncodedImage, Frame, GridSpec, ImageFormat, ImageHandle, LayoutConfig, Margins,
    Orientation, PageTemplate, PaperSize,
};

const TOL: f64 = 1e-6;

fn image(tag: &str, w: u32, h: u32) -> Frame {
    Frame::Image(ImageHandle::new(EncodedImage::new(
        ImageFormat::Jpeg,
        w,
        h,
        tag.as_bytes().to_vec(),
    )))
}

fn squares(n: usize) -> Vec<Frame> {
    (0..n).map(|i| image(&format!("frame-{}", i), 100, 100)).collect()
}

/// 3x3 grid, A4 portrait, 20 mm margins.
fn reference_config() -> LayoutConfig {
    LayoutConfig::new(
        PageTemplate::new(PaperSize::A4, Margins::uniform(20.0), Orientation::Portrait),
        GridSpec::new(3, 3),
    )
}

fn assert_inside_content(plan: &DocumentPlan, config: &LayoutConfig) {
    let content = config.template.content_area();
    let m = config.template.margin;
    for c in &plan.commands {
        let rel_x = c.x - m.left;
        let rel_y = c.y - m.top;
        assert!(rel_x >= -TOL && rel_y >= -TOL, "negative offset: {:?}", c.rect());
        assert!(rel_x + c.width <= content.width + TOL, "overflows width: {:?}", c.rect());
        assert!(rel_y + c.height <= content.height + TOL, "overflows height: {:?}", c.rect());
    }
}

#[test]
fn scenario_a_nine_squares_fill_one_page() {
    let config = reference_config();
    let plan = layout(&squares(9), &config).unwrap();

    assert_eq!(plan.page_count, 1);
    assert_eq!(plan.commands.len(), 9);

    let bound_w = 170.0 / 3.0;
    let bound_h = 257.0 / 3.0;
    for (i, c) in plan.commands.iter().enumerate() {
        let row = (i / 3) as f64;
        let col = (i % 3) as f64;
        // centred inside its cell
        let cell_x = 20.0 + col * bound_w;
        let cell_y = 20.0 + row * bound_h;
        assert!((c.x - cell_x - (bound_w - c.width) / 2.0).abs() < TOL);
        assert!((c.y - cell_y - (bound_h - c.height) / 2.0).abs() < TOL);
        assert_eq!(c.page_index, 0);
    }
    assert_inside_content(&plan, &config);
}

#[test]
fn scenario_b_tenth_image_starts_second_page() {
    let config = reference_config();
    let plan = layout(&squares(10), &config).unwrap();

    assert_eq!(plan.page_count, 2);
    let last = plan.commands.last().unwrap();
    assert_eq!(last.page_index, 1);

    // cursor at content origin; only the centring inset and the page margin remain
    let first = &plan.commands[0];
    assert!((last.x - first.x).abs() < TOL);
    assert!((last.y - first.y).abs() < TOL);
    assert!((last.x - 20.0).abs() < TOL);
    assert!((last.y - (20.0 + (257.0 / 3.0 - 170.0 / 3.0) / 2.0)).abs() < TOL);
}

#[test]
fn scenario_c_empty_buffer_has_no_pages() {
    let plan = layout(&[], &reference_config()).unwrap();
    assert_eq!(plan.page_count, 0);
    assert!(plan.commands.is_empty());
    assert!(plan.is_empty());
}

#[test]
fn scenario_d_break_forces_second_page() {
    let frames = vec![image("a", 4, 3), Frame::PageBreak, image("b", 4, 3)];
    let plan = layout(&frames, &reference_config()).unwrap();

    assert_eq!(plan.page_count, 2);
    assert_eq!(plan.commands.len(), 2);
    assert_eq!(plan.commands[0].page_index, 0);
    assert_eq!(plan.commands[1].page_index, 1);
    assert_eq!(plan.commands[0].x, plan.commands[1].x);
    assert_eq!(plan.commands[0].y, plan.commands[1].y);
}

#[test]
fn placements_match_images_and_pages_never_go_back() {
    let grids = [GridSpec::new(1, 1), GridSpec::new(2, 3), GridSpec::new(4, 2), GridSpec::new(5, 5)];
    let aspects = [(1, 1), (16, 9), (3, 4), (1, 7), (21, 2)];
    for grid in grids {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            for (w, h) in aspects {
                let config = LayoutConfig::new(
                    PageTemplate::new(PaperSize::Letter, Margins::uniform(12.5), orientation),
                    grid,
                );
                let frames: Vec<Frame> = (0..37).map(|i| image(&format!("{}", i), w, h)).collect();
                let plan = layout(&frames, &config).unwrap();

                assert_eq!(plan.commands.len(), frames.len());
                assert!(plan
                    .commands
                    .windows(2)
                    .all(|p| p[0].page_index <= p[1].page_index));
                let per_page = grid.cells_per_page() as usize;
                assert_eq!(plan.page_count, frames.len().div_ceil(per_page));
                assert_inside_content(&plan, &config);
            }
        }
    }
}

#[test]
fn cell_keeps_first_image_aspect() {
    for (w, h) in [(1920, 1080), (3, 4), (1, 1), (500, 7)] {
        let frames = vec![image("first", w, h), image("second", 1, 9)];
        let plan = layout(&frames, &reference_config()).unwrap();
        let cell = plan.cell.unwrap();
        let expected = w as f64 / h as f64;
        assert!((cell.width / cell.height - expected).abs() < 1e-6);
    }
}

#[test]
fn layout_is_idempotent() {
    let mut frames = squares(14);
    frames.insert(5, Frame::PageBreak);
    let config = reference_config();

    let a = layout(&frames, &config).unwrap();
    let b = layout(&frames, &config).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.digest(), b.digest());
}

#[test]
fn explicit_inset_stays_inside_content() {
    let config = reference_config().with_image_margin(Margins {
        top: 2.0,
        right: 6.0,
        bottom: 4.0,
        left: 1.0,
    });
    let plan = layout(&squares(20), &config).unwrap();
    // smaller cells stack four rows of 55.667 mm into 257 mm
    assert_eq!(plan.page_count, 2);
    assert_eq!(plan.commands_for_page(0).count(), 12);
    assert!((plan.commands[0].x - 21.0).abs() < TOL);
    assert!((plan.commands[0].y - 22.0).abs() < TOL);
    assert_inside_content(&plan, &config);
}

#[test]
fn leading_break_leaves_first_page_blank() {
    let frames = vec![Frame::PageBreak, image("x", 1, 1)];
    let plan = layout(&frames, &reference_config()).unwrap();
    assert_eq!(plan.page_count, 2);
    assert_eq!(plan.commands_for_page(0).count(), 0);
    assert_eq!(plan.commands[0].page_index, 1);
}
