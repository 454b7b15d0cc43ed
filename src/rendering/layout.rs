/// Grid layout and pagination of captured frames

use log::{debug, warn};

use crate::frame::Frame;
use crate::page::{CellSize, Dimensions, GridSpec, Margins, PageTemplate};
use crate::rendering::paint::{DocumentPlan, PageSetup, PlacementCommand};
use crate::{Error, Result};

/// Tolerance for fit checks, in millimetres. Three cells of 170/3 mm must
/// still fit a 170 mm row.
const FIT_EPSILON: f64 = 1e-9;

/// Validated input to [`layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub template: PageTemplate,
    pub grid: GridSpec,
    /// Fixed inset around every image inside its cell. `None` centres images.
    pub image_margin: Option<Margins>,
}

impl LayoutConfig {
    pub fn new(template: PageTemplate, grid: GridSpec) -> Self {
        Self {
            template,
            grid,
            image_margin: None,
        }
    }

    pub fn with_image_margin(mut self, inset: Margins) -> Self {
        self.image_margin = Some(inset);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.template.validate()?;
        self.grid.validate()?;
        if let Some(inset) = self.image_margin {
            inset.validate("image margin")?;
            let bound = self.cell_bound();
            if bound.width - inset.horizontal() <= 0.0 || bound.height - inset.vertical() <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "image margin {:?} leaves no room in a {:.3}x{:.3} mm cell",
                    inset, bound.width, bound.height
                )));
            }
        }
        Ok(())
    }

    /// Size of one grid slot.
    pub fn cell_bound(&self) -> Dimensions {
        let content = self.template.content_area();
        Dimensions::new(
            content.width / self.grid.columns as f64,
            content.height / self.grid.rows as f64,
        )
    }

    /// Image size and inset for a pass whose first image has `aspect`.
    fn cell_geometry(&self, aspect: f64) -> (CellSize, Margins) {
        let bound = self.cell_bound();
        match self.image_margin {
            Some(inset) => {
                let room = Dimensions::new(bound.width - inset.horizontal(), bound.height - inset.vertical());
                (CellSize::fit(aspect, room), inset)
            }
            None => {
                let cell = CellSize::fit(aspect, bound);
                let dx = (bound.width - cell.width) / 2.0;
                let dy = (bound.height - cell.height) / 2.0;
                let inset = Margins {
                    top: dy,
                    right: dx,
                    bottom: dy,
                    left: dx,
                };
                (cell, inset)
            }
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(PageTemplate::default(), GridSpec::default())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    x: f64,
    y: f64,
}

/// Lay `frames` out on a grid of pages.
///
/// - The first image fixes a uniform cell size for the whole pass
/// - Images fill rows left to right, rows top to bottom, then wrap to a new page
/// - `PageBreak` always starts a new page, even if the current one is empty
///
/// Returns an empty plan (zero pages) for an empty frame list. Fails only
/// with `InvalidConfig`, before any frame is looked at.
pub fn layout(frames: &[Frame], config: &LayoutConfig) -> Result<DocumentPlan> {
    config.validate()?;

    let template = &config.template;
    let content = template.content_area();
    let margin = template.margin;
    let page = PageSetup {
        orientation: template.orientation,
        size: template.page_size(),
    };

    let mut geometry: Option<(CellSize, Margins)> = None;
    let mut cursor = Cursor::default();
    let mut page_index = 0usize;
    let mut page_has_content = false;
    let mut commands = Vec::with_capacity(frames.len());

    for frame in frames {
        let image = match frame {
            Frame::PageBreak => {
                if !page_has_content {
                    warn!("page break on empty page {}; emitting blank page", page_index);
                }
                cursor = Cursor::default();
                page_index += 1;
                page_has_content = false;
                debug!("explicit break, now on page {}", page_index);
                continue;
            }
            Frame::Image(image) => image,
        };

        let (cell, inset) = *geometry.get_or_insert_with(|| {
            let g = config.cell_geometry(image.aspect_ratio());
            debug!(
                "cell size {:.3}x{:.3} mm from aspect {:.4}",
                g.0.width,
                g.0.height,
                image.aspect_ratio()
            );
            g
        });
        let step_x = cell.width + inset.horizontal();
        let step_y = cell.height + inset.vertical();

        if cursor.x + step_x > content.width + FIT_EPSILON {
            cursor.x = 0.0;
            cursor.y += step_y;
        }
        if cursor.y + step_y > content.height + FIT_EPSILON {
            cursor = Cursor::default();
            page_index += 1;
            debug!("page {} full, wrapping to page {}", page_index - 1, page_index);
        }

        commands.push(PlacementCommand {
            page_index,
            x: cursor.x + inset.left + margin.left,
            y: cursor.y + inset.top + margin.top,
            width: cell.width,
            height: cell.height,
            image: image.clone(),
        });
        page_has_content = true;
        cursor.x += step_x;
    }

    let page_count = if frames.is_empty() { 0 } else { page_index + 1 };
    debug!(
        "laid out {} images over {} pages ({} frames)",
        commands.len(),
        page_count,
        frames.len()
    );

    Ok(DocumentPlan {
        page,
        page_count,
        cell: geometry.map(|(cell, _)| cell),
        commands,
    })
}
