/// Placement commands and the document plan produced by a layout pass

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::frame::ImageHandle;
use crate::page::{CellSize, Dimensions, Orientation};

/// Axis-aligned rectangle in millimetres, origin at the top-left page corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Draw one image on one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementCommand {
    pub page_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub image: ImageHandle,
}

impl PlacementCommand {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Physical description shared by every page of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSetup {
    pub orientation: Orientation,
    pub size: Dimensions,
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentPlan {
    pub page: PageSetup,
    pub page_count: usize,
    pub cell: Option<CellSize>,
    pub commands: Vec<PlacementCommand>,
}

impl DocumentPlan {
    pub fn is_empty(&self) -> bool {
        self.page_count == 0
    }

    /// Commands of one page, in emission order.
    pub fn commands_for_page(&self, page_index: usize) -> impl Iterator<Item = &PlacementCommand> {
        self.commands
            .iter()
            .filter(move |c| c.page_index == page_index)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Hex SHA-256 of the compact JSON form. Equal plans give equal digests.
    pub fn digest(&self) -> String {
        // Plan fields are plain numbers, strings and enums; serialization cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&json))
    }

    /// One line per page and command, rounded to 1/1000 mm. Used for goldens
    /// and the CLI preview.
    pub fn describe(&self) -> String {
        let mut out = format!(
            "pages={} size={:.3}x{:.3} orientation={:?}\n",
            self.page_count, self.page.size.width, self.page.size.height, self.page.orientation
        );
        if let Some(cell) = self.cell {
            out.push_str(&format!("cell={:.3}x{:.3}\n", cell.width, cell.height));
        }
        for page in 0..self.page_count {
            out.push_str(&format!("page {}\n", page));
            for c in self.commands_for_page(page) {
                out.push_str(&format!(
                    "  image {} at {:.3},{:.3} size {:.3}x{:.3}\n",
                    crate::frame::short_id(c.image.id()),
                    c.x,
                    c.y,
                    c.width,
                    c.height
                ));
            }
        }
        out
    }
}
