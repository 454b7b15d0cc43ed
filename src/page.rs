//! Page geometry: paper, margins, orientation and the cell grid.
//!
//! All lengths are millimetres. The layout engine never looks at physical
//! units beyond this; conversion to points happens in the document builder.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Width and height of a rectangle in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Same rectangle rotated by a quarter turn.
    pub fn transposed(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    fn validate(&self, what: &str) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) || !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "{} must be positive, got {}x{}",
                what, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Page or cell margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub(crate) fn validate(&self, what: &str) -> Result<()> {
        let all = [self.top, self.right, self.bottom, self.left];
        if all.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(Error::InvalidConfig(format!(
                "{} must be finite and non-negative, got {:?}",
                what, self
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// The fixed paper templates offered by the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    /// Portrait dimensions of the paper.
    pub fn dimensions(&self) -> Dimensions {
        match self {
            PaperSize::A4 => Dimensions::new(210.0, 297.0),
            PaperSize::Letter => Dimensions::new(215.9, 279.4),
        }
    }
}

/// Paper, margins and orientation of every page of a document.
///
/// `paper` is given in portrait form; `orientation` decides whether it is
/// rotated before margins are subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageTemplate {
    pub paper: Dimensions,
    pub margin: Margins,
    pub orientation: Orientation,
}

impl PageTemplate {
    pub fn new(paper: PaperSize, margin: Margins, orientation: Orientation) -> Self {
        Self {
            paper: paper.dimensions(),
            margin,
            orientation,
        }
    }

    /// Physical page size after applying the orientation.
    pub fn page_size(&self) -> Dimensions {
        match self.orientation {
            Orientation::Portrait => self.paper,
            Orientation::Landscape => self.paper.transposed(),
        }
    }

    /// Area left for content once margins are removed.
    pub fn content_area(&self) -> Dimensions {
        let page = self.page_size();
        Dimensions::new(
            page.width - self.margin.horizontal(),
            page.height - self.margin.vertical(),
        )
    }

    pub fn validate(&self) -> Result<()> {
        self.paper.validate("paper dimensions")?;
        self.margin.validate("page margin")?;
        let content = self.content_area();
        if content.width <= 0.0 || content.height <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "margins leave no content area ({:.3}x{:.3} mm)",
                content.width, content.height
            )));
        }
        Ok(())
    }
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::new(PaperSize::A4, Margins::uniform(20.0), Orientation::Portrait)
    }
}

/// Fixed rows x columns grid applied to every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: u32,
    pub columns: u32,
}

impl GridSpec {
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    pub fn cells_per_page(&self) -> u32 {
        self.rows * self.columns
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid needs at least one row and one column, got {}x{}",
                self.rows, self.columns
            )));
        }
        Ok(())
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { rows: 3, columns: 3 }
    }
}

impl std::str::FromStr for GridSpec {
    type Err = Error;

    /// Parses `ROWSxCOLUMNS`, e.g. `3x2`.
    fn from_str(s: &str) -> Result<Self> {
        let (rows, columns) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::InvalidConfig(format!("grid '{}' is not ROWSxCOLUMNS", s)))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| Error::InvalidConfig(format!("grid '{}': {}", s, e)))
        };
        let grid = GridSpec::new(parse(rows)?, parse(columns)?);
        grid.validate()?;
        Ok(grid)
    }
}

/// Uniform size of every image in one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl CellSize {
    /// Largest size with `aspect` (width / height) that fits inside `bound`.
    pub fn fit(aspect: f64, bound: Dimensions) -> Self {
        if aspect > bound.aspect_ratio() {
            let width = bound.width;
            Self {
                width,
                height: width / aspect,
            }
        } else {
            let height = bound.height;
            Self {
                width: height * aspect,
                height,
            }
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}
