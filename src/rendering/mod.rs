//! Rendering pipeline: surface capture, grid layout and the document plan

pub mod layout;
pub mod paint;
pub mod raster;

pub use layout::{layout, LayoutConfig};
pub use paint::{DocumentPlan, PageSetup, PlacementCommand, Rect};
pub use raster::{capture, import_encoded, EncodingOptions, PixelSurface, Surface};
