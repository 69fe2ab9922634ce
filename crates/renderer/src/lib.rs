//! Raster output for map previews.
//!
//! Implements the drawing side of the pipeline:
//! - Mosaic composition from slippy-map tiles
//! - Polylines and node markers in a cycling colour palette
//! - Note icons anchored at their bottom-center
//! - Timestamped output files

pub mod assets;
pub mod mosaic;
pub mod output;
pub mod rasterizer;
pub mod style;

pub use assets::NoteIcons;
pub use mosaic::{
    compose_mosaic, tile_placements, DirectoryTileSource, MosaicReport, TilePlacement, TileSource,
};
pub use output::{save_image, OutputTemplate};
pub use rasterizer::{RenderOutput, TileRasterizer};
pub use style::{hex_to_rgb, Palette, StrokeStyle};
