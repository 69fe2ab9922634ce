//! Common test fixtures for map rendering tests.

use image::{Rgba, RgbaImage};
use map_common::RenderConfig;

/// Bounding boxes as `(min_lat, max_lat, min_lon, max_lon)`.
pub mod bbox {
    /// Old town of Tallinn
    pub const TALLINN: (f64, f64, f64, f64) = (59.43, 59.44, 24.74, 24.76);

    /// A single city block
    pub const BLOCK: (f64, f64, f64, f64) = (59.43699, 59.43701, 24.75359, 24.75361);

    /// Most of Europe
    pub const EUROPE: (f64, f64, f64, f64) = (35.0, 72.0, -15.0, 45.0);

    /// Everything Mercator can show
    pub const WORLD: (f64, f64, f64, f64) = (-85.0, 85.0, -180.0, 180.0);
}

/// The default 5x5 grid of 256px tiles with one margin tile per side.
pub fn default_config() -> RenderConfig {
    RenderConfig::default()
}

/// A small 3x3 grid of 64px tiles, for fast pixel tests.
pub fn small_config() -> RenderConfig {
    RenderConfig {
        tile_w: 64,
        tile_h: 64,
        tiles_x: 3,
        tiles_y: 3,
        tile_margin_x: 1,
        tile_margin_y: 1,
        ..RenderConfig::default()
    }
}

/// Canvas-sized image filled with one color, standing in for a tile mosaic.
pub fn blank_mosaic(config: &RenderConfig, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(config.canvas_width(), config.canvas_height(), Rgba(color))
}

/// Tile-sized image filled with one color.
pub fn solid_tile(config: &RenderConfig, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(config.tile_w, config.tile_h, Rgba(color))
}

/// A `width` x `height` icon, opaque in the bottom half and transparent on
/// top, so anchoring can be checked by sampling pixels.
pub fn test_icon(width: u32, height: u32, color: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        if y >= height / 2 {
            Rgba([color[0], color[1], color[2], 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
