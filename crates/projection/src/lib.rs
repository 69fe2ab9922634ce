//! Coordinate conversions between WGS84, slippy-map tiles and canvas pixels.
//!
//! Implements the spherical (Web) Mercator tile scheme from scratch without
//! external dependencies.

pub mod mercator;

pub use mercator::{
    tile_to_deg, tile_to_pixel, to_tile_float, to_tile_int, wgs_to_pixel, CanvasProjector,
    POLAR_CLAMP_LAT,
};
