//! Web Mercator slippy-tile projection.
//!
//! Tile space: at zoom `z` the world is `2^z x 2^z` tiles, x grows east from
//! the antimeridian, y grows south from ~85.05°N. Continuous (float) tile
//! coordinates locate a point inside its tile; the canvas pixel position is
//! then the offset from the tile window's origin scaled by the tile size.

use std::f64::consts::PI;

use map_common::{GeoPoint, RenderConfig, TileRange, ViewFragment};

/// Latitudes at or beyond this (in absolute value) are pinned to the first or
/// last tile row instead of running into the polar singularity.
pub const POLAR_CLAMP_LAT: f64 = 89.0;

/// Below this zoom the canvas grid is wider than the world, and the sub-tile
/// offset needs a one-tile correction.
const LOW_ZOOM_CORRECTION: u32 = 3;

#[inline]
fn tiles_at(zoom: u32) -> f64 {
    2f64.powi(zoom as i32)
}

/// Convert lat/lon to continuous tile coordinates.
///
/// x is not clamped (it may be used to wrap around the antimeridian); y is
/// clamped to `[0, 2^zoom]`.
pub fn to_tile_float(lat: f64, lon: f64, zoom: u32) -> (f64, f64) {
    let n = tiles_at(zoom);
    let x = (lon + 180.0) / 360.0 * n;

    if lat >= POLAR_CLAMP_LAT {
        return (x, 0.0);
    }
    if lat <= -POLAR_CLAMP_LAT {
        return (x, n - 1.0);
    }

    let lat_rad = lat.to_radians();
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n;
    let limited = y.clamp(0.0, n);
    tracing::trace!(lat, lon, zoom, y, limited, "to_tile_float");
    (x, limited)
}

/// Convert lat/lon to the index of the tile containing it.
pub fn to_tile_int(lat: f64, lon: f64, zoom: u32) -> (i64, i64) {
    let (x, y) = to_tile_float(lat, lon, zoom);
    (x.floor() as i64, y.floor() as i64)
}

/// Top-left corner (lat, lon) of a tile. Fractional tile coordinates give the
/// matching point inside the tile; longitude wraps every 360°.
pub fn tile_to_deg(zoom: u32, x: f64, y: f64) -> (f64, f64) {
    let n = tiles_at(zoom);
    let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
    let lon = -180.0 + (360.0 * x / n).rem_euclid(360.0);
    (lat, lon)
}

/// Position of a continuous tile coordinate on the canvas, in pixels.
pub fn tile_to_pixel(
    tile: (f64, f64),
    zoom: u32,
    range: &TileRange,
    config: &RenderConfig,
) -> (i32, i32) {
    let (mut dx, mut dy) = range.offset;
    if zoom < LOW_ZOOM_CORRECTION {
        dx -= 1.0;
        dy -= 1.0;
    }

    let px = ((tile.0 - range.xmin as f64 - dx) * config.tile_w as f64).round();
    let py = ((tile.1 - range.ymin as f64 - dy) * config.tile_h as f64).round();
    (px as i32, py as i32)
}

/// Position of a geographic point on the canvas of `fragment`, in pixels.
pub fn wgs_to_pixel(
    point: &GeoPoint,
    range: &TileRange,
    fragment: &ViewFragment,
    config: &RenderConfig,
) -> (i32, i32) {
    let tile = to_tile_float(point.lat, point.lon, fragment.zoom);
    tile_to_pixel(tile, fragment.zoom, range, config)
}

/// Projects points onto one specific canvas.
#[derive(Debug, Clone, Copy)]
pub struct CanvasProjector<'a> {
    config: &'a RenderConfig,
    range: TileRange,
    fragment: ViewFragment,
}

impl<'a> CanvasProjector<'a> {
    pub fn new(config: &'a RenderConfig, range: TileRange, fragment: ViewFragment) -> Self {
        Self {
            config,
            range,
            fragment,
        }
    }

    pub fn project(&self, point: &GeoPoint) -> (i32, i32) {
        wgs_to_pixel(point, &self.range, &self.fragment, self.config)
    }

    pub fn project_all(&self, points: &[GeoPoint]) -> Vec<(i32, i32)> {
        points.iter().map(|p| self.project(p)).collect()
    }
}
