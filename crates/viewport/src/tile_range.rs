//! Tile window behind a canvas.

use map_common::{RenderConfig, TileRange, ViewFragment};
use projection::to_tile_float;

/// Compute which tiles make up a `tiles_x` x `tiles_y` canvas centered on a
/// coordinate, and the sub-tile offset aligning geometry with it.
///
/// Rows are clipped to the grid (there is nothing above or below the poles);
/// columns are not, so callers fetching tiles must wrap them modulo `2^zoom`.
pub fn resolve_tile_range(
    center_lat: f64,
    center_lon: f64,
    zoom: u32,
    config: &RenderConfig,
) -> TileRange {
    let (center_x, center_y) = to_tile_float(center_lat, center_lon, zoom);
    let n = 1i64 << zoom;

    let (xmin, xmax) = window(center_x, config.tiles_x);
    let (ymin, ymax) = window(center_y, config.tiles_y);

    let range = TileRange {
        xmin,
        xmax,
        ymin: ymin.max(0),
        ymax: ymax.min(n - 1),
        offset: (
            sub_tile_offset(center_x, config.tiles_x),
            sub_tile_offset(center_y, config.tiles_y),
        ),
    };
    tracing::debug!(?range, center_x, center_y, zoom, "Resolved tile range");
    range
}

/// Tile range for a chosen viewport.
pub fn tile_range_for(fragment: &ViewFragment, config: &RenderConfig) -> TileRange {
    resolve_tile_range(fragment.lat, fragment.lon, fragment.zoom, config)
}

/// First and last (inclusive) tile of a window of `tiles` around `center`.
///
/// The lower edge is `center - tiles/2` truncated; for an even grid the upper
/// edge `center + tiles/2` would be one tile too many and is shaved off, which
/// leaves exactly `tiles` tiles for either parity.
fn window(center: f64, tiles: u32) -> (i64, i64) {
    let half = tiles as f64 / 2.0;
    let min = (center - half) as i64;
    (min, min + tiles as i64 - 1)
}

/// How far into its tile the window's reference point sits. Odd grids center
/// on the middle of a tile, so shift by half a tile first.
fn sub_tile_offset(center: f64, tiles: u32) -> f64 {
    let parity = (tiles % 2) as f64;
    (center + parity / 2.0).rem_euclid(1.0)
}
