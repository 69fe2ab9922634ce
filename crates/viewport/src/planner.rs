//! Zoom and center selection.
//!
//! Zoom is the largest level at which the bounding box fits inside the tile
//! grid minus its margins, checked separately per axis. Longitude maps
//! linearly so its zoom has a closed form; latitude rows are counted level by
//! level from the top.

use map_common::bbox::round_coord;
use map_common::{BoundingBox, RenderConfig, ViewFragment};
use projection::{tile_to_deg, to_tile_float, to_tile_int};

/// Below this zoom the latitude center is taken in tile space, where Mercator
/// stretching is accounted for.
const MERCATOR_CENTER_ZOOM: u32 = 10;

/// Picks the viewport that fits a bounding box into the configured canvas.
#[derive(Debug, Clone, Copy)]
pub struct ViewportPlanner<'a> {
    config: &'a RenderConfig,
}

impl<'a> ViewportPlanner<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Choose zoom and center for `bbox`, capped at `max_zoom`.
    pub fn choose_viewport(&self, bbox: &BoundingBox) -> ViewFragment {
        self.fit(bbox, self.config.max_zoom)
    }

    /// Like [`choose_viewport`](Self::choose_viewport), but capped at
    /// `max_note_zoom` when notes are drawn so their icons keep context.
    pub fn choose_viewport_for(&self, bbox: &BoundingBox, has_notes: bool) -> ViewFragment {
        let cap = if has_notes {
            self.config.max_note_zoom.min(self.config.max_zoom)
        } else {
            self.config.max_zoom
        };
        self.fit(bbox, cap)
    }

    fn fit(&self, bbox: &BoundingBox, cap: u32) -> ViewFragment {
        let zoom_x = self.zoom_for_width(bbox);
        let zoom_y = self.zoom_for_height(bbox);
        let zoom = zoom_x.min(zoom_y).min(cap as i64).max(0) as u32;

        let center = bbox.center();
        let lon = center.lon;
        let lat = if zoom < MERCATOR_CENTER_ZOOM {
            let top = to_tile_float(bbox.max_lat, 0.0, zoom).1;
            let bottom = to_tile_float(bbox.min_lat, 0.0, zoom).1;
            round_coord(tile_to_deg(zoom, 0.0, (top + bottom) / 2.0).0)
        } else {
            center.lat
        };

        tracing::debug!(zoom_x, zoom_y, zoom, lat, lon, "Chose viewport");
        ViewFragment::new(zoom, lat, lon)
    }

    /// Zoom at which the longitude span fills the usable tile columns.
    fn zoom_for_width(&self, bbox: &BoundingBox) -> i64 {
        let usable = self.config.usable_columns() as f64;
        ((360.0 / bbox.lon_span()) * usable).log2().floor() as i64
    }

    /// Highest zoom (starting one above `max_zoom`) at which the latitude span
    /// covers no more than the usable tile rows.
    fn zoom_for_height(&self, bbox: &BoundingBox) -> i64 {
        let usable = self.config.usable_rows() as i64;
        let mut zoom = self.config.max_zoom + 1;
        while zoom > 0 && self.rows_spanned(bbox, zoom) > usable {
            zoom -= 1;
        }
        zoom as i64
    }

    fn rows_spanned(&self, bbox: &BoundingBox, zoom: u32) -> i64 {
        let bottom = to_tile_int(bbox.min_lat, 0.0, zoom).1;
        let top = to_tile_int(bbox.max_lat, 0.0, zoom).1;
        bottom - top + 1
    }
}
