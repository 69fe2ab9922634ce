//! Assembling the base map canvas from slippy-map tiles.

use std::path::PathBuf;

use image::imageops;
use image::RgbaImage;
use map_common::{MapError, MapResult, RenderConfig, TileCoord, TileRange};
use projection::tile_to_pixel;

/// Supplies decoded map tiles.
pub trait TileSource {
    /// Fetch one tile. `Ok(None)` means the source simply has no such tile.
    fn tile(&self, coord: &TileCoord) -> MapResult<Option<RgbaImage>>;
}

/// Tiles stored on disk as `{root}/{z}/{x}/{y}.png`.
#[derive(Debug, Clone)]
pub struct DirectoryTileSource {
    root: PathBuf,
}

impl DirectoryTileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, coord: &TileCoord) -> PathBuf {
        self.root
            .join(coord.z.to_string())
            .join(coord.x.to_string())
            .join(format!("{}.png", coord.y))
    }
}

impl TileSource for DirectoryTileSource {
    fn tile(&self, coord: &TileCoord) -> MapResult<Option<RgbaImage>> {
        let path = self.path_for(coord);
        if !path.exists() {
            return Ok(None);
        }
        let img = image::open(&path).map_err(|e| {
            MapError::AssetError(format!("tile {}: {}", path.display(), e))
        })?;
        Ok(Some(img.to_rgba8()))
    }
}

/// What went into a composed mosaic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MosaicReport {
    /// Tiles found and pasted
    pub placed: usize,
    /// Tiles the source did not have; their area is left transparent
    pub missing: Vec<TileCoord>,
}

impl MosaicReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// A tile and the canvas position of its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub coord: TileCoord,
    pub left: i64,
    pub top: i64,
}

/// Every tile that shows on the canvas of `range`, in row order.
///
/// Tiles are positioned with the same sub-tile offset the projector applies
/// to geometry, so the window is shifted against the tile grid and one extra
/// row and column on each side may peek in. Rows past the poles are skipped;
/// columns wrap around the antimeridian.
pub fn tile_placements(range: &TileRange, zoom: u32, config: &RenderConfig) -> Vec<TilePlacement> {
    let (width, height) = (config.canvas_width() as i64, config.canvas_height() as i64);
    let (tile_w, tile_h) = (config.tile_w as i64, config.tile_h as i64);

    let mut placements = Vec::new();
    for y in range.ymin - 1..=range.ymin + range.rows() {
        for x in range.xmin - 1..=range.xmin + range.columns() {
            let Some(coord) = TileCoord::wrapped(zoom, x, y) else {
                continue;
            };
            let (left, top) = tile_to_pixel((x as f64, y as f64), zoom, range, config);
            let (left, top) = (left as i64, top as i64);
            if left >= width || top >= height || left + tile_w <= 0 || top + tile_h <= 0 {
                continue;
            }
            placements.push(TilePlacement { coord, left, top });
        }
    }
    placements
}

/// Paste the tiles of `range` into a transparent canvas of the configured
/// size, aligned with projected geometry.
pub fn compose_mosaic<S: TileSource + ?Sized>(
    source: &S,
    range: &TileRange,
    zoom: u32,
    config: &RenderConfig,
) -> MapResult<(RgbaImage, MosaicReport)> {
    let mut canvas = RgbaImage::new(config.canvas_width(), config.canvas_height());
    let mut report = MosaicReport::default();

    for TilePlacement { coord, left, top } in tile_placements(range, zoom, config) {
        match source.tile(&coord)? {
            Some(tile) => {
                imageops::overlay(&mut canvas, &tile, left, top);
                report.placed += 1;
            }
            None => {
                tracing::warn!(tile = %coord.cache_key(), "Tile missing from mosaic");
                report.missing.push(coord);
            }
        }
    }

    tracing::debug!(
        placed = report.placed,
        missing = report.missing.len(),
        zoom,
        "Composed mosaic"
    );
    Ok((canvas, report))
}
