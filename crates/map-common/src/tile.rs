//! Slippy-map tile coordinates and the tile window behind a rendered canvas.

use serde::{Deserialize, Serialize};

/// A tile coordinate (z/x/y) inside the valid grid of its zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Build a tile from unbounded window indices.
    ///
    /// Columns wrap around the antimeridian; rows outside the grid have no
    /// tile and yield `None`.
    pub fn wrapped(z: u32, x: i64, y: i64) -> Option<TileCoord> {
        let n = 1i64 << z;
        if y < 0 || y >= n {
            return None;
        }
        Some(TileCoord {
            z,
            x: x.rem_euclid(n) as u32,
            y: y as u32,
        })
    }

    /// Generate a cache key string.
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Window of tiles composing the canvas, plus the sub-tile shift that aligns
/// projected geometry with the canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileRange {
    /// First column (may be negative or past the grid; wraps)
    pub xmin: i64,
    /// Last column, inclusive
    pub xmax: i64,
    /// First row, never negative
    pub ymin: i64,
    /// Last row, inclusive, never past the grid
    pub ymax: i64,
    /// Fractional (dx, dy) offset in tiles, each in [0, 1)
    pub offset: (f64, f64),
}

impl TileRange {
    pub fn columns(&self) -> i64 {
        self.xmax - self.xmin + 1
    }

    pub fn rows(&self) -> i64 {
        (self.ymax - self.ymin + 1).max(0)
    }
}
