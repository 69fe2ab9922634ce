//! Read-only rendering constants: tile size, grid shape, margins and zoom limits.

use serde::{Deserialize, Serialize};

use crate::{MapError, MapResult};

/// Canvas geometry shared by the planner, projector and rasterizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Tile width in pixels
    #[serde(default = "default_tile_size")]
    pub tile_w: u32,

    /// Tile height in pixels
    #[serde(default = "default_tile_size")]
    pub tile_h: u32,

    /// Number of tile columns in the output canvas
    #[serde(default = "default_tiles")]
    pub tiles_x: u32,

    /// Number of tile rows in the output canvas
    #[serde(default = "default_tiles")]
    pub tiles_y: u32,

    /// Columns kept free at the left and right edges when fitting geometry
    #[serde(default = "default_margin")]
    pub tile_margin_x: u32,

    /// Rows kept free at the top and bottom edges when fitting geometry
    #[serde(default = "default_margin")]
    pub tile_margin_y: u32,

    /// Maximum zoom level without notes
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u32,

    /// Maximum zoom level when notes are on the map
    #[serde(default = "default_max_note_zoom")]
    pub max_note_zoom: u32,
}

fn default_tile_size() -> u32 {
    256
}

fn default_tiles() -> u32 {
    5
}

fn default_margin() -> u32 {
    1
}

fn default_max_zoom() -> u32 {
    19
}

fn default_max_note_zoom() -> u32 {
    17
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_w: default_tile_size(),
            tile_h: default_tile_size(),
            tiles_x: default_tiles(),
            tiles_y: default_tiles(),
            tile_margin_x: default_margin(),
            tile_margin_y: default_margin(),
            max_zoom: default_max_zoom(),
            max_note_zoom: default_max_note_zoom(),
        }
    }
}

impl RenderConfig {
    /// Output canvas width in pixels.
    pub fn canvas_width(&self) -> u32 {
        self.tiles_x * self.tile_w
    }

    /// Output canvas height in pixels.
    pub fn canvas_height(&self) -> u32 {
        self.tiles_y * self.tile_h
    }

    /// Tile columns available to geometry after margins.
    pub fn usable_columns(&self) -> u32 {
        self.tiles_x.saturating_sub(2 * self.tile_margin_x)
    }

    /// Tile rows available to geometry after margins.
    pub fn usable_rows(&self) -> u32 {
        self.tiles_y.saturating_sub(2 * self.tile_margin_y)
    }

    pub fn validate(&self) -> MapResult<()> {
        if self.tile_w == 0 || self.tile_h == 0 {
            return Err(MapError::InvalidConfig(format!(
                "tile size must be non-zero, got {}x{}",
                self.tile_w, self.tile_h
            )));
        }
        if self.usable_columns() == 0 {
            return Err(MapError::InvalidConfig(format!(
                "tiles_x ({}) leaves no room inside tile_margin_x ({})",
                self.tiles_x, self.tile_margin_x
            )));
        }
        if self.usable_rows() == 0 {
            return Err(MapError::InvalidConfig(format!(
                "tiles_y ({}) leaves no room inside tile_margin_y ({})",
                self.tiles_y, self.tile_margin_y
            )));
        }
        if self.max_zoom > 30 {
            return Err(MapError::InvalidConfig(format!(
                "max_zoom {} is beyond the tile scheme",
                self.max_zoom
            )));
        }
        if self.max_note_zoom > self.max_zoom {
            return Err(MapError::InvalidConfig(format!(
                "max_note_zoom ({}) exceeds max_zoom ({})",
                self.max_note_zoom, self.max_zoom
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RenderConfig::default();
        config.validate().unwrap();
        assert_eq!(config.canvas_width(), 1280);
        assert_eq!(config.canvas_height(), 1280);
        assert_eq!(config.usable_columns(), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{"tiles_x": 4, "max_zoom": 18}"#).unwrap();
        assert_eq!(config.tiles_x, 4);
        assert_eq!(config.tiles_y, 5);
        assert_eq!(config.max_zoom, 18);
        assert_eq!(config.tile_w, 256);
    }

    #[test]
    fn test_margin_too_wide() {
        let config = RenderConfig {
            tiles_x: 2,
            tile_margin_x: 1,
            ..RenderConfig::default()
        };
        assert!(matches!(config.validate(), Err(MapError::InvalidConfig(_))));
    }

    #[test]
    fn test_note_zoom_above_max_zoom() {
        let config = RenderConfig {
            max_zoom: 15,
            max_note_zoom: 17,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
