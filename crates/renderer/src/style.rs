//! Line colours and stroke geometry for element rendering.

use image::Rgba;
use map_common::{MapError, MapResult};
use serde::{Deserialize, Serialize};

/// Colours cycled through per segment when nothing else is configured.
pub const DEFAULT_ELEMENT_COLORS: [&str; 6] = ["#000", "#700", "#f00", "#070", "#0f0", "#f60"];

/// Parse hex color string to RGB.
///
/// Accepts `#rgb` and `#rrggbb`, with or without the leading hash.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Ordered segment colours; segment `i` uses colour `i mod len`.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
}

impl Palette {
    /// Build a palette from hex strings, failing on the first bad entry.
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> MapResult<Self> {
        if colors.is_empty() {
            return Err(MapError::InvalidConfig(
                "element colour list is empty".to_string(),
            ));
        }
        let colors = colors
            .iter()
            .map(|c| {
                let c = c.as_ref();
                hex_to_rgb(c)
                    .map(|(r, g, b)| Rgba([r, g, b, 255]))
                    .ok_or_else(|| MapError::InvalidConfig(format!("bad colour '{}'", c)))
            })
            .collect::<MapResult<Vec<_>>>()?;
        Ok(Self { colors })
    }

    pub fn color_for(&self, index: usize) -> Rgba<u8> {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_ELEMENT_COLORS
                .iter()
                .filter_map(|c| hex_to_rgb(c))
                .map(|(r, g, b)| Rgba([r, g, b, 255]))
                .collect(),
        }
    }
}

/// Stroke and marker geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    /// Polyline width in pixels
    pub line_width: f32,
    /// Node marker radius in pixels
    pub marker_radius: f32,
    /// Segments with this many nodes or more get no markers
    pub marker_node_limit: usize,
    /// With more segments than this, only single-node segments get markers
    pub crowded_segment_limit: usize,
    /// Draw canvas-centre and projected-centre markers
    pub debug_alignment: bool,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            line_width: 4.0,
            marker_radius: 5.0,
            marker_node_limit: 80,
            crowded_segment_limit: 40,
            debug_alignment: false,
        }
    }
}

impl StrokeStyle {
    /// Whether a segment of `len` nodes, out of `segment_count`, gets markers.
    pub fn draws_markers(&self, len: usize, segment_count: usize) -> bool {
        if len == 1 {
            return true;
        }
        len < self.marker_node_limit && segment_count <= self.crowded_segment_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb_forms() {
        assert_eq!(hex_to_rgb("#f60"), Some((255, 102, 0)));
        assert_eq!(hex_to_rgb("700"), Some((119, 0, 0)));
        assert_eq!(hex_to_rgb("#FF8000"), Some((255, 128, 0)));
        assert_eq!(hex_to_rgb("#12345"), None);
        assert_eq!(hex_to_rgb("#ggg"), None);
        assert_eq!(hex_to_rgb("#é0"), None);
    }

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 6);
        assert_eq!(palette.color_for(0), Rgba([0, 0, 0, 255]));
        assert_eq!(palette.color_for(2), Rgba([255, 0, 0, 255]));
        assert_eq!(palette.color_for(8), palette.color_for(2));
    }

    #[test]
    fn test_palette_rejects_bad_colour() {
        let err = Palette::from_hex(&["#000", "blue"]).unwrap_err();
        assert!(matches!(err, MapError::InvalidConfig(_)));
        assert!(Palette::from_hex::<&str>(&[]).is_err());
    }

    #[test]
    fn test_marker_rule() {
        let style = StrokeStyle::default();
        assert!(style.draws_markers(79, 40));
        assert!(!style.draws_markers(80, 1));
        assert!(!style.draws_markers(10, 41));
        assert!(style.draws_markers(1, 500));
    }
}
