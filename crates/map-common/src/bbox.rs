//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// Decimal digits kept for bounding box edges (~1.1 m at the equator).
pub const BBOX_PRECISION: i32 = 5;

/// Amount a zero-extent axis is widened by on each side, in degrees.
pub const BBOX_EPSILON: f64 = 1e-5;

/// Round a coordinate to [`BBOX_PRECISION`] decimal places, ties to even.
pub fn round_coord(value: f64) -> f64 {
    let scale = 10f64.powi(BBOX_PRECISION);
    round_half_even(value * scale) / scale
}

fn round_half_even(value: f64) -> f64 {
    let rounded = value.round();
    if (rounded - value).abs() == 0.5 {
        2.0 * (value / 2.0).round()
    } else {
        rounded
    }
}

/// A geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Widen any zero-extent axis by [`BBOX_EPSILON`] on both sides.
    ///
    /// Keeps later zoom math (which divides by the span) finite.
    pub fn expand_degenerate(mut self) -> Self {
        if self.min_lat == self.max_lat {
            self.min_lat -= BBOX_EPSILON;
            self.max_lat += BBOX_EPSILON;
        }
        if self.min_lon == self.max_lon {
            self.min_lon -= BBOX_EPSILON;
            self.max_lon += BBOX_EPSILON;
        }
        self
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            self.min_lat + self.lat_span() / 2.0,
            self.min_lon + self.lon_span() / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_coord() {
        assert_eq!(round_coord(12.3456789), 12.34568);
        assert_eq!(round_coord(-0.000004), -0.0);
        assert_eq!(round_coord(59.0), 59.0);
    }

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(3.5), 4.0);
        assert_eq!(round_half_even(-2.5), -2.0);
        assert_eq!(round_half_even(2.6), 3.0);
        assert_eq!(round_half_even(-3.4), -3.0);
        // Both scale to an exact .5 in f64.
        assert_eq!(round_coord(0.000125), 0.00012);
        assert_eq!(round_coord(0.000375), 0.00038);
    }

    #[test]
    fn test_expand_degenerate_both_axes() {
        let bbox = BoundingBox::new(10.0, 10.0, 20.0, 20.0).expand_degenerate();
        assert!((bbox.lat_span() - 2e-5).abs() < 1e-12);
        assert!((bbox.lon_span() - 2e-5).abs() < 1e-12);
        assert!((bbox.center().lat - 10.0).abs() < 1e-12);
        assert!((bbox.center().lon - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_expand_degenerate_leaves_real_extent() {
        let bbox = BoundingBox::new(10.0, 11.0, 20.0, 20.0).expand_degenerate();
        assert_eq!(bbox.min_lat, 10.0);
        assert_eq!(bbox.max_lat, 11.0);
        assert!(bbox.lon_span() > 0.0);
    }
}
