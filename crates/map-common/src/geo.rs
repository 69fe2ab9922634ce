//! Geographic value types handed through the render pipeline.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in degrees.
///
/// Serialized as a `[lat, lon]` pair, which is the shape geometry arrives in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Bit-exact key, usable for hashing and equality of whole segments.
    pub fn key(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(point: GeoPoint) -> Self {
        (point.lat, point.lon)
    }
}

/// One line feature (e.g. a way). Drawn as a polyline in point order.
pub type Segment = Vec<GeoPoint>;

/// A map note, drawn as an icon instead of a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub lat: f64,
    pub lon: f64,
    /// Closed notes use the "solved" icon.
    #[serde(default)]
    pub solved: bool,
}

impl Note {
    pub fn new(lat: f64, lon: f64, solved: bool) -> Self {
        Self { lat, lon, solved }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}
