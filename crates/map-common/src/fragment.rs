//! Map viewport (zoom + center) and its `#map=zoom/lat/lon` URL fragment form.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{GeoPoint, MapError, MapResult};

const FRAGMENT_PREFIX: &str = "#map=";

/// The viewport a canvas depicts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewFragment {
    pub zoom: u32,
    pub lat: f64,
    pub lon: f64,
}

impl ViewFragment {
    pub fn new(zoom: u32, lat: f64, lon: f64) -> Self {
        Self { zoom, lat, lon }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Extract the viewport from a URL containing exactly one map fragment,
    /// e.g. `https://www.openstreetmap.org/#map=15/59.4370/24.7536`.
    pub fn from_url(url: &str) -> MapResult<Self> {
        let matches: Vec<ViewFragment> = url
            .match_indices(FRAGMENT_PREFIX)
            .filter_map(|(start, _)| parse_fragment_body(&url[start + FRAGMENT_PREFIX.len()..]))
            .collect();

        match matches.as_slice() {
            [single] => Ok(*single),
            [] => Err(MapError::InvalidFragment(format!(
                "no '{}zoom/lat/lon' found in '{}'",
                FRAGMENT_PREFIX, url
            ))),
            many => Err(MapError::InvalidFragment(format!(
                "expected one map fragment, found {} in '{}'",
                many.len(),
                url
            ))),
        }
    }
}

impl fmt::Display for ViewFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}/{}", FRAGMENT_PREFIX, self.zoom, self.lat, self.lon)
    }
}

fn parse_fragment_body(body: &str) -> Option<ViewFragment> {
    let end = body
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '/'))
        .unwrap_or(body.len());
    let parts: Vec<&str> = body[..end].split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let zoom: u32 = parts[0].parse().ok()?;
    let lat: f64 = parts[1].parse().ok()?;
    let lon: f64 = parts[2].parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }

    Some(ViewFragment { zoom, lat, lon })
}
