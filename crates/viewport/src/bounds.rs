//! Bounding box of render geometry.

use map_common::bbox::round_coord;
use map_common::{BoundingBox, GeoPoint, MapError, MapResult, Note, Segment};

/// Running extrema; each edge is rounded when it is replaced.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl Extent {
    fn seed(lat: f64, lon: f64) -> Self {
        let (lat, lon) = (round_coord(lat), round_coord(lon));
        Self {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        }
    }

    fn include(&mut self, lat: f64, lon: f64) {
        if lat > self.max_lat {
            self.max_lat = round_coord(lat);
        }
        if lat < self.min_lat {
            self.min_lat = round_coord(lat);
        }
        if lon > self.max_lon {
            self.max_lon = round_coord(lon);
        }
        if lon < self.min_lon {
            self.min_lon = round_coord(lon);
        }
    }
}

/// Compute the bounding box of every segment point and note.
///
/// Edges are rounded to 5 decimals as they are found, and zero-extent axes
/// are widened afterwards. Fails with [`MapError::EmptyGeometry`] when there
/// is not a single coordinate.
pub fn compute_bounds(segments: &[Segment], notes: &[Note]) -> MapResult<BoundingBox> {
    let points = segments
        .iter()
        .flatten()
        .copied()
        .chain(notes.iter().map(Note::point));

    let mut extent: Option<Extent> = None;
    for GeoPoint { lat, lon } in points {
        match extent.as_mut() {
            Some(e) => e.include(lat, lon),
            None => extent = Some(Extent::seed(lat, lon)),
        }
    }

    let e = extent.ok_or(MapError::EmptyGeometry)?;
    let bbox = BoundingBox::new(e.min_lat, e.max_lat, e.min_lon, e.max_lon).expand_degenerate();
    tracing::debug!(
        min_lat = bbox.min_lat,
        max_lat = bbox.max_lat,
        min_lon = bbox.min_lon,
        max_lon = bbox.max_lon,
        "Elements bounding box"
    );
    Ok(bbox)
}
