//! Geometry generators for creating synthetic element shapes.
//!
//! These produce predictable segments so tests can reason about lengths,
//! endpoints and extents without real map data.

use map_common::{GeoPoint, Note, Segment};

/// Creates a straight line of `len` points starting at `start`, each one
/// `step` degrees further in both latitude and longitude.
///
/// # Example
///
/// ```
/// use map_common::GeoPoint;
/// use test_utils::straight_line;
///
/// let line = straight_line(GeoPoint::new(59.0, 24.0), 3, 0.5);
/// assert_eq!(line.len(), 3);
/// assert_eq!(line[2], GeoPoint::new(60.0, 25.0));
/// ```
pub fn straight_line(start: GeoPoint, len: usize, step: f64) -> Segment {
    (0..len)
        .map(|i| GeoPoint::new(start.lat + i as f64 * step, start.lon + i as f64 * step))
        .collect()
}

/// Creates a closed ring of `points` points around `center`.
///
/// The first point is repeated at the end, like a closed way.
pub fn ring(center: GeoPoint, radius_deg: f64, points: usize) -> Segment {
    let points = points.max(3);
    let mut ring: Segment = (0..points)
        .map(|i| {
            let angle = i as f64 / points as f64 * std::f64::consts::TAU;
            GeoPoint::new(
                center.lat + radius_deg * angle.sin(),
                center.lon + radius_deg * angle.cos(),
            )
        })
        .collect();
    ring.push(ring[0]);
    ring
}

/// Creates a zigzag heading east, alternating `amplitude` degrees north and
/// south of `start.lat`.
pub fn zigzag(start: GeoPoint, len: usize, amplitude: f64, step: f64) -> Segment {
    (0..len)
        .map(|i| {
            let lat = if i % 2 == 0 {
                start.lat
            } else {
                start.lat + amplitude
            };
            GeoPoint::new(lat, start.lon + i as f64 * step)
        })
        .collect()
}

/// Creates `count` notes on a diagonal starting at `start`.
pub fn notes_along(start: GeoPoint, count: usize, step: f64) -> Vec<Note> {
    straight_line(start, count, step)
        .into_iter()
        .enumerate()
        .map(|(i, p)| Note {
            lat: p.lat,
            lon: p.lon,
            solved: i % 2 == 1,
        })
        .collect()
}

/// Deterministic pseudo-random points inside a box.
///
/// Uses a small linear congruential generator so the output is the same on
/// every run without pulling `rand` into non-dev code.
pub fn scattered_points(
    seed: u64,
    count: usize,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
) -> Vec<GeoPoint> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..count)
        .map(|_| {
            let lat = lat_range.0 + next() * (lat_range.1 - lat_range.0);
            let lon = lon_range.0 + next() * (lon_range.1 - lon_range.0);
            GeoPoint::new(lat, lon)
        })
        .collect()
}
