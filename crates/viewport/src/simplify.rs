//! Adaptive polyline thinning.
//!
//! Long ways are reduced by picking every n-th node, where the number kept
//! grows with the square root of the excess over [`MIN_REDUCED_NODES`]:
//! `kept = floor(sqrt(len - 50) + 50)`. Shorter ways are left alone. Both
//! endpoints always survive.

use std::collections::HashSet;

use map_common::{GeoPoint, Segment};
use serde::{Deserialize, Serialize};

/// Segments shorter than this are never reduced.
pub const MIN_REDUCED_NODES: usize = 50;

/// A node of raw element geometry as delivered by the geometry lookup.
///
/// Relations can reference members that carry no coordinates of their own;
/// those are dropped when segments are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeometryNode {
    /// A `[lat, lon]` pair
    Located(GeoPoint),
    /// A relation member without direct coordinates
    Member {
        #[serde(rename = "type")]
        kind: String,
        #[serde(rename = "ref")]
        id: u64,
    },
}

/// Turn raw node lists into segments, skipping nodes without coordinates and
/// segments left empty.
pub fn resolve_nodes(raw: Vec<Vec<GeometryNode>>) -> Vec<Segment> {
    let mut skipped = 0usize;
    let segments: Vec<Segment> = raw
        .into_iter()
        .map(|nodes| {
            nodes
                .into_iter()
                .filter_map(|node| match node {
                    GeometryNode::Located(point) => Some(point),
                    GeometryNode::Member { .. } => {
                        skipped += 1;
                        None
                    }
                })
                .collect::<Segment>()
        })
        .filter(|segment| !segment.is_empty())
        .collect();

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped relation members without coordinates");
    }
    segments
}

/// Number of nodes a segment of `len` nodes is reduced to (before the last
/// node is re-appended).
pub fn reduced_len(len: usize) -> usize {
    if len < MIN_REDUCED_NODES {
        return len;
    }
    (((len - MIN_REDUCED_NODES) as f64).sqrt() + MIN_REDUCED_NODES as f64) as usize
}

/// Reduce one segment, keeping its first and last point.
pub fn simplify_segment(segment: &[GeoPoint]) -> Segment {
    let len = segment.len();
    if len < MIN_REDUCED_NODES {
        return segment.to_vec();
    }

    let limit = reduced_len(len);
    let step = len as f64 / limit as f64;
    let mut reduced = Vec::with_capacity(limit + 1);

    let mut position = 0.0;
    while position < len as f64 {
        reduced.push(segment[position as usize]);
        position += step;
    }
    if (position - step) as usize != len - 1 {
        reduced.push(segment[len - 1]);
    }
    reduced
}

/// Reduce every segment and drop exact duplicates (first occurrence wins).
pub fn simplify(segments: Vec<Segment>) -> Vec<Segment> {
    let before = segments.len();
    let mut seen: HashSet<Vec<(u64, u64)>> = HashSet::with_capacity(before);

    let reduced: Vec<Segment> = segments
        .iter()
        .map(|segment| simplify_segment(segment))
        .filter(|segment| seen.insert(segment.iter().map(GeoPoint::key).collect()))
        .collect();

    tracing::debug!(before, after = reduced.len(), "Simplified segments");
    reduced
}
