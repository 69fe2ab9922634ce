//! Geometry lookup against a local JSON store.
//!
//! Store layout:
//!
//! ```json
//! {
//!   "elements":   { "way/123": [[[59.43, 24.75], [59.44, 24.76]]] },
//!   "notes":      { "42": { "lat": 59.43, "lon": 24.75, "solved": false } },
//!   "changesets": { "77": { "min_lat": 59.4, "max_lat": 59.5, "min_lon": 24.7, "max_lon": 24.8 } }
//! }
//! ```
//!
//! Elements map to lists of node lists; relation members without coordinates
//! may appear as `{"type": "way", "ref": 5}` and are skipped. Changesets are
//! drawn as their bounding rectangle.

use std::collections::HashMap;
use std::path::Path;

use map_common::{BoundingBox, GeoPoint, MapError, MapResult, Note, Segment};
use serde::Deserialize;
use viewport::{resolve_nodes, ElementRef, GeometryNode, GeometryResolver, RenderQueue, ResolvedGeometry};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeometryStore {
    #[serde(default)]
    pub elements: HashMap<String, Vec<Vec<GeometryNode>>>,
    #[serde(default)]
    pub notes: HashMap<u64, Note>,
    #[serde(default)]
    pub changesets: HashMap<u64, BoundingBox>,
}

impl GeometryStore {
    pub fn from_json(json: &str) -> MapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> MapResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }
}

/// [`GeometryResolver`] backed by a [`GeometryStore`].
#[derive(Debug, Clone, Default)]
pub struct StoreResolver {
    store: GeometryStore,
}

impl StoreResolver {
    pub fn new(store: GeometryStore) -> Self {
        Self { store }
    }

    fn note(&self, id: u64) -> MapResult<Note> {
        self.store
            .notes
            .get(&id)
            .copied()
            .ok_or_else(|| MapError::ResolveError(format!("note/{} not in geometry store", id)))
    }

    fn changeset_outline(&self, id: u64) -> MapResult<Segment> {
        let bbox = self.store.changesets.get(&id).ok_or_else(|| {
            MapError::ResolveError(format!("changeset/{} not in geometry store", id))
        })?;
        Ok(vec![
            GeoPoint::new(bbox.min_lat, bbox.min_lon),
            GeoPoint::new(bbox.min_lat, bbox.max_lon),
            GeoPoint::new(bbox.max_lat, bbox.max_lon),
            GeoPoint::new(bbox.max_lat, bbox.min_lon),
            GeoPoint::new(bbox.min_lat, bbox.min_lon),
        ])
    }

    fn element_segments(&self, element: &ElementRef) -> MapResult<Vec<Segment>> {
        let key = element.to_string();
        let nodes = self
            .store
            .elements
            .get(&key)
            .ok_or_else(|| MapError::ResolveError(format!("{} not in geometry store", key)))?;
        Ok(resolve_nodes(nodes.clone()))
    }
}

impl GeometryResolver for StoreResolver {
    fn resolve(&mut self, queue: &RenderQueue) -> MapResult<ResolvedGeometry> {
        let mut geometry = ResolvedGeometry::default();

        for element in queue.iter() {
            match element {
                ElementRef::Note { id } => geometry.notes.push(self.note(*id)?),
                ElementRef::Changeset { id } => geometry.segments.push(self.changeset_outline(*id)?),
                ElementRef::User { name } => {
                    tracing::warn!(user = %name, "User locations are not public, skipping");
                }
                ElementRef::Element { .. } => geometry.segments.extend(self.element_segments(element)?),
            }
        }

        tracing::debug!(
            segments = geometry.segments.len(),
            notes = geometry.notes.len(),
            "Resolved queue from geometry store"
        );
        Ok(geometry)
    }
}
