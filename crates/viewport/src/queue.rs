//! Staging area for map elements waiting to be drawn.
//!
//! Elements are queued by reference (kind + id). Turning references into
//! coordinates is someone else's job: a [`GeometryResolver`] is handed the
//! queue and returns segments and notes. Only after that may the queue report
//! bounds.

use std::fmt;

use map_common::{BoundingBox, MapError, MapResult, Note, Segment};
use serde::{Deserialize, Serialize};

use crate::bounds::compute_bounds;

/// A reference to something that can be drawn on the map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementRef {
    Note { id: u64 },
    Changeset { id: u64 },
    User { name: String },
    /// Nodes, ways, relations and anything else with a numeric id
    Element { kind: String, id: u64 },
}

impl ElementRef {
    /// Build a reference from a loosely typed `(kind, id)` pair.
    ///
    /// Kind matching is case-insensitive; `note` and `notes` both mean notes,
    /// and unknown kinds become generic elements.
    pub fn parse(kind: &str, id: &str) -> MapResult<Self> {
        let lowered = kind.trim().to_lowercase();
        let element = match lowered.as_str() {
            "note" | "notes" => ElementRef::Note {
                id: parse_id(kind, id)?,
            },
            "changeset" => ElementRef::Changeset {
                id: parse_id(kind, id)?,
            },
            "user" => ElementRef::User {
                name: id.trim().to_string(),
            },
            _ => ElementRef::Element {
                id: parse_id(kind, id)?,
                kind: lowered,
            },
        };
        Ok(element)
    }

    pub fn kind(&self) -> &str {
        match self {
            ElementRef::Note { .. } => "note",
            ElementRef::Changeset { .. } => "changeset",
            ElementRef::User { .. } => "user",
            ElementRef::Element { kind, .. } => kind,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Note { id } | ElementRef::Changeset { id } | ElementRef::Element { id, .. } => {
                write!(f, "{}/{}", self.kind(), id)
            }
            ElementRef::User { name } => write!(f, "user/{}", name),
        }
    }
}

fn parse_id(kind: &str, id: &str) -> MapResult<u64> {
    id.trim().parse().map_err(|_| MapError::InvalidElement {
        kind: kind.to_string(),
        id: id.to_string(),
        message: "expected a numeric id".to_string(),
    })
}

/// Where a queue is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// References were added that have no geometry yet
    Pending,
    /// A resolver is currently looking geometry up
    Resolving,
    /// Every reference has geometry
    Resolved,
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueueState::Pending => "pending",
            QueueState::Resolving => "resolving",
            QueueState::Resolved => "resolved",
        };
        f.write_str(name)
    }
}

/// Drawable geometry produced for a queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedGeometry {
    pub segments: Vec<Segment>,
    pub notes: Vec<Note>,
}

/// Looks up coordinates for queued references (an OSM API client, a local
/// store, a test double).
pub trait GeometryResolver {
    fn resolve(&mut self, queue: &RenderQueue) -> MapResult<ResolvedGeometry>;
}

/// Queued element references, bucketed by kind.
#[derive(Debug, Clone)]
pub struct RenderQueue {
    notes: Vec<ElementRef>,
    changesets: Vec<ElementRef>,
    users: Vec<ElementRef>,
    elements: Vec<ElementRef>,
    state: QueueState,
    geometry: Option<ResolvedGeometry>,
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderQueue {
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            changesets: Vec::new(),
            users: Vec::new(),
            elements: Vec::new(),
            state: QueueState::Pending,
            geometry: None,
        }
    }

    /// Create a queue pre-filled with references.
    pub fn with_elements(elements: impl IntoIterator<Item = ElementRef>) -> Self {
        let mut queue = Self::new();
        queue.add_all(elements);
        queue
    }

    /// Queue one reference. Any previously resolved geometry is discarded.
    pub fn add(&mut self, element: ElementRef) {
        self.state = QueueState::Pending;
        self.geometry = None;
        match element {
            ElementRef::Note { .. } => self.notes.push(element),
            ElementRef::Changeset { .. } => self.changesets.push(element),
            ElementRef::User { .. } => self.users.push(element),
            ElementRef::Element { .. } => self.elements.push(element),
        }
    }

    pub fn add_all(&mut self, elements: impl IntoIterator<Item = ElementRef>) {
        for element in elements {
            self.add(element);
        }
    }

    /// Queue a loosely typed `(kind, id)` pair, see [`ElementRef::parse`].
    pub fn add_parsed(&mut self, kind: &str, id: &str) -> MapResult<()> {
        self.add(ElementRef::parse(kind, id)?);
        Ok(())
    }

    pub fn notes(&self) -> &[ElementRef] {
        &self.notes
    }

    pub fn changesets(&self) -> &[ElementRef] {
        &self.changesets
    }

    pub fn users(&self) -> &[ElementRef] {
        &self.users
    }

    pub fn elements(&self) -> &[ElementRef] {
        &self.elements
    }

    /// Every queued reference: notes, changesets, users, then elements.
    pub fn iter(&self) -> impl Iterator<Item = &ElementRef> {
        self.notes
            .iter()
            .chain(&self.changesets)
            .chain(&self.users)
            .chain(&self.elements)
    }

    pub fn len(&self) -> usize {
        self.notes.len() + self.changesets.len() + self.users.len() + self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    /// Run `resolver` over the queue and keep its geometry.
    ///
    /// On failure the queue goes back to [`QueueState::Pending`].
    pub fn resolve<R: GeometryResolver + ?Sized>(&mut self, resolver: &mut R) -> MapResult<()> {
        self.state = QueueState::Resolving;
        match resolver.resolve(self) {
            Ok(geometry) => {
                tracing::debug!(
                    elements = self.len(),
                    segments = geometry.segments.len(),
                    notes = geometry.notes.len(),
                    "Resolved render queue"
                );
                self.geometry = Some(geometry);
                self.state = QueueState::Resolved;
                Ok(())
            }
            Err(e) => {
                self.state = QueueState::Pending;
                Err(e)
            }
        }
    }

    /// Resolved geometry; fails unless the queue is resolved.
    pub fn geometry(&self) -> MapResult<&ResolvedGeometry> {
        match (&self.state, &self.geometry) {
            (QueueState::Resolved, Some(geometry)) => Ok(geometry),
            _ => Err(MapError::QueueNotResolved {
                state: self.state.to_string(),
            }),
        }
    }

    /// Take the resolved geometry out of the queue.
    pub fn into_geometry(self) -> MapResult<ResolvedGeometry> {
        match (self.state, self.geometry) {
            (QueueState::Resolved, Some(geometry)) => Ok(geometry),
            (state, _) => Err(MapError::QueueNotResolved {
                state: state.to_string(),
            }),
        }
    }

    /// Bounding box of the resolved geometry.
    pub fn bounds(&self) -> MapResult<BoundingBox> {
        let geometry = self.geometry()?;
        compute_bounds(&geometry.segments, &geometry.notes)
    }
}
