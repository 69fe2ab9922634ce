//! Viewport planning for map previews.
//!
//! Takes the geometry of queued map elements and decides what the rendered
//! canvas should show:
//!
//! ```text
//! RenderQueue ──resolve──► segments + notes
//!      │
//!      ├─► simplify()            thin out dense polylines, drop duplicates
//!      ├─► compute_bounds()      5-decimal bounding box
//!      ├─► choose_viewport()     zoom + center fitting the usable tile grid
//!      └─► resolve_tile_range()  tile window + sub-tile pixel alignment
//! ```
//!
//! Everything here is synchronous and allocation-light; no I/O happens in
//! this crate.

pub mod bounds;
pub mod planner;
pub mod queue;
pub mod simplify;
pub mod tile_range;

pub use bounds::compute_bounds;
pub use planner::ViewportPlanner;
pub use queue::{ElementRef, GeometryResolver, QueueState, RenderQueue, ResolvedGeometry};
pub use simplify::{resolve_nodes, simplify, simplify_segment, GeometryNode};
pub use tile_range::{resolve_tile_range, tile_range_for};
