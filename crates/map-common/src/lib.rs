//! Common types and utilities shared across the map rendering crates.

pub mod bbox;
pub mod config;
pub mod error;
pub mod fragment;
pub mod geo;
pub mod tile;

pub use bbox::{BoundingBox, BBOX_EPSILON, BBOX_PRECISION};
pub use config::RenderConfig;
pub use error::{MapError, MapResult};
pub use fragment::ViewFragment;
pub use geo::{GeoPoint, Note, Segment};
pub use tile::{TileCoord, TileRange};
