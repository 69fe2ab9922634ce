//! Batch map preview renderer.
//!
//! Reads render requests (element references or map links), resolves their
//! geometry from a local store, fits a viewport, composes the tile mosaic and
//! draws the elements on top.

pub mod assets;
pub mod config;
pub mod pipeline;
pub mod rate_limit;
pub mod resolver;

pub use config::{load_app_config, AppConfig};
pub use pipeline::{RenderOutcome, RenderPipeline, RenderRequest};
pub use rate_limit::RateLimiter;
pub use resolver::{GeometryStore, StoreResolver};
