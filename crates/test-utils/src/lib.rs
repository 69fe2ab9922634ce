//! Shared test utilities for the map rendering workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Geometry generators (lines, rings, scattered points)
//! - Render fixtures (configs, blank mosaics, note icons, tile directories)
//! - Temporary directory helpers
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, straight_line};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of pixel positions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_pixel_near;
///
/// assert_pixel_near!((640, 641), (640, 640), 1);
/// ```
#[macro_export]
macro_rules! assert_pixel_near {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (ax, ay): (i32, i32) = $actual;
        let (ex, ey): (i32, i32) = $expected;
        let tolerance: i32 = $tolerance;
        if (ax - ex).abs() > tolerance || (ay - ey).abs() > tolerance {
            panic!(
                "pixel ({}, {}) is more than {}px from ({}, {})",
                ax, ay, tolerance, ex, ey
            );
        }
    }};
}
