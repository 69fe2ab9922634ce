//! Path utilities for tests that write rendered output or read tile trees.

use std::path::{Path, PathBuf};

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Path of a tile image inside a `{z}/{x}/{y}.png` tree.
pub fn tile_path(root: &Path, z: u32, x: u32, y: u32) -> PathBuf {
    root.join(z.to_string())
        .join(x.to_string())
        .join(format!("{}.png", y))
}
