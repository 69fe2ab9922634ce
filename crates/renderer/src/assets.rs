//! Note marker icons.
//!
//! Icons are decoded once up front and handed to the rasterizer; nothing in
//! the render path touches the filesystem for them.

use std::path::Path;

use image::RgbaImage;
use map_common::{MapError, MapResult};

/// Icons pasted at note positions, chosen by the note's solved flag.
#[derive(Debug, Clone)]
pub struct NoteIcons {
    open: RgbaImage,
    closed: RgbaImage,
}

impl NoteIcons {
    pub fn from_images(open: RgbaImage, closed: RgbaImage) -> Self {
        Self { open, closed }
    }

    /// Decode both icons from image files.
    pub fn load(open: impl AsRef<Path>, closed: impl AsRef<Path>) -> MapResult<Self> {
        Ok(Self {
            open: load_icon(open.as_ref())?,
            closed: load_icon(closed.as_ref())?,
        })
    }

    /// Decode both icons from encoded bytes (PNG, etc.).
    pub fn from_bytes(open: &[u8], closed: &[u8]) -> MapResult<Self> {
        Ok(Self {
            open: decode_icon(open, "open")?,
            closed: decode_icon(closed, "closed")?,
        })
    }

    pub fn icon_for(&self, solved: bool) -> &RgbaImage {
        if solved {
            &self.closed
        } else {
            &self.open
        }
    }
}

fn load_icon(path: &Path) -> MapResult<RgbaImage> {
    let img = image::open(path).map_err(|e| {
        MapError::AssetError(format!("icon {}: {}", path.display(), e))
    })?;
    tracing::debug!(path = %path.display(), width = img.width(), height = img.height(), "Loaded note icon");
    Ok(img.to_rgba8())
}

fn decode_icon(bytes: &[u8], which: &str) -> MapResult<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| MapError::AssetError(format!("{} note icon: {}", which, e)))
}
