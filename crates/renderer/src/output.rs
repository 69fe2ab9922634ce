//! Where rendered images are written.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::RgbaImage;
use map_common::{MapError, MapResult};

/// Placeholder in the filename template replaced by the render timestamp.
pub const TIMESTAMP_PLACEHOLDER: &str = "{t}";

/// Output filename template, e.g. `renders/map_{t}.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    template: String,
}

impl OutputTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Output path for a render finished at `at`.
    ///
    /// The timestamp is Unix seconds with microsecond fraction, so renders
    /// within the same second still get distinct names.
    pub fn path_for(&self, at: DateTime<Utc>) -> PathBuf {
        let stamp = format!("{}.{:06}", at.timestamp(), at.timestamp_subsec_micros());
        PathBuf::from(self.template.replace(TIMESTAMP_PLACEHOLDER, &stamp))
    }
}

impl Default for OutputTemplate {
    fn default() -> Self {
        Self::new("map_{t}.png")
    }
}

/// Encode `image` to `path`, creating parent directories as needed. The
/// format follows the file extension.
pub fn save_image(image: &RgbaImage, path: &Path) -> MapResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            MapError::RenderError(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }
    image
        .save(path)
        .map_err(|e| MapError::RenderError(format!("cannot write {}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), "Saved rendered image");
    Ok(())
}
