//! Error types for the map rendering pipeline.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for map rendering operations.
#[derive(Debug, Error)]
pub enum MapError {
    // === Input Errors ===
    #[error("No coordinates to compute bounds from")]
    EmptyGeometry,

    #[error("Render queue is {state}: element IDs were queued but never converted into coordinates")]
    QueueNotResolved { state: String },

    #[error("Invalid element '{kind}' with id '{id}': {message}")]
    InvalidElement {
        kind: String,
        id: String,
        message: String,
    },

    #[error("Invalid map fragment URL: {0}")]
    InvalidFragment(String),

    #[error("Rate limit exceeded for '{user}'")]
    RateLimited { user: String },

    // === Setup Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load asset: {0}")]
    AssetError(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Geometry resolution failed: {0}")]
    ResolveError(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl MapError {
    /// Whether the error was caused by what the user asked for, as opposed to
    /// a fault in the service itself.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            MapError::EmptyGeometry
                | MapError::InvalidElement { .. }
                | MapError::InvalidFragment(_)
                | MapError::RateLimited { .. }
                | MapError::ResolveError(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::InternalError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(MapError::EmptyGeometry.is_user_error());
        assert!(MapError::InvalidFragment("x".into()).is_user_error());
        assert!(MapError::RateLimited {
            user: "alice".into()
        }
        .is_user_error());
        assert!(!MapError::RenderError("disk full".into()).is_user_error());
        assert!(!MapError::QueueNotResolved {
            state: "pending".into()
        }
        .is_user_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: MapError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, MapError::InternalError(_)));
        assert!(err.to_string().contains("gone"));
    }
}
