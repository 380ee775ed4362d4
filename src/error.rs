//! Error taxonomy for rendering and caching.
//!
//! Internal code propagates [`RenderError`] with `?`. The public
//! [`StencilRenderer`](crate::StencilRenderer) surface never returns it: each
//! variant is recovered locally (see [`RenderError::is_cache_failure`]).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::SizePx;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A named stencil could not be located in the asset catalog.
    #[error("stencil `{name}` not found")]
    SourceNotFound { name: String },

    /// A stencil file was found but could not be decoded.
    #[error("failed to decode stencil {path}: {reason}")]
    SourceDecode { path: PathBuf, reason: String },

    /// The requested output has a zero dimension.
    #[error("cannot render an image of size {0}")]
    InvalidSize(SizePx),

    /// The rendered bitmap could not be serialized.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// The cache directory could not be created.
    #[error("failed to create cache directory {path}: {source}")]
    CacheDirectory { path: PathBuf, source: io::Error },

    /// A cache entry could not be written (disk full, permissions).
    #[error("failed to write cache entry {path}: {source}")]
    CacheWrite { path: PathBuf, source: io::Error },

    /// A cache entry exists but is unreadable or corrupt.
    #[error("failed to read cache entry {path}: {reason}")]
    CacheRead { path: PathBuf, reason: String },
}

impl RenderError {
    /// Returns true for failures that only affect persistence, not the render itself.
    pub fn is_cache_failure(&self) -> bool {
        matches!(
            self,
            Self::Encode(_)
                | Self::CacheDirectory { .. }
                | Self::CacheWrite { .. }
                | Self::CacheRead { .. }
        )
    }
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_failures_are_classified() {
        let write = RenderError::CacheWrite {
            path: PathBuf::from("/tmp/x.png"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(write.is_cache_failure());
        assert!(write.to_string().contains("/tmp/x.png"));

        let missing = RenderError::SourceNotFound { name: "star".into() };
        assert!(!missing.is_cache_failure());
        assert_eq!(missing.to_string(), "stencil `star` not found");
    }

    #[test]
    fn invalid_size_message() {
        let err = RenderError::InvalidSize(SizePx::new(0, 4));
        assert_eq!(err.to_string(), "cannot render an image of size 0x4");
    }
}
