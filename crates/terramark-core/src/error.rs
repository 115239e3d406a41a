//! Error types for terramark
//!
//! Nothing here is fatal: remote failures trigger fallback, cache
//! corruption degrades to a miss, and validation failures leave state
//! unchanged. Callers turn each variant into a user-visible status.

use crate::types::Territory;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("remote unavailable: {reason}")]
    RemoteUnavailable { reason: String },

    #[error("cache corrupt: {0}")]
    CacheCorrupt(String),

    #[error("import invalid: {0}")]
    ImportInvalid(String),

    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("invalid territory: {0}")]
    InvalidTerritory(String),

    #[error(
        "capture incomplete: {points} point(s), need at least {}",
        Territory::MIN_BOUNDARY_POINTS
    )]
    CaptureIncomplete { points: usize },

    #[error("territory not found: {0}")]
    NotFound(String),

    #[error("invalid editor state: {0}")]
    InvalidState(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn remote_unavailable(reason: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            reason: reason.into(),
        }
    }

    pub fn import_invalid(message: impl Into<String>) -> Self {
        Self::ImportInvalid(message.into())
    }

    pub fn export_failed(message: impl Into<String>) -> Self {
        Self::ExportFailed(message.into())
    }

    /// True for failures the gateway silently degrades past (load falls
    /// through to the next tier instead of surfacing these).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RemoteUnavailable { .. } | Self::CacheCorrupt(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_incomplete_message_tracks_the_minimum() {
        let err = Error::CaptureIncomplete { points: 2 };
        let message = err.to_string();
        assert!(message.contains("2 point(s)"));
        assert!(message.contains(&Territory::MIN_BOUNDARY_POINTS.to_string()));
    }
}
