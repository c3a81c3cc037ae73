//! Error types for the tracker.

use thiserror::Error;

/// Failures of the key/value store holding the saved track.
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Atomic replace of the store file failed
    #[error("Failed to persist store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Errors reported by a transcription source when asked to begin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Microphone or speech service access was refused
    #[error("Speech recognition permission denied: {0}")]
    PermissionDenied(String),

    /// Any other failure; the feed may succeed on a later attempt
    #[error("Speech recognition failed to start: {0}")]
    Failed(String),
}

/// Errors surfaced by the tracker session lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The host offers no speech recognition
    #[error("Speech recognition is not available on this platform")]
    CapabilityMissing,

    /// Recognition permission was refused; listening must be restarted explicitly
    #[error("Speech recognition permission denied: {0}")]
    PermissionDenied(String),

    /// The transcription feed could not be started
    #[error("Speech recognition failed to start: {0}")]
    SourceFailed(String),
}

impl From<SourceError> for SessionError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::PermissionDenied(msg) => SessionError::PermissionDenied(msg),
            SourceError::Failed(msg) => SessionError::SourceFailed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_maps_to_session_error() {
        assert_eq!(
            SessionError::from(SourceError::PermissionDenied("not-allowed".into())),
            SessionError::PermissionDenied("not-allowed".into())
        );
        assert_eq!(
            SessionError::from(SourceError::Failed("busy".into())),
            SessionError::SourceFailed("busy".into())
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SessionError::CapabilityMissing.to_string(),
            "Speech recognition is not available on this platform"
        );
    }
}
