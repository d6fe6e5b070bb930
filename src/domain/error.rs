//! Domain error types

use thiserror::Error;
use uuid::Uuid;

/// Error when a time limit is not written as seconds, minutes or both
#[derive(Debug, Clone, Error)]
#[error("Invalid time limit: \"{input}\". Use seconds, minutes or both (e.g. 5s, 5m, 2m30s)")]
pub struct TimeLimitParseError {
    pub input: String,
}

/// Error when an unknown sort order is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid sort order: \"{input}\". Valid orders are: newest, oldest, most-liked, a-z")]
pub struct InvalidSortOrderError {
    pub input: String,
}

/// Media session and artifact storage errors.
///
/// Every variant is terminal for the call that produced it only; the
/// session stays usable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("Microphone access was declined. Grant access and try again.")]
    PermissionDenied,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Voice note not found: {0}")]
    NotFound(String),

    #[error("Storage failed: {0}")]
    StorageFailed(String),
}

/// Error when an entry draft is incomplete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Please enter a title for your memory.")]
    MissingTitle,

    #[error("Please enter a location.")]
    MissingLocation,

    #[error("Please share your story or record audio.")]
    MissingContent,
}

/// Entry store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Failed to read journal: {0}")]
    ReadError(String),

    #[error("Failed to parse journal: {0}")]
    ParseError(String),

    #[error("Failed to write journal: {0}")]
    WriteError(String),

    #[error("No entry with id {0}")]
    NotFound(Uuid),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
