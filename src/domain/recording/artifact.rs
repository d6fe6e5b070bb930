//! Recorded artifact handle

use std::path::{Path, PathBuf};

/// Who owns the file behind a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Scratch file produced by a recording; deleted when discarded
    Temporary,
    /// File in the durable voice-note store; never deleted by a session
    Durable,
}

/// Opaque reference to a recorded audio file.
///
/// Cloning a handle does not copy the file. A temporary handle stays valid
/// until the owning session discards it; saving copies the file into durable
/// storage and leaves the temporary one in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactHandle {
    path: PathBuf,
    kind: ArtifactKind,
}

impl ArtifactHandle {
    /// Handle to a scratch recording
    pub fn temporary(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ArtifactKind::Temporary,
        }
    }

    /// Handle to a saved voice note
    pub fn durable(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ArtifactKind::Durable,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn is_temporary(&self) -> bool {
        self.kind == ArtifactKind::Temporary
    }

    /// File extension, defaulting to `flac`
    pub fn extension(&self) -> &str {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("flac")
    }
}
