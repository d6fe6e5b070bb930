//! Domain layer - Core business logic
//!
//! Contains value objects, entities, the filter/sort pipeline and domain
//! errors. This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod journal;
pub mod recording;
pub mod session;

// Re-export common types
pub use config::{AppConfig, TimeLimit};
pub use error::*;
pub use journal::{Coordinate, Entry, EntryDraft, FilterConfig, LocationFilter, SortOrder};
pub use recording::{ArtifactHandle, RecordingSettings};
pub use session::SessionMode;
