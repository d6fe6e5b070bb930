//! Application layer - Use cases and port interfaces
//!
//! Contains the media session, the bounded lookup, journal use cases and
//! trait definitions for external system interactions.

pub mod clock;
pub mod compose;
pub mod journal;
pub mod lookup;
pub mod ports;
pub mod session;

// Re-export use cases
pub use compose::{ComposeEntryUseCase, ComposeError};
pub use journal::JournalUseCase;
pub use lookup::{BoundedLookup, LookupOutcome, DEFAULT_LOOKUP_DEADLINE};
pub use session::{MediaSession, SessionConfig, SessionUpdate};
