//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, rodio, Nominatim and the
//! filesystem.

pub mod config;
pub mod geocoding;
pub mod journal;
pub mod permission;
pub mod playback;
pub mod recording;
pub mod storage;

// Re-export adapters
pub use config::XdgConfigStore;
pub use geocoding::NominatimGeocoder;
pub use journal::JsonEntryStore;
pub use permission::TerminalPermission;
pub use playback::RodioPlaybackDevice;
pub use recording::CpalCaptureDevice;
pub use storage::FsArtifactStore;
