//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod artifact_store;
pub mod capture;
pub mod config;
pub mod entry_store;
pub mod geocoder;
pub mod permission;

// Re-export common types
pub use artifact_store::ArtifactStore;
pub use capture::{
    CaptureDevice, CaptureHandle, CompletionCallback, DeviceError, PlaybackDevice,
    PlaybackHandle,
};
pub use config::ConfigStore;
pub use entry_store::EntryStore;
pub use geocoder::{GeocodeError, Geocoder};
pub use permission::PermissionProvider;
