//! Capture permission port

use async_trait::async_trait;

/// Port for asking the user whether the microphone may be used
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Ask for capture permission. One round trip; latency is up to the user.
    async fn request_capture_permission(&self) -> bool;
}
