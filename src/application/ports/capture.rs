//! Capture and playback hardware ports

use std::path::Path;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::RecordingSettings;

/// Hardware-level failures reported by device adapters
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("No audio device available")]
    NoDevice,

    #[error("Failed to start device: {0}")]
    StartFailed(String),

    #[error("Failed to open audio: {0}")]
    OpenFailed(String),

    #[error("Failed to finalize recording: {0}")]
    FinalizeFailed(String),
}

/// Invoked once by a playback adapter when the artifact plays to its end.
/// Never invoked after an explicit stop.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Port for the capture hardware
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Begin capturing into `target`.
    ///
    /// # Returns
    /// A handle to the running capture, or an error if the hardware could
    /// not be initialized or started
    async fn begin(
        &self,
        target: &Path,
        settings: &RecordingSettings,
    ) -> Result<Arc<dyn CaptureHandle>, DeviceError>;
}

/// A running capture
pub trait CaptureHandle: Send + Sync {
    /// Position reported by the hardware since capture began
    fn current_position(&self) -> StdDuration;

    /// Stop capturing and write the artifact to the target path
    fn finish(&self) -> Result<(), DeviceError>;

    /// Stop capturing without writing anything
    fn abort(&self);
}

/// Port for the playback hardware
pub trait PlaybackDevice: Send + Sync {
    /// Open `source` for playback, initially paused.
    fn open(
        &self,
        source: &Path,
        on_complete: CompletionCallback,
    ) -> Result<Arc<dyn PlaybackHandle>, DeviceError>;
}

/// An open playback
pub trait PlaybackHandle: Send + Sync {
    /// Start or continue playing from the current position
    fn play(&self) -> Result<(), DeviceError>;

    /// Halt output, keeping the position
    fn pause(&self);

    /// Halt output and release the hardware
    fn stop(&self);

    /// Position within the artifact
    fn current_position(&self) -> StdDuration;
}
