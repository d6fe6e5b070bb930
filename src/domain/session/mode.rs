//! Media session modes

use std::fmt;

/// Observable mode of a media session.
///
/// State machine:
///   IDLE -> RECORDING (start_recording)
///   RECORDING -> RECORDED_READY (stop_recording)
///   RECORDING -> IDLE (cancel_recording)
///   RECORDED_READY -> PLAYING (play)
///   PLAYING -> PAUSED (pause), PAUSED -> PLAYING (resume)
///   PLAYING | PAUSED -> RECORDED_READY (stop_playback, end of artifact)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionMode {
    #[default]
    Idle,
    Recording,
    RecordedReady,
    Playing,
    Paused,
}

impl SessionMode {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::RecordedReady => "recorded",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }

    /// Whether a session in this mode holds an artifact handle
    pub const fn holds_artifact(&self) -> bool {
        matches!(self, Self::RecordedReady | Self::Playing | Self::Paused)
    }

    /// Whether a sampler is running in this mode
    pub const fn is_sampling(&self) -> bool {
        matches!(self, Self::Recording | Self::Playing)
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
