//! Capture settings value object

use std::fmt;

/// Compressed container used for voice notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioFormat {
    #[default]
    Flac,
}

impl AudioFormat {
    /// Get the MIME type string
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Flac => "audio/flac",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Flac => "flac",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime_type())
    }
}

/// Encoder effort level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncoderQuality {
    Standard,
    #[default]
    High,
}

impl EncoderQuality {
    /// FLAC block size used for this quality level
    pub const fn block_size(&self) -> usize {
        match self {
            Self::Standard => 1152,
            Self::High => 4096,
        }
    }
}

/// Fixed settings for voice-note capture: mono, 44.1kHz, FLAC, high quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingSettings {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: AudioFormat,
    pub quality: EncoderQuality,
}

impl RecordingSettings {
    /// Sample rate for voice notes
    pub const SAMPLE_RATE: u32 = 44_100;

    /// The settings every recording uses
    pub const fn voice_note() -> Self {
        Self {
            sample_rate: Self::SAMPLE_RATE,
            channels: 1,
            format: AudioFormat::Flac,
            quality: EncoderQuality::High,
        }
    }
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self::voice_note()
    }
}
