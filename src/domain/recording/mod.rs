//! Recording value objects

mod artifact;
mod settings;

pub use artifact::{ArtifactHandle, ArtifactKind};
pub use settings::{AudioFormat, EncoderQuality, RecordingSettings};
