//! Recording infrastructure module
//!
//! Provides microphone capture using cpal. Audio is resampled to the
//! voice-note rate and encoded to FLAC.

mod cpal_recorder;
mod flac_encoder;

pub use cpal_recorder::CpalCaptureDevice;
pub use flac_encoder::{encode_to_flac, EncodingError};
