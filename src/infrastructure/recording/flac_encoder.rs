//! FLAC encoder for voice notes
//!
//! Lossless compression keeps the recorded voice intact at roughly 40-60%
//! of the WAV size. Input is mono 16-bit PCM.

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;

use crate::domain::recording::RecordingSettings;

/// Bits per sample (16-bit audio)
const BITS_PER_SAMPLE: usize = 16;

/// Encode mono PCM samples recorded with `settings` to FLAC bytes
pub fn encode_to_flac(
    pcm_samples: &[i16],
    settings: &RecordingSettings,
) -> Result<Vec<u8>, EncodingError> {
    if pcm_samples.is_empty() {
        return Err(EncodingError::Empty);
    }

    // flacenc works on i32 samples
    let samples_i32: Vec<i32> = pcm_samples.iter().map(|&s| s as i32).collect();

    let mut config = config::Encoder::default();
    config.block_size = settings.quality.block_size();
    let config = config
        .into_verified()
        .map_err(|(_, e)| EncodingError::Config(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &samples_i32,
        settings.channels as usize,
        BITS_PER_SAMPLE,
        settings.sample_rate as usize,
    );

    let flac_stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodingError::Encode(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    flac_stream
        .write(&mut sink)
        .map_err(|e| EncodingError::Write(e.to_string()))?;

    Ok(sink.into_inner())
}

/// FLAC encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("No audio data captured")]
    Empty,

    #[error("FLAC config error: {0}")]
    Config(String),

    #[error("FLAC encoding failed: {0}")]
    Encode(String),

    #[error("FLAC write failed: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::EncoderQuality;

    const RATE: usize = RecordingSettings::SAMPLE_RATE as usize;

    #[test]
    fn encode_silence_has_flac_header() {
        let silence = vec![0i16; RATE];
        let flac_data = encode_to_flac(&silence, &RecordingSettings::voice_note()).unwrap();

        assert!(flac_data.len() > 50);
        assert_eq!(&flac_data[0..4], b"fLaC");
    }

    #[test]
    fn encode_shorter_than_one_block() {
        let short = vec![0i16; 1000];
        assert!(encode_to_flac(&short, &RecordingSettings::voice_note()).is_ok());
    }

    #[test]
    fn encode_tone_compresses() {
        let samples: Vec<i16> = (0..RATE)
            .map(|i| {
                let t = i as f32 / RATE as f32;
                (f32::sin(2.0 * std::f32::consts::PI * 440.0 * t) * 16000.0) as i16
            })
            .collect();

        let flac_data = encode_to_flac(&samples, &RecordingSettings::voice_note()).unwrap();
        assert!(flac_data.len() < samples.len() * 2);
    }

    #[test]
    fn standard_quality_also_encodes() {
        let settings = RecordingSettings {
            quality: EncoderQuality::Standard,
            ..RecordingSettings::voice_note()
        };
        assert!(encode_to_flac(&vec![0i16; RATE / 2], &settings).is_ok());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            encode_to_flac(&[], &RecordingSettings::voice_note()),
            Err(EncodingError::Empty)
        ));
    }
}
