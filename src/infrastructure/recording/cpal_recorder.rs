//! Microphone capture using cpal
//!
//! The input stream lives on a dedicated thread because `cpal::Stream` is
//! not `Send`. Samples are mixed down to mono and buffered; `finish`
//! resamples to the target rate, encodes FLAC and writes the target file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::sync::oneshot;

use super::flac_encoder::encode_to_flac;
use crate::application::ports::{CaptureDevice, CaptureHandle, DeviceError};
use crate::domain::recording::RecordingSettings;

/// Capture device backed by the default cpal input
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalCaptureDevice;

impl CpalCaptureDevice {
    pub fn new() -> Self {
        Self
    }

    fn input_device() -> Result<cpal::Device, DeviceError> {
        cpal::default_host()
            .default_input_device()
            .ok_or(DeviceError::NoDevice)
    }

    /// Pick an i16/f32 input config, preferring fewer channels and one that
    /// supports `target_rate` directly
    fn input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), DeviceError> {
        let supported = device
            .supported_input_configs()
            .map_err(|e| DeviceError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let includes = |range: &cpal::SupportedStreamConfigRange| {
            range.min_sample_rate().0 <= target_rate && range.max_sample_rate().0 >= target_rate
        };

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for range in supported {
            if range.sample_format() != SampleFormat::I16
                && range.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let is_better = match &best {
                None => true,
                Some(current) => {
                    range.channels() < current.channels() || (includes(&range) && !includes(current))
                }
            };
            if is_better {
                best = Some(range);
            }
        }

        let range = best.ok_or_else(|| DeviceError::StartFailed("No suitable config found".into()))?;

        let sample_rate = if includes(&range) {
            SampleRate(target_rate)
        } else {
            range.max_sample_rate()
        };

        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, range.sample_format()))
    }
}

#[async_trait]
impl CaptureDevice for CpalCaptureDevice {
    async fn begin(
        &self,
        target: &Path,
        settings: &RecordingSettings,
    ) -> Result<Arc<dyn CaptureHandle>, DeviceError> {
        let shared = Arc::new(Shared::default());
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();

        let thread_shared = Arc::clone(&shared);
        let target_rate = settings.sample_rate;
        let thread = std::thread::Builder::new()
            .name("souvenirs-capture".into())
            .spawn(move || run_stream(thread_shared, target_rate, ready_tx, stop_rx))
            .map_err(|e| DeviceError::StartFailed(e.to_string()))?;

        let started = ready_rx
            .await
            .unwrap_or_else(|_| Err(DeviceError::StartFailed("Capture thread exited".into())));
        if let Err(e) = started {
            let _ = thread.join();
            return Err(e);
        }

        log::debug!(
            "Capturing at {} Hz into {}",
            shared.device_rate.load(Ordering::SeqCst),
            target.display()
        );

        let handle: Arc<dyn CaptureHandle> = Arc::new(CpalCapture {
            shared,
            target: target.to_path_buf(),
            settings: *settings,
            stop: Mutex::new(Some(stop_tx)),
            thread: Mutex::new(Some(thread)),
        });
        Ok(handle)
    }
}

/// State written by the stream callback
#[derive(Default)]
struct Shared {
    /// Mono i16 samples at the device rate
    buffer: Mutex<Vec<i16>>,
    frames: AtomicU64,
    device_rate: AtomicU32,
    accepting: AtomicBool,
}

impl Shared {
    fn push(&self, mono: &[i16]) {
        if !self.accepting.load(Ordering::SeqCst) {
            return;
        }
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.extend_from_slice(mono);
        }
        self.frames.fetch_add(mono.len() as u64, Ordering::SeqCst);
    }
}

fn run_stream(
    shared: Arc<Shared>,
    target_rate: u32,
    ready: oneshot::Sender<Result<(), DeviceError>>,
    stop: std_mpsc::Receiver<()>,
) {
    let stream = match open_stream(&shared, target_rate) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    shared.accepting.store(true, Ordering::SeqCst);
    if ready.send(Ok(())).is_err() {
        return;
    }

    // Park until the handle drops its sender
    let _ = stop.recv();
    shared.accepting.store(false, Ordering::SeqCst);
    drop(stream);
}

fn open_stream(shared: &Arc<Shared>, target_rate: u32) -> Result<cpal::Stream, DeviceError> {
    let device = CpalCaptureDevice::input_device()?;
    let (config, sample_format) = CpalCaptureDevice::input_config(&device, target_rate)?;
    let channels = config.channels;
    shared.device_rate.store(config.sample_rate.0, Ordering::SeqCst);

    let on_error = |err: cpal::StreamError| log::error!("Audio stream error: {}", err);

    let stream = match sample_format {
        SampleFormat::I16 => {
            let shared = Arc::clone(shared);
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    shared.push(&stereo_to_mono(data, channels));
                },
                on_error,
                None,
            )
        }
        SampleFormat::F32 => {
            let shared = Arc::clone(shared);
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let i16_data: Vec<i16> = data.iter().map(|&s| (s * 32767.0) as i16).collect();
                    shared.push(&stereo_to_mono(&i16_data, channels));
                },
                on_error,
                None,
            )
        }
        _ => return Err(DeviceError::StartFailed("Unsupported sample format".into())),
    }
    .map_err(|e| DeviceError::StartFailed(e.to_string()))?;

    stream
        .play()
        .map_err(|e| DeviceError::StartFailed(e.to_string()))?;

    Ok(stream)
}

/// A running cpal capture
struct CpalCapture {
    shared: Arc<Shared>,
    target: PathBuf,
    settings: RecordingSettings,
    stop: Mutex<Option<std_mpsc::Sender<()>>>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl CpalCapture {
    /// Stop the stream and wait for the capture thread. Idempotent.
    fn halt(&self) {
        self.shared.accepting.store(false, Ordering::SeqCst);
        self.stop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let thread = self
            .thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(thread) = thread {
            if thread.join().is_err() {
                log::error!("Capture thread panicked");
            }
        }
    }

    fn take_samples(&self) -> Vec<i16> {
        std::mem::take(&mut *self.shared.buffer.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl CaptureHandle for CpalCapture {
    fn current_position(&self) -> StdDuration {
        frames_to_duration(
            self.shared.frames.load(Ordering::SeqCst),
            self.shared.device_rate.load(Ordering::SeqCst),
        )
    }

    fn finish(&self) -> Result<(), DeviceError> {
        self.halt();

        let samples = self.take_samples();
        let device_rate = self.shared.device_rate.load(Ordering::SeqCst);
        let resampled = resample(&samples, device_rate, self.settings.sample_rate)?;
        let encoded = encode_to_flac(&resampled, &self.settings)
            .map_err(|e| DeviceError::FinalizeFailed(e.to_string()))?;

        std::fs::write(&self.target, &encoded)
            .map_err(|e| DeviceError::FinalizeFailed(format!("{}: {}", self.target.display(), e)))?;

        log::debug!(
            "Wrote {} bytes to {}",
            encoded.len(),
            self.target.display()
        );
        Ok(())
    }

    fn abort(&self) {
        self.halt();
        self.take_samples();
    }
}

impl Drop for CpalCapture {
    fn drop(&mut self) {
        self.halt();
    }
}

fn frames_to_duration(frames: u64, rate: u32) -> StdDuration {
    if rate == 0 {
        return StdDuration::ZERO;
    }
    StdDuration::from_micros(frames.saturating_mul(1_000_000) / rate as u64)
}

/// Mix interleaved frames down to mono
fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|chunk| {
            let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
            (sum / chunk.len() as i32) as i16
        })
        .collect()
}

/// Resample mono audio from `source_rate` to `target_rate`
fn resample(samples: &[i16], source_rate: u32, target_rate: u32) -> Result<Vec<i16>, DeviceError> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if source_rate == 0 {
        return Err(DeviceError::FinalizeFailed("Sample rate not set".into()));
    }

    let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        1024, // chunk size
        2,    // sub-chunks
        1,    // mono
    )
    .map_err(|e| DeviceError::FinalizeFailed(format!("Resampler init failed: {}", e)))?;

    let mut output = Vec::with_capacity(output_len);
    let mut input_pos = 0;

    while input_pos < samples_f32.len() {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(samples_f32.len());

        let mut chunk = samples_f32[input_pos..end_pos].to_vec();
        chunk.resize(frames_needed, 0.0);
        let input = vec![chunk];

        let resampled = resampler
            .process(&input, None)
            .map_err(|e| DeviceError::FinalizeFailed(format!("Resampling failed: {}", e)))?;

        output.extend(
            resampled[0]
                .iter()
                .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16),
        );
        input_pos = end_pos;
    }

    output.truncate(output_len);
    Ok(output)
}
