//! Media capture session
//!
//! Owns at most one recording or playback at a time. Hardware callbacks
//! (progress samples, end of playback) never touch session fields directly:
//! they arrive as signals on a channel and are applied by the owner through
//! [`MediaSession::next_update`] or [`MediaSession::pump`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::error::MediaError;
use crate::domain::recording::{ArtifactHandle, RecordingSettings};
use crate::domain::session::SessionMode;

use super::clock::{Sampler, DEFAULT_SAMPLE_INTERVAL};
use super::ports::{
    CaptureDevice, CaptureHandle, PermissionProvider, PlaybackDevice, PlaybackHandle,
};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where in-progress recordings are written
    pub scratch_dir: PathBuf,
    /// Capture settings for every recording
    pub settings: RecordingSettings,
    /// Progress sampling period
    pub sample_interval: StdDuration,
}

impl SessionConfig {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            settings: RecordingSettings::voice_note(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }
}

/// Observable change produced by applying a hardware signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Elapsed recording or playback time moved
    Elapsed(StdDuration),
    /// Playback reached the end of the artifact; the session is back to
    /// `RecordedReady`
    PlaybackFinished,
}

#[derive(Debug)]
enum Signal {
    Tick { generation: u64, position: StdDuration },
    PlaybackFinished { playback: u64 },
}

struct ActiveRecording {
    capture: Arc<dyn CaptureHandle>,
    target: PathBuf,
    sampler: Sampler,
}

struct ActivePlayback {
    id: u64,
    player: Arc<dyn PlaybackHandle>,
}

/// Mode plus the resources that mode owns. The artifact handle and the
/// sampler only exist in the variants that may hold them.
enum Stage {
    Idle,
    Recording(ActiveRecording),
    Ready(ArtifactHandle),
    Playing {
        artifact: ArtifactHandle,
        playback: ActivePlayback,
        sampler: Sampler,
    },
    Paused {
        artifact: ArtifactHandle,
        playback: ActivePlayback,
    },
}

impl Stage {
    fn mode(&self) -> SessionMode {
        match self {
            Self::Idle => SessionMode::Idle,
            Self::Recording(_) => SessionMode::Recording,
            Self::Ready(_) => SessionMode::RecordedReady,
            Self::Playing { .. } => SessionMode::Playing,
            Self::Paused { .. } => SessionMode::Paused,
        }
    }

    fn artifact(&self) -> Option<&ArtifactHandle> {
        match self {
            Self::Ready(artifact)
            | Self::Playing { artifact, .. }
            | Self::Paused { artifact, .. } => Some(artifact),
            Self::Idle | Self::Recording(_) => None,
        }
    }
}

/// Exclusive recording/playback session.
///
/// Operations are driven by a single owner and must run inside a tokio
/// runtime. Dropping the session stops any capture or playback and deletes
/// an unsaved temporary recording.
pub struct MediaSession<P, C, D>
where
    P: PermissionProvider,
    C: CaptureDevice,
    D: PlaybackDevice,
{
    permission: P,
    capture: C,
    playback: D,
    config: SessionConfig,
    stage: Stage,
    elapsed: StdDuration,
    generation: u64,
    signals_tx: mpsc::UnboundedSender<Signal>,
    signals_rx: mpsc::UnboundedReceiver<Signal>,
}

impl<P, C, D> MediaSession<P, C, D>
where
    P: PermissionProvider,
    C: CaptureDevice,
    D: PlaybackDevice,
{
    /// Create an idle session
    pub fn new(permission: P, capture: C, playback: D, config: SessionConfig) -> Self {
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        Self {
            permission,
            capture,
            playback,
            config,
            stage: Stage::Idle,
            elapsed: StdDuration::ZERO,
            generation: 0,
            signals_tx,
            signals_rx,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.stage.mode()
    }

    /// Elapsed recording time, or playback position
    pub fn elapsed(&self) -> StdDuration {
        self.elapsed
    }

    /// The recorded artifact, present in `RecordedReady`, `Playing` and
    /// `Paused`
    pub fn artifact(&self) -> Option<&ArtifactHandle> {
        self.stage.artifact()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_recording(&self) -> bool {
        self.mode() == SessionMode::Recording
    }

    pub fn is_playing(&self) -> bool {
        self.mode() == SessionMode::Playing
    }

    /// Start a new recording.
    ///
    /// Asks for capture permission first; a refusal leaves the session
    /// untouched. Any playback or unsaved previous take is released before
    /// the hardware is claimed.
    pub async fn start_recording(&mut self) -> Result<(), MediaError> {
        if self.is_recording() {
            return Err(MediaError::CaptureFailed(
                "Recording already in progress".to_string(),
            ));
        }

        if !self.permission.request_capture_permission().await {
            log::warn!("Capture permission declined");
            return Err(MediaError::PermissionDenied);
        }

        self.release();
        self.elapsed = StdDuration::ZERO;

        tokio::fs::create_dir_all(&self.config.scratch_dir)
            .await
            .map_err(|e| MediaError::CaptureFailed(format!("Scratch directory: {}", e)))?;

        let target = self.config.scratch_dir.join(format!(
            "{}.{}",
            Uuid::new_v4(),
            self.config.settings.format.extension()
        ));

        let capture = match self.capture.begin(&target, &self.config.settings).await {
            Ok(capture) => capture,
            Err(e) => {
                remove_scratch(&target);
                return Err(MediaError::CaptureFailed(e.to_string()));
            }
        };

        let generation = self.next_generation();
        let source = Arc::clone(&capture);
        let sampler = match self.spawn_sampler(generation, move || source.current_position()) {
            Ok(sampler) => sampler,
            Err(e) => {
                capture.abort();
                remove_scratch(&target);
                return Err(MediaError::CaptureFailed(e));
            }
        };

        log::info!("Recording to {}", target.display());
        self.stage = Stage::Recording(ActiveRecording {
            capture,
            target,
            sampler,
        });
        Ok(())
    }

    /// Stop recording and keep the take.
    ///
    /// # Returns
    /// The artifact, or `None` if no recording was in progress
    pub fn stop_recording(&mut self) -> Result<Option<ArtifactHandle>, MediaError> {
        let ActiveRecording {
            capture,
            target,
            sampler,
        } = match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Recording(recording) => recording,
            other => {
                self.stage = other;
                return Ok(None);
            }
        };

        drop(sampler);
        self.elapsed = capture.current_position();

        if let Err(e) = capture.finish() {
            log::error!("Failed to finalize recording: {}", e);
            remove_scratch(&target);
            self.elapsed = StdDuration::ZERO;
            return Err(MediaError::CaptureFailed(e.to_string()));
        }

        log::info!("Recording stopped after {:?}", self.elapsed);
        let artifact = ArtifactHandle::temporary(target);
        self.stage = Stage::Ready(artifact.clone());
        Ok(Some(artifact))
    }

    /// Stop recording and throw the take away.
    ///
    /// Always ends `Idle`. Called in any other mode it releases playback and
    /// discards the held temporary artifact the same way.
    pub fn cancel_recording(&mut self) {
        self.release();
        self.elapsed = StdDuration::ZERO;
        log::info!("Recording discarded");
    }

    /// Hold an existing artifact (typically a saved voice note) for
    /// playback. Durable artifacts are never deleted by the session.
    pub fn load_artifact(&mut self, artifact: ArtifactHandle) -> Result<(), MediaError> {
        if self.is_recording() {
            return Err(MediaError::PlaybackFailed(
                "Recording in progress".to_string(),
            ));
        }

        if self.stage.artifact() == Some(&artifact) {
            self.stop_playback();
            return Ok(());
        }

        self.release();
        self.elapsed = StdDuration::ZERO;
        self.stage = Stage::Ready(artifact);
        Ok(())
    }

    /// Play the held artifact from the start, replacing any current playback.
    pub fn play(&mut self) -> Result<(), MediaError> {
        let artifact = match &self.stage {
            Stage::Recording(_) => {
                return Err(MediaError::PlaybackFailed(
                    "Recording in progress".to_string(),
                ))
            }
            Stage::Idle => {
                return Err(MediaError::PlaybackFailed(
                    "Nothing recorded".to_string(),
                ))
            }
            Stage::Ready(artifact)
            | Stage::Playing { artifact, .. }
            | Stage::Paused { artifact, .. } => artifact.clone(),
        };

        self.stop_playback();

        let id = self.next_generation();
        let signals = self.signals_tx.clone();
        let player = self
            .playback
            .open(
                artifact.path(),
                Box::new(move || {
                    let _ = signals.send(Signal::PlaybackFinished { playback: id });
                }),
            )
            .map_err(|e| MediaError::PlaybackFailed(e.to_string()))?;

        if let Err(e) = player.play() {
            player.stop();
            return Err(MediaError::PlaybackFailed(e.to_string()));
        }

        let generation = self.next_generation();
        let source = Arc::clone(&player);
        let sampler = match self.spawn_sampler(generation, move || source.current_position()) {
            Ok(sampler) => sampler,
            Err(e) => {
                player.stop();
                return Err(MediaError::PlaybackFailed(e));
            }
        };

        log::info!("Playing {}", artifact.path().display());
        self.elapsed = StdDuration::ZERO;
        self.stage = Stage::Playing {
            artifact,
            playback: ActivePlayback { id, player },
            sampler,
        };
        Ok(())
    }

    /// Pause playback, keeping the position. No-op unless playing.
    pub fn pause(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Playing {
                artifact,
                playback,
                sampler,
            } => {
                drop(sampler);
                playback.player.pause();
                self.elapsed = playback.player.current_position();
                self.stage = Stage::Paused { artifact, playback };
            }
            other => self.stage = other,
        }
    }

    /// Continue a paused playback from its position.
    ///
    /// Already playing is a no-op. Any other mode fails with
    /// `PlaybackFailed`, including after `stop_playback`.
    pub fn resume(&mut self) -> Result<(), MediaError> {
        match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Paused { artifact, playback } => {
                if let Err(e) = playback.player.play() {
                    self.stage = Stage::Paused { artifact, playback };
                    return Err(MediaError::PlaybackFailed(e.to_string()));
                }

                let generation = self.next_generation();
                let source = Arc::clone(&playback.player);
                match self.spawn_sampler(generation, move || source.current_position()) {
                    Ok(sampler) => {
                        self.stage = Stage::Playing {
                            artifact,
                            playback,
                            sampler,
                        };
                        Ok(())
                    }
                    Err(e) => {
                        playback.player.pause();
                        self.stage = Stage::Paused { artifact, playback };
                        Err(MediaError::PlaybackFailed(e))
                    }
                }
            }
            playing @ Stage::Playing { .. } => {
                self.stage = playing;
                Ok(())
            }
            other => {
                self.stage = other;
                Err(MediaError::PlaybackFailed(
                    "Nothing paused to resume".to_string(),
                ))
            }
        }
    }

    /// Stop playback and return to `RecordedReady`. No-op unless playing or
    /// paused.
    pub fn stop_playback(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Playing {
                artifact,
                playback,
                sampler,
            } => {
                drop(sampler);
                playback.player.stop();
                self.elapsed = StdDuration::ZERO;
                self.stage = Stage::Ready(artifact);
            }
            Stage::Paused { artifact, playback } => {
                playback.player.stop();
                self.elapsed = StdDuration::ZERO;
                self.stage = Stage::Ready(artifact);
            }
            other => self.stage = other,
        }
    }

    /// Wait for the next hardware signal that still applies and apply it.
    ///
    /// Cancel-safe: dropping the future loses no signal. Pends forever while
    /// nothing is sampling, so use it inside `tokio::select!`.
    pub async fn next_update(&mut self) -> SessionUpdate {
        loop {
            let Some(signal) = self.signals_rx.recv().await else {
                // The session holds a sender, so the channel never closes.
                return std::future::pending().await;
            };
            if let Some(update) = self.apply(signal) {
                return update;
            }
        }
    }

    /// Apply every pending signal without waiting.
    pub fn pump(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(signal) = self.signals_rx.try_recv() {
            updates.extend(self.apply(signal));
        }
        updates
    }

    fn apply(&mut self, signal: Signal) -> Option<SessionUpdate> {
        match signal {
            Signal::Tick {
                generation,
                position,
            } => {
                if self.active_sampler() != Some(generation) {
                    log::debug!("Dropping stale sample from generation {}", generation);
                    return None;
                }
                self.elapsed = position;
                Some(SessionUpdate::Elapsed(position))
            }
            Signal::PlaybackFinished { playback } => {
                if self.active_playback() != Some(playback) {
                    log::debug!("Dropping completion of replaced playback {}", playback);
                    return None;
                }
                self.stop_playback();
                log::info!("Playback finished");
                Some(SessionUpdate::PlaybackFinished)
            }
        }
    }

    fn active_sampler(&self) -> Option<u64> {
        match &self.stage {
            Stage::Recording(recording) => Some(recording.sampler.generation()),
            Stage::Playing { sampler, .. } => Some(sampler.generation()),
            _ => None,
        }
    }

    fn active_playback(&self) -> Option<u64> {
        match &self.stage {
            Stage::Playing { playback, .. } | Stage::Paused { playback, .. } => Some(playback.id),
            _ => None,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn spawn_sampler<F>(&self, generation: u64, read_position: F) -> Result<Sampler, String>
    where
        F: FnMut() -> StdDuration + Send + 'static,
    {
        let signals = self.signals_tx.clone();
        Sampler::spawn(
            generation,
            self.config.sample_interval,
            read_position,
            move |generation, position| signals.send(Signal::Tick { generation, position }).is_ok(),
        )
        .map_err(|e| format!("No timer available: {}", e))
    }

    /// Tear down whatever the current mode owns and go `Idle`. Samplers are
    /// cancelled before the hardware is stopped.
    fn release(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Idle => {}
            Stage::Recording(ActiveRecording {
                capture,
                target,
                sampler,
            }) => {
                drop(sampler);
                capture.abort();
                remove_scratch(&target);
            }
            Stage::Ready(artifact) => discard(&artifact),
            Stage::Playing {
                artifact,
                playback,
                sampler,
            } => {
                drop(sampler);
                playback.player.stop();
                discard(&artifact);
            }
            Stage::Paused { artifact, playback } => {
                playback.player.stop();
                discard(&artifact);
            }
        }
    }
}

impl<P, C, D> Drop for MediaSession<P, C, D>
where
    P: PermissionProvider,
    C: CaptureDevice,
    D: PlaybackDevice,
{
    fn drop(&mut self) {
        if self.mode() != SessionMode::Idle {
            log::info!("Releasing session in {} mode", self.mode());
        }
        self.release();
    }
}

fn discard(artifact: &ArtifactHandle) {
    if artifact.is_temporary() {
        remove_scratch(artifact.path());
    }
}

fn remove_scratch(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            log::warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
