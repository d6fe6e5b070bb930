//! Voice-note playback using rodio
//!
//! Each opened file gets its own thread owning the output stream and sink
//! (`rodio::OutputStream` is not `Send`). The handle talks to it over a
//! command channel.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration as StdDuration, Instant};

use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{
    CompletionCallback, DeviceError, PlaybackDevice, PlaybackHandle,
};

/// How often the playback thread checks for the end of the source
const POLL_INTERVAL: StdDuration = StdDuration::from_millis(20);

/// Playback device backed by the default rodio output
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioPlaybackDevice;

impl RodioPlaybackDevice {
    pub fn new() -> Self {
        Self
    }
}

impl PlaybackDevice for RodioPlaybackDevice {
    fn open(
        &self,
        source: &Path,
        on_complete: CompletionCallback,
    ) -> Result<Arc<dyn PlaybackHandle>, DeviceError> {
        let file = File::open(source)
            .map_err(|e| DeviceError::OpenFailed(format!("{}: {}", source.display(), e)))?;

        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);
        let (commands, command_rx) = std_mpsc::channel();

        std::thread::Builder::new()
            .name("souvenirs-playback".into())
            .spawn(move || run_player(file, ready_tx, command_rx, on_complete))
            .map_err(|e| DeviceError::OpenFailed(e.to_string()))?;

        ready_rx
            .recv()
            .unwrap_or_else(|_| Err(DeviceError::OpenFailed("Playback thread exited".into())))?;

        log::debug!("Opened {} for playback", source.display());

        let handle: Arc<dyn PlaybackHandle> = Arc::new(RodioPlayback {
            commands,
            clock: Mutex::new(PlayClock::default()),
        });
        Ok(handle)
    }
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Play,
    Pause,
    Stop,
}

fn run_player(
    file: File,
    ready: std_mpsc::SyncSender<Result<(), DeviceError>>,
    commands: std_mpsc::Receiver<Command>,
    on_complete: CompletionCallback,
) {
    let (_stream, sink) = match open_sink(file) {
        Ok(opened) => opened,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    if ready.send(Ok(())).is_err() {
        return;
    }

    loop {
        match commands.recv_timeout(POLL_INTERVAL) {
            Ok(Command::Play) => sink.play(),
            Ok(Command::Pause) => sink.pause(),
            Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => {
                sink.stop();
                return;
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        if sink.empty() {
            on_complete();
            return;
        }
    }
}

/// Decode `file` into a paused sink
fn open_sink(file: File) -> Result<(OutputStream, Sink), DeviceError> {
    let (stream, stream_handle) =
        OutputStream::try_default().map_err(|e| DeviceError::OpenFailed(e.to_string()))?;
    let sink = Sink::try_new(&stream_handle).map_err(|e| DeviceError::OpenFailed(e.to_string()))?;
    let decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| DeviceError::OpenFailed(format!("Unreadable audio: {}", e)))?;

    sink.pause();
    sink.append(decoder);
    Ok((stream, sink))
}

/// An open rodio playback
struct RodioPlayback {
    commands: std_mpsc::Sender<Command>,
    clock: Mutex<PlayClock>,
}

impl RodioPlayback {
    fn clock(&self) -> std::sync::MutexGuard<'_, PlayClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlaybackHandle for RodioPlayback {
    fn play(&self) -> Result<(), DeviceError> {
        self.commands
            .send(Command::Play)
            .map_err(|_| DeviceError::StartFailed("Playback already ended".into()))?;
        self.clock().resume(Instant::now());
        Ok(())
    }

    fn pause(&self) {
        let _ = self.commands.send(Command::Pause);
        self.clock().pause(Instant::now());
    }

    fn stop(&self) {
        let _ = self.commands.send(Command::Stop);
        self.clock().pause(Instant::now());
    }

    fn current_position(&self) -> StdDuration {
        self.clock().position(Instant::now())
    }
}

impl Drop for RodioPlayback {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Stop);
    }
}

/// Wall-clock playback position that freezes while paused
#[derive(Debug, Default, Clone, Copy)]
struct PlayClock {
    played: StdDuration,
    resumed_at: Option<Instant>,
}

impl PlayClock {
    fn resume(&mut self, now: Instant) {
        if self.resumed_at.is_none() {
            self.resumed_at = Some(now);
        }
    }

    fn pause(&mut self, now: Instant) {
        if let Some(resumed_at) = self.resumed_at.take() {
            self.played += now.saturating_duration_since(resumed_at);
        }
    }

    fn position(&self, now: Instant) -> StdDuration {
        self.played
            + self
                .resumed_at
                .map(|r| now.saturating_duration_since(r))
                .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: StdDuration = StdDuration::from_secs(1);

    #[test]
    fn clock_starts_at_zero() {
        let clock = PlayClock::default();
        assert_eq!(clock.position(Instant::now()), StdDuration::ZERO);
    }

    #[test]
    fn clock_advances_only_while_playing() {
        let t0 = Instant::now();
        let mut clock = PlayClock::default();

        clock.resume(t0);
        assert_eq!(clock.position(t0 + SEC), SEC);

        clock.pause(t0 + SEC * 2);
        assert_eq!(clock.position(t0 + SEC * 10), SEC * 2);

        clock.resume(t0 + SEC * 10);
        assert_eq!(clock.position(t0 + SEC * 11), SEC * 3);
    }

    #[test]
    fn repeated_resume_keeps_first_start() {
        let t0 = Instant::now();
        let mut clock = PlayClock::default();
        clock.resume(t0);
        clock.resume(t0 + SEC);
        assert_eq!(clock.position(t0 + SEC * 2), SEC * 2);
    }

    #[test]
    fn missing_file_fails_to_open() {
        let result = RodioPlaybackDevice::new().open(
            Path::new("/nonexistent/souvenirs/note.flac"),
            Box::new(|| {}),
        );
        assert!(matches!(result, Err(DeviceError::OpenFailed(_))));
    }

    #[test]
    #[ignore = "Requires audio hardware"]
    fn can_open_recorded_note() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.flac");
        let samples = vec![0i16; 44_100];
        let bytes = crate::infrastructure::recording::encode_to_flac(
            &samples,
            &crate::domain::recording::RecordingSettings::voice_note(),
        )
        .unwrap();
        std::fs::write(&path, bytes).unwrap();

        let player = RodioPlaybackDevice::new()
            .open(&path, Box::new(|| {}))
            .unwrap();
        player.play().unwrap();
        player.stop();
    }
}
