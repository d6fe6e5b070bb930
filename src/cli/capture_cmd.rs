//! Interactive record and play commands

use std::time::Duration as StdDuration;

use crate::application::ports::{ArtifactStore, CaptureDevice, PermissionProvider, PlaybackDevice};
use crate::application::{MediaSession, SessionUpdate};
use crate::domain::error::MediaError;
use crate::domain::recording::ArtifactHandle;

use super::app::{AppContext, CommandError};
use super::args::RecordArgs;
use super::presenter::{format_clock, Presenter};
use super::signals::{ConsoleEvent, ConsoleEvents};

/// Record a voice note and save it to the voice-note store
pub async fn handle_record(
    args: RecordArgs,
    context: &AppContext,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let limit = context.max_duration(args.capture.max_duration.as_deref())?;
    let mut session = context.session(args.capture.yes);

    let Some(take) = record_take(&mut session, presenter, limit).await? else {
        return Err(CommandError::Cancelled);
    };

    let name = context.artifact_store().save(&take).await?;
    presenter.success(&format!("Saved voice note {}", name));
    presenter.output(&name);
    Ok(())
}

/// Play a saved voice note
pub async fn handle_play(
    name: &str,
    context: &AppContext,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let artifact = context.artifact_store().resolve(name).await?;
    let mut session = context.session(false);
    play_artifact(&mut session, presenter, artifact).await?;
    Ok(())
}

/// Run one recording until Enter, end of stdin plus the limit, or Ctrl+C.
///
/// Returns the temporary take, still owned by `session`, or `None` when the
/// user cancelled.
pub async fn record_take<P, C, D>(
    session: &mut MediaSession<P, C, D>,
    presenter: &mut Presenter,
    limit: StdDuration,
) -> Result<Option<ArtifactHandle>, MediaError>
where
    P: PermissionProvider,
    C: CaptureDevice,
    D: PlaybackDevice,
{
    session.start_recording().await?;

    let mut console = ConsoleEvents::listen();
    presenter.start_spinner("Recording... (Enter to stop, Ctrl+C to cancel)");

    let deadline = tokio::time::sleep(limit);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            update = session.next_update() => {
                if let SessionUpdate::Elapsed(elapsed) = update {
                    presenter.update_recording_progress(elapsed, limit);
                }
            }
            event = console.recv() => match event {
                ConsoleEvent::Interrupt => {
                    session.cancel_recording();
                    presenter.spinner_fail("Recording cancelled");
                    return Ok(None);
                }
                ConsoleEvent::Line(_) => break,
                ConsoleEvent::Closed => {
                    log::debug!("Stdin closed, recording until the limit");
                }
            },
            () = &mut deadline => {
                presenter.update_spinner("Max duration reached, auto-stopping");
                break;
            }
        }
    }

    // Encoding runs on this thread; let the runtime move other tasks off it
    match tokio::task::block_in_place(|| session.stop_recording()) {
        Ok(Some(take)) => {
            presenter.spinner_success(&format!(
                "Recording complete ({})",
                format_clock(session.elapsed())
            ));
            Ok(Some(take))
        }
        Ok(None) => {
            presenter.spinner_fail("Nothing was recorded");
            Err(MediaError::CaptureFailed("No recording in progress".to_string()))
        }
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            Err(e)
        }
    }
}

/// Play `artifact` to the end. Enter toggles pause, `q` or Ctrl+C stops.
pub async fn play_artifact<P, C, D>(
    session: &mut MediaSession<P, C, D>,
    presenter: &mut Presenter,
    artifact: ArtifactHandle,
) -> Result<(), MediaError>
where
    P: PermissionProvider,
    C: CaptureDevice,
    D: PlaybackDevice,
{
    session.load_artifact(artifact)?;
    session.play()?;

    let mut console = ConsoleEvents::listen();
    presenter.start_spinner("Playing 00:00 (Enter to pause, q to stop)");

    loop {
        tokio::select! {
            update = session.next_update() => match update {
                SessionUpdate::Elapsed(position) => {
                    presenter.update_playback_progress(position, false);
                }
                SessionUpdate::PlaybackFinished => {
                    presenter.spinner_success("Playback finished");
                    return Ok(());
                }
            },
            event = console.recv() => match event {
                ConsoleEvent::Interrupt => {
                    session.stop_playback();
                    presenter.spinner_fail("Playback stopped");
                    return Ok(());
                }
                event if event.is_quit() => {
                    session.stop_playback();
                    presenter.spinner_success("Playback stopped");
                    return Ok(());
                }
                ConsoleEvent::Line(_) => {
                    if session.is_playing() {
                        session.pause();
                        presenter.update_playback_progress(session.elapsed(), true);
                    } else {
                        session.resume()?;
                        presenter.update_playback_progress(session.elapsed(), false);
                    }
                }
                ConsoleEvent::Closed => {
                    log::debug!("Stdin closed, playing to the end");
                }
            },
        }
    }
}
