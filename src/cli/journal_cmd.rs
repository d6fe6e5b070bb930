//! Journal commands: add, list, locations, like, delete, geocode

use uuid::Uuid;

use crate::application::{BoundedLookup, ComposeEntryUseCase, JournalUseCase};
use crate::domain::journal::{EntryDraft, FilterConfig, LocationFilter};
use crate::domain::recording::ArtifactHandle;
use crate::infrastructure::{FsArtifactStore, JsonEntryStore};

use super::app::{AppContext, CommandError};
use super::args::{AddArgs, ListArgs};
use super::capture_cmd::record_take;
use super::presenter::Presenter;

/// Create an entry, optionally with a fresh recording or an imported file
pub async fn handle_add(
    args: AddArgs,
    context: &AppContext,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let deadline = context.lookup_deadline(args.timeout.as_deref())?;

    let draft = EntryDraft {
        title: args.title,
        body: args.body,
        location_label: args.location,
        is_anonymous: args.anonymous,
    };
    // Fail on an incomplete draft before asking for the microphone
    draft
        .validate(args.record || args.audio_file.is_some())
        .map_err(|e| CommandError::Usage(e.to_string()))?;

    // The session owns the temporary take; keep it alive until the entry
    // has copied it into the voice-note store.
    let mut session = None;
    let audio = if args.record {
        let limit = context.max_duration(args.capture.max_duration.as_deref())?;
        let session = session.insert(context.session(args.capture.yes));
        match record_take(session, presenter, limit).await? {
            Some(take) => Some(take),
            None => return Err(CommandError::Cancelled),
        }
    } else {
        args.audio_file.map(ArtifactHandle::durable)
    };

    let compose = ComposeEntryUseCase::new(
        context.artifact_store(),
        context.geocoder()?,
        context.entry_store(),
    )
    .with_deadline(deadline);

    presenter.start_spinner("Saving memory...");
    let entry = match compose.execute(draft, audio.as_ref()).await {
        Ok(entry) => entry,
        Err(e) => {
            presenter.spinner_fail("Memory not saved");
            return Err(e.into());
        }
    };
    drop(session);

    match entry.coordinate {
        Some(c) => presenter.spinner_success(&format!(
            "Memory saved at {:.4}, {:.4}",
            c.latitude, c.longitude
        )),
        None => presenter.spinner_success("Memory saved (no coordinates)"),
    }
    presenter.output(&entry.id.to_string());
    Ok(())
}

/// Print entries matching the filter flags
pub async fn handle_list(
    args: ListArgs,
    context: &AppContext,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let filter = FilterConfig {
        search_text: args.search,
        location: args
            .location
            .as_deref()
            .map(LocationFilter::from_label)
            .unwrap_or_default(),
        audio_only: args.audio_only,
        sort_order: args.sort,
    };

    let entries = journal(context).list(&filter).await?;
    if entries.is_empty() {
        let message = if filter.is_filtering() {
            "No memories match these filters"
        } else {
            "No memories yet. Add one with 'souvenirs add'"
        };
        presenter.info(message);
        return Ok(());
    }

    for entry in &entries {
        presenter.entry(entry);
    }
    log::debug!("Listed {} entries ({})", entries.len(), filter.sort_order.label());
    Ok(())
}

/// Print the location filter choices
pub async fn handle_locations(
    context: &AppContext,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    for location in journal(context).locations().await? {
        presenter.output(&location);
    }
    Ok(())
}

pub async fn handle_like(
    id: Uuid,
    context: &AppContext,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let entry = journal(context).like(id).await?;
    presenter.success(&format!("{} ♥ {}", entry.title, entry.like_count));
    Ok(())
}

pub async fn handle_delete(
    id: Uuid,
    context: &AppContext,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let entry = journal(context).delete(id).await?;
    presenter.success(&format!("Deleted \"{}\"", entry.title));
    Ok(())
}

/// Resolve a place name under the lookup deadline
pub async fn handle_geocode(
    query: &str,
    timeout: Option<&str>,
    context: &AppContext,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let deadline = context.lookup_deadline(timeout)?;
    let lookup = BoundedLookup::new(context.geocoder()?);

    presenter.start_spinner(&format!("Looking up {}...", query.trim()));
    let outcome = lookup.lookup(query, deadline).await;
    presenter.stop_spinner();

    let coordinate = outcome
        .coordinate
        .ok_or_else(|| CommandError::NoCoordinates(query.trim().to_string()))?;
    presenter.output(&format!("{}, {}", coordinate.latitude, coordinate.longitude));
    Ok(())
}

fn journal(context: &AppContext) -> JournalUseCase<JsonEntryStore, FsArtifactStore> {
    JournalUseCase::new(context.entry_store(), context.artifact_store())
}
