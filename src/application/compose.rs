//! Compose entry use case
//!
//! Validates a draft, saves the attached voice note, enriches the location
//! with coordinates under a deadline and inserts the entry.

use std::time::Duration as StdDuration;

use thiserror::Error;

use crate::domain::error::{DraftError, MediaError, StoreError};
use crate::domain::journal::{Entry, EntryDraft};
use crate::domain::recording::ArtifactHandle;

use super::lookup::{BoundedLookup, DEFAULT_LOOKUP_DEADLINE};
use super::ports::{ArtifactStore, EntryStore, Geocoder};

/// Errors from the compose use case
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("{0}")]
    Invalid(#[from] DraftError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Turns a draft plus optional recording into a persisted entry
pub struct ComposeEntryUseCase<A, G, E>
where
    A: ArtifactStore,
    G: Geocoder,
    E: EntryStore,
{
    artifacts: A,
    lookup: BoundedLookup<G>,
    entries: E,
    deadline: StdDuration,
}

impl<A, G, E> ComposeEntryUseCase<A, G, E>
where
    A: ArtifactStore,
    G: Geocoder,
    E: EntryStore,
{
    pub fn new(artifacts: A, geocoder: G, entries: E) -> Self {
        Self {
            artifacts,
            lookup: BoundedLookup::new(geocoder),
            entries,
            deadline: DEFAULT_LOOKUP_DEADLINE,
        }
    }

    /// Override the geocoding deadline
    pub fn with_deadline(mut self, deadline: StdDuration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Validate, save audio, geocode, insert.
    ///
    /// The voice note is copied into durable storage before the entry is
    /// written, so the caller may discard its temporary artifact afterwards.
    /// A saved note is deleted again if the entry cannot be inserted.
    pub async fn execute(
        &self,
        draft: EntryDraft,
        audio: Option<&ArtifactHandle>,
    ) -> Result<Entry, ComposeError> {
        draft.validate(audio.is_some())?;

        let audio_name = match audio {
            Some(artifact) => Some(self.artifacts.save(artifact).await?),
            None => None,
        };

        let outcome = self
            .lookup
            .lookup(&draft.location_label, self.deadline)
            .await;

        let entry = draft.into_entry(outcome.coordinate, audio_name);

        if let Err(e) = self.entries.insert(entry.clone()).await {
            if let Some(name) = &entry.audio_name {
                self.artifacts.delete(name).await;
            }
            return Err(e.into());
        }

        log::info!("Saved entry {} ({})", entry.id, entry.title);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::GeocodeError;
    use crate::domain::journal::Coordinate;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct MemoryArtifacts {
        saved: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ArtifactStore for MemoryArtifacts {
        async fn save_as(
            &self,
            _artifact: &ArtifactHandle,
            name: &str,
        ) -> Result<String, MediaError> {
            if self.fail {
                return Err(MediaError::StorageFailed("disk full".into()));
            }
            self.saved.lock().unwrap().push(name.to_string());
            Ok(name.to_string())
        }

        async fn resolve(&self, name: &str) -> Result<ArtifactHandle, MediaError> {
            Err(MediaError::NotFound(name.to_string()))
        }

        async fn delete(&self, name: &str) {
            self.saved.lock().unwrap().retain(|n| n != name);
        }
    }

    struct FixedGeocoder(Option<Coordinate>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn resolve(&self, _query: &str) -> Result<Coordinate, GeocodeError> {
            self.0.ok_or(GeocodeError::NoMatch)
        }
    }

    #[derive(Default)]
    struct MemoryEntries {
        entries: Mutex<Vec<Entry>>,
        fail: bool,
    }

    #[async_trait]
    impl EntryStore for MemoryEntries {
        async fn insert(&self, entry: Entry) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::WriteError("read-only".into()));
            }
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }

        async fn update(&self, _entry: &Entry) -> Result<(), StoreError> {
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> Result<Entry, StoreError> {
            Err(StoreError::NotFound(id))
        }

        async fn all(&self) -> Result<Vec<Entry>, StoreError> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    fn draft(body: &str) -> EntryDraft {
        EntryDraft {
            title: " Picnic ".to_string(),
            body: body.to_string(),
            location_label: "Paris".to_string(),
            is_anonymous: true,
        }
    }

    fn use_case(
        coordinate: Option<Coordinate>,
    ) -> ComposeEntryUseCase<MemoryArtifacts, FixedGeocoder, MemoryEntries> {
        ComposeEntryUseCase::new(
            MemoryArtifacts::default(),
            FixedGeocoder(coordinate),
            MemoryEntries::default(),
        )
    }

    #[tokio::test]
    async fn composes_entry_with_coordinate() {
        let paris = Coordinate::new(48.8566, 2.3522);
        let compose = use_case(Some(paris));

        let entry = compose.execute(draft("Sunny"), None).await.unwrap();

        assert_eq!(entry.title, "Picnic");
        assert_eq!(entry.coordinate, Some(paris));
        assert!(entry.is_anonymous);
        assert!(!entry.has_audio());
        assert_eq!(compose.entries.all().await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn missing_coordinate_does_not_block_entry() {
        let compose = use_case(None);
        let entry = compose.execute(draft("Sunny"), None).await.unwrap();
        assert!(entry.coordinate.is_none());
    }

    #[tokio::test]
    async fn audio_is_saved_and_named() {
        let compose = use_case(None);
        let take = ArtifactHandle::temporary("/tmp/take.flac");

        let entry = compose.execute(draft(""), Some(&take)).await.unwrap();

        let name = entry.audio_name.clone().unwrap();
        assert!(name.ends_with(".flac"));
        assert_eq!(*compose.artifacts.saved.lock().unwrap(), vec![name]);
    }

    #[tokio::test]
    async fn invalid_draft_saves_nothing() {
        let compose = use_case(None);
        let err = compose.execute(draft(""), None).await.unwrap_err();

        assert!(matches!(err, ComposeError::Invalid(DraftError::MissingContent)));
        assert!(compose.entries.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_reported() {
        let compose = ComposeEntryUseCase::new(
            MemoryArtifacts {
                fail: true,
                ..Default::default()
            },
            FixedGeocoder(None),
            MemoryEntries::default(),
        );
        let take = ArtifactHandle::temporary("/tmp/take.flac");

        let err = compose.execute(draft(""), Some(&take)).await.unwrap_err();
        assert!(matches!(
            err,
            ComposeError::Media(MediaError::StorageFailed(_))
        ));
        assert!(compose.entries.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_insert_removes_saved_audio() {
        let compose = ComposeEntryUseCase::new(
            MemoryArtifacts::default(),
            FixedGeocoder(None),
            MemoryEntries {
                fail: true,
                ..Default::default()
            },
        );
        let take = ArtifactHandle::temporary("/tmp/take.flac");

        let err = compose.execute(draft(""), Some(&take)).await.unwrap_err();
        assert!(matches!(err, ComposeError::Store(_)));
        assert!(compose.artifacts.saved.lock().unwrap().is_empty());
    }
}
