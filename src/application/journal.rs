//! Journal browsing and maintenance use case

use uuid::Uuid;

use crate::domain::error::StoreError;
use crate::domain::journal::{filter_and_sort, unique_locations, Entry, FilterConfig};

use super::ports::{ArtifactStore, EntryStore};

/// Read and update operations over the stored journal
pub struct JournalUseCase<E, A>
where
    E: EntryStore,
    A: ArtifactStore,
{
    entries: E,
    artifacts: A,
}

impl<E, A> JournalUseCase<E, A>
where
    E: EntryStore,
    A: ArtifactStore,
{
    pub fn new(entries: E, artifacts: A) -> Self {
        Self { entries, artifacts }
    }

    /// Entries matching `filter`, in its sort order
    pub async fn list(&self, filter: &FilterConfig) -> Result<Vec<Entry>, StoreError> {
        let all = self.entries.all().await?;
        Ok(filter_and_sort(&all, filter).into_iter().cloned().collect())
    }

    /// Location choices for filtering, "All" first
    pub async fn locations(&self) -> Result<Vec<String>, StoreError> {
        Ok(unique_locations(&self.entries.all().await?))
    }

    /// Add one like, returning the updated entry
    pub async fn like(&self, id: Uuid) -> Result<Entry, StoreError> {
        let mut entry = self
            .entries
            .all()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        entry.like();
        self.entries.update(&entry).await?;
        Ok(entry)
    }

    /// Delete an entry and, best-effort, its voice note
    pub async fn delete(&self, id: Uuid) -> Result<Entry, StoreError> {
        let entry = self.entries.delete(id).await?;
        if let Some(name) = &entry.audio_name {
            self.artifacts.delete(name).await;
        }
        Ok(entry)
    }
}
