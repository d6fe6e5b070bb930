//! Entry store port interface

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::StoreError;
use crate::domain::journal::Entry;

/// Port for the persistent journal
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Insert a new entry
    async fn insert(&self, entry: Entry) -> Result<(), StoreError>;

    /// Persist changes to an existing entry
    async fn update(&self, entry: &Entry) -> Result<(), StoreError>;

    /// Delete an entry, returning it
    async fn delete(&self, id: Uuid) -> Result<Entry, StoreError>;

    /// All entries in insertion order
    async fn all(&self) -> Result<Vec<Entry>, StoreError>;
}
