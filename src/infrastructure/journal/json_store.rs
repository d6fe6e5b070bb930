//! JSON file journal store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::EntryStore;
use crate::domain::error::StoreError;
use crate::domain::journal::Entry;

/// Keeps the whole journal as a pretty-printed JSON array.
///
/// Every operation reads the file, changes it and writes it back through a
/// temporary file, under one lock per store.
pub struct JsonEntryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<Entry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::ReadError(e.to_string()))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| StoreError::ParseError(e.to_string()))
    }

    async fn write(&self, entries: &[Entry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::WriteError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::WriteError(e.to_string()))?;

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, content)
            .await
            .map_err(|e| StoreError::WriteError(e.to_string()))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| StoreError::WriteError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl EntryStore for JsonEntryStore {
    async fn insert(&self, entry: Entry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        entries.push(entry);
        self.write(&entries).await
    }

    async fn update(&self, entry: &Entry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        let slot = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or(StoreError::NotFound(entry.id))?;
        *slot = entry.clone();
        self.write(&entries).await
    }

    async fn delete(&self, id: Uuid) -> Result<Entry, StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = entries.remove(index);
        self.write(&entries).await?;
        Ok(removed)
    }

    async fn all(&self) -> Result<Vec<Entry>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }
}
