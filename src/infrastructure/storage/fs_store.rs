//! Directory-backed voice-note store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::ArtifactStore;
use crate::domain::error::MediaError;
use crate::domain::recording::ArtifactHandle;

/// Stores voice notes as plain files in one app-private directory
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a stored name. Names are bare file names; anything that
    /// could escape the directory is rejected.
    fn path_for(&self, name: &str) -> Result<PathBuf, MediaError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !valid {
            return Err(MediaError::NotFound(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save_as(&self, artifact: &ArtifactHandle, name: &str) -> Result<String, MediaError> {
        let target = self
            .path_for(name)
            .map_err(|_| MediaError::StorageFailed(format!("Invalid name: {}", name)))?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| MediaError::StorageFailed(e.to_string()))?;

        fs::copy(artifact.path(), &target).await.map_err(|e| {
            MediaError::StorageFailed(format!("{}: {}", artifact.path().display(), e))
        })?;

        log::info!("Saved voice note {}", name);
        Ok(name.to_string())
    }

    async fn resolve(&self, name: &str) -> Result<ArtifactHandle, MediaError> {
        let path = self.path_for(name)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(ArtifactHandle::durable(path)),
            _ => Err(MediaError::NotFound(name.to_string())),
        }
    }

    async fn delete(&self, name: &str) {
        let Ok(path) = self.path_for(name) else {
            log::warn!("Refusing to delete invalid name {:?}", name);
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => log::info!("Deleted voice note {}", name),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to delete {}: {}", path.display(), e),
        }
    }
}
