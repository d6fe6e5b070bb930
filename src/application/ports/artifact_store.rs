//! Durable voice-note storage port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::MediaError;
use crate::domain::recording::ArtifactHandle;

/// Port for the app-private store of saved voice notes, keyed by name
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Copy `artifact` into the store as `name`, replacing any file with
    /// that name. The source stays in place.
    async fn save_as(&self, artifact: &ArtifactHandle, name: &str) -> Result<String, MediaError>;

    /// Resolve a saved name to a readable handle.
    ///
    /// # Returns
    /// `MediaError::NotFound` if nothing is stored under `name`
    async fn resolve(&self, name: &str) -> Result<ArtifactHandle, MediaError>;

    /// Delete a saved name. Best-effort: failures are logged, never returned.
    async fn delete(&self, name: &str);

    /// Copy `artifact` into the store under a freshly generated unique name.
    async fn save(&self, artifact: &ArtifactHandle) -> Result<String, MediaError> {
        let name = generate_name(artifact);
        self.save_as(artifact, &name).await
    }
}

/// `<uuid>.<ext>`, keeping the artifact's extension
pub fn generate_name(artifact: &ArtifactHandle) -> String {
    format!("{}.{}", Uuid::new_v4(), artifact.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_unique_and_keep_extension() {
        let artifact = ArtifactHandle::temporary("/tmp/take.flac");
        let a = generate_name(&artifact);
        let b = generate_name(&artifact);
        assert_ne!(a, b);
        assert!(a.ends_with(".flac"));
        assert_eq!(a.len(), 36 + ".flac".len());
    }
}
