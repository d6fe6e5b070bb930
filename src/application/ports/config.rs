//! Settings storage port

use std::path::Path;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Where the user's settings file lives and how it is read and written
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Settings from the file, all fields unset when there is no file yet
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    fn path(&self) -> &Path;

    fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Write the default settings. Never overwrites an existing file.
    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path().to_string_lossy().into_owned(),
            ));
        }
        self.save(&AppConfig::defaults()).await
    }
}
