//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::TimeLimit;

/// Public Nominatim search endpoint
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Geocoding provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub url: Option<String>,
    pub user_agent: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub audio_dir: Option<String>,
    pub scratch_dir: Option<String>,
    pub journal_path: Option<String>,
    pub geocode_timeout: Option<String>,
    pub max_duration: Option<String>,
    pub auto_grant: Option<bool>,
    pub geocoder: Option<GeocoderConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            audio_dir: None,
            scratch_dir: None,
            journal_path: None,
            geocode_timeout: Some(TimeLimit::LOOKUP.to_string()),
            max_duration: Some(TimeLimit::RECORDING.to_string()),
            auto_grant: Some(false),
            geocoder: Some(GeocoderConfig {
                url: Some(DEFAULT_GEOCODER_URL.to_string()),
                user_agent: Some(default_user_agent()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            audio_dir: other.audio_dir.or(self.audio_dir),
            scratch_dir: other.scratch_dir.or(self.scratch_dir),
            journal_path: other.journal_path.or(self.journal_path),
            geocode_timeout: other.geocode_timeout.or(self.geocode_timeout),
            max_duration: other.max_duration.or(self.max_duration),
            auto_grant: other.auto_grant.or(self.auto_grant),
            geocoder: Self::merge_geocoder_config(self.geocoder, other.geocoder),
        }
    }

    fn merge_geocoder_config(
        base: Option<GeocoderConfig>,
        other: Option<GeocoderConfig>,
    ) -> Option<GeocoderConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(GeocoderConfig {
                url: o.url.or(b.url),
                user_agent: o.user_agent.or(b.user_agent),
            }),
        }
    }

    /// Durable voice-note directory
    pub fn audio_dir_or_default(&self) -> PathBuf {
        self.audio_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("audio"))
    }

    /// Scratch directory for in-progress recordings
    pub fn scratch_dir_or_default(&self) -> PathBuf {
        self.scratch_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("souvenirs"))
    }

    /// Journal file used by the JSON entry store
    pub fn journal_path_or_default(&self) -> PathBuf {
        self.journal_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("journal.json"))
    }

    /// Lookup deadline, or 5s if not set or unreadable
    pub fn geocode_timeout_or_default(&self) -> TimeLimit {
        self.geocode_timeout
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(TimeLimit::LOOKUP)
    }

    /// Recording cap, or 5m if not set or unreadable
    pub fn max_duration_or_default(&self) -> TimeLimit {
        self.max_duration
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(TimeLimit::RECORDING)
    }

    /// Get auto_grant setting, or false if not set
    pub fn auto_grant_or_default(&self) -> bool {
        self.auto_grant.unwrap_or(false)
    }

    /// Geocoder endpoint, or the public Nominatim API if not set
    pub fn geocoder_url_or_default(&self) -> &str {
        self.geocoder
            .as_ref()
            .and_then(|g| g.url.as_deref())
            .unwrap_or(DEFAULT_GEOCODER_URL)
    }

    /// Geocoder user agent, or `souvenirs/<version>` if not set
    pub fn geocoder_user_agent_or_default(&self) -> String {
        self.geocoder
            .as_ref()
            .and_then(|g| g.user_agent.clone())
            .unwrap_or_else(default_user_agent)
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("souvenirs")
}

fn default_user_agent() -> String {
    format!("souvenirs/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.geocode_timeout, Some("5s".to_string()));
        assert_eq!(config.max_duration, Some("5m".to_string()));
        assert_eq!(config.auto_grant, Some(false));
        assert_eq!(config.geocoder_url_or_default(), DEFAULT_GEOCODER_URL);
        assert!(config.geocoder_user_agent_or_default().starts_with("souvenirs/"));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.audio_dir.is_none());
        assert!(config.journal_path.is_none());
        assert!(config.geocode_timeout.is_none());
        assert!(config.geocoder.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            journal_path: Some("/base/journal.json".to_string()),
            geocode_timeout: Some("5s".to_string()),
            auto_grant: Some(false),
            ..Default::default()
        };

        let other = AppConfig {
            journal_path: Some("/other/journal.json".to_string()),
            geocode_timeout: None,
            auto_grant: Some(true),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.journal_path, Some("/other/journal.json".to_string()));
        assert_eq!(merged.geocode_timeout, Some("5s".to_string()));
        assert!(merged.auto_grant_or_default());
    }

    #[test]
    fn merge_geocoder_keeps_unset_fields_from_base() {
        let base = AppConfig::defaults();
        let other = AppConfig {
            geocoder: Some(GeocoderConfig {
                url: Some("http://localhost:8080".to_string()),
                user_agent: None,
            }),
            ..Default::default()
        };
        let merged = base.merge(other);
        assert_eq!(merged.geocoder_url_or_default(), "http://localhost:8080");
        assert!(merged.geocoder_user_agent_or_default().starts_with("souvenirs/"));
    }

    #[test]
    fn geocode_timeout_parses_or_defaults() {
        let config = AppConfig {
            geocode_timeout: Some("2s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.geocode_timeout_or_default().as_std().as_secs(), 2);

        let invalid = AppConfig {
            geocode_timeout: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(invalid.geocode_timeout_or_default(), TimeLimit::LOOKUP);
    }

    #[test]
    fn max_duration_defaults_to_five_minutes() {
        assert_eq!(AppConfig::empty().max_duration_or_default(), TimeLimit::RECORDING);
    }

    #[test]
    fn paths_use_configured_values() {
        let config = AppConfig {
            audio_dir: Some("/data/audio".to_string()),
            journal_path: Some("/data/j.json".to_string()),
            scratch_dir: Some("/scratch".to_string()),
            ..Default::default()
        };
        assert_eq!(config.audio_dir_or_default(), PathBuf::from("/data/audio"));
        assert_eq!(config.journal_path_or_default(), PathBuf::from("/data/j.json"));
        assert_eq!(config.scratch_dir_or_default(), PathBuf::from("/scratch"));
    }

    #[test]
    fn default_paths_are_namespaced() {
        let config = AppConfig::empty();
        assert!(config.audio_dir_or_default().ends_with("souvenirs/audio"));
        assert!(config.journal_path_or_default().ends_with("souvenirs/journal.json"));
        assert!(config.scratch_dir_or_default().ends_with("souvenirs"));
    }
}
