//! Command runner: configuration, adapter wiring and dispatch

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration as StdDuration;

use thiserror::Error;

use crate::application::ports::{ConfigStore, GeocodeError};
use crate::application::{ComposeError, MediaSession, SessionConfig};
use crate::domain::config::{AppConfig, GeocoderConfig, TimeLimit};
use crate::domain::error::{ConfigError, MediaError, StoreError};
use crate::infrastructure::{
    CpalCaptureDevice, FsArtifactStore, JsonEntryStore, NominatimGeocoder, RodioPlaybackDevice,
    TerminalPermission, XdgConfigStore,
};

use super::args::{Cli, Commands};
use super::config_cmd::handle_config_command;
use super::presenter::Presenter;
use super::{capture_cmd, journal_cmd};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Session type used by the interactive commands
pub type DeviceSession = MediaSession<TerminalPermission, CpalCaptureDevice, RodioPlaybackDevice>;

/// Why a command failed
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("{0}")]
    Usage(String),

    #[error("Recording cancelled")]
    Cancelled,

    #[error("No coordinates found for \"{0}\"")]
    NoCoordinates(String),
}

impl CommandError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => EXIT_USAGE_ERROR,
            _ => EXIT_ERROR,
        }
    }
}

/// Parse and run one command
pub async fn run(cli: Cli) -> ExitCode {
    let mut presenter = Presenter::new();

    let result = match cli.command {
        Commands::Config { action } => {
            let store = config_store();
            handle_config_command(action, &store, &presenter)
                .await
                .map_err(CommandError::from)
        }
        command => {
            let cli_config = AppConfig {
                journal_path: cli.journal.as_deref().map(path_string),
                audio_dir: cli.audio_dir.as_deref().map(path_string),
                ..Default::default()
            };
            let context = AppContext::new(load_merged_config(cli_config).await);
            dispatch(command, &context, &mut presenter).await
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.stop_spinner();
            presenter.error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn dispatch(
    command: Commands,
    context: &AppContext,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    match command {
        Commands::Record(args) => capture_cmd::handle_record(args, context, presenter).await,
        Commands::Play { name } => capture_cmd::handle_play(&name, context, presenter).await,
        Commands::Add(args) => journal_cmd::handle_add(args, context, presenter).await,
        Commands::List(args) => journal_cmd::handle_list(args, context, presenter).await,
        Commands::Locations => journal_cmd::handle_locations(context, presenter).await,
        Commands::Like { id } => journal_cmd::handle_like(id, context, presenter).await,
        Commands::Delete { id } => journal_cmd::handle_delete(id, context, presenter).await,
        Commands::Geocode { query, timeout } => {
            journal_cmd::handle_geocode(&query, timeout.as_deref(), context, presenter).await
        }
        Commands::Config { .. } => Err(CommandError::Usage(
            "config is handled before dispatch".to_string(),
        )),
    }
}

/// Merged configuration plus adapter factories
pub struct AppContext {
    config: AppConfig,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn entry_store(&self) -> JsonEntryStore {
        JsonEntryStore::new(self.config.journal_path_or_default())
    }

    pub fn artifact_store(&self) -> FsArtifactStore {
        FsArtifactStore::new(self.config.audio_dir_or_default())
    }

    pub fn geocoder(&self) -> Result<NominatimGeocoder, GeocodeError> {
        NominatimGeocoder::with_base_url(
            self.config.geocoder_url_or_default(),
            &self.config.geocoder_user_agent_or_default(),
        )
    }

    /// Session on the default input and output devices
    pub fn session(&self, auto_grant: bool) -> DeviceSession {
        let permission = TerminalPermission::new(auto_grant || self.config.auto_grant_or_default());
        MediaSession::new(
            permission,
            CpalCaptureDevice::new(),
            RodioPlaybackDevice::new(),
            SessionConfig::new(self.config.scratch_dir_or_default()),
        )
    }

    /// Recording limit from the flag, else from config
    pub fn max_duration(&self, flag: Option<&str>) -> Result<StdDuration, CommandError> {
        match flag {
            Some(s) => parse_duration("max-duration", s),
            None => Ok(self.config.max_duration_or_default().as_std()),
        }
    }

    /// Geocoding deadline from the flag, else from config
    pub fn lookup_deadline(&self, flag: Option<&str>) -> Result<StdDuration, CommandError> {
        match flag {
            Some(s) => parse_duration("timeout", s),
            None => Ok(self.config.geocode_timeout_or_default().as_std()),
        }
    }
}

fn parse_duration(name: &str, value: &str) -> Result<StdDuration, CommandError> {
    value
        .parse::<TimeLimit>()
        .map(|d| d.as_std())
        .map_err(|e| CommandError::Usage(format!("Invalid {}: {}", name, e)))
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Config store at `SOUVENIRS_CONFIG`, or the XDG default
pub fn config_store() -> XdgConfigStore {
    match env::var("SOUVENIRS_CONFIG") {
        Ok(path) if !path.is_empty() => XdgConfigStore::with_path(path),
        _ => XdgConfigStore::new(),
    }
}

/// Non-empty environment variable
fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.is_empty())
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = config_store();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config file: {}", e);
            AppConfig::empty()
        }
    };

    let geocoder_url = env_value("SOUVENIRS_GEOCODER_URL");
    let env_config = AppConfig {
        journal_path: env_value("SOUVENIRS_JOURNAL"),
        audio_dir: env_value("SOUVENIRS_AUDIO_DIR"),
        geocoder: geocoder_url.map(|url| GeocoderConfig {
            url: Some(url),
            user_agent: None,
        }),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
