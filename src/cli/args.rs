//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use uuid::Uuid;

use crate::domain::journal::SortOrder;

/// Souvenirs - a journal of places, stories and voice notes
#[derive(Parser, Debug)]
#[command(name = "souvenirs")]
#[command(version)]
#[command(about = "Journal memories with voice notes, places and coordinates")]
#[command(long_about = None)]
pub struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Journal file to use
    #[arg(long, value_name = "PATH", global = true)]
    pub journal: Option<PathBuf>,

    /// Directory holding saved voice notes
    #[arg(long, value_name = "PATH", global = true)]
    pub audio_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a voice note and save it
    Record(RecordArgs),
    /// Play a saved voice note (Enter pauses/resumes, q + Enter stops)
    Play {
        /// Saved voice-note name
        name: String,
    },
    /// Add a memory to the journal
    Add(AddArgs),
    /// List memories
    List(ListArgs),
    /// List the locations memories were written at
    Locations,
    /// Like a memory
    Like {
        /// Entry id
        id: Uuid,
    },
    /// Delete a memory and its voice note
    Delete {
        /// Entry id
        id: Uuid,
    },
    /// Resolve a place name to coordinates
    Geocode {
        /// Free-text place name
        query: String,

        /// Lookup deadline (e.g., 5s, 1m)
        #[arg(long, value_name = "TIME")]
        timeout: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by commands that use the microphone
#[derive(Args, Debug, Clone, Default)]
pub struct CaptureArgs {
    /// Stop recording automatically after this long (e.g., 30s, 5m)
    #[arg(long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Use the microphone without asking
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// `record` options
#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    #[command(flatten)]
    pub capture: CaptureArgs,
}

/// `add` options
#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    /// Title of the memory
    #[arg(short, long)]
    pub title: String,

    /// Where it happened
    #[arg(short, long)]
    pub location: String,

    /// The story
    #[arg(short, long, default_value = "")]
    pub body: String,

    /// Record a voice note to attach
    #[arg(short, long, conflicts_with = "audio_file")]
    pub record: bool,

    /// Attach an existing audio file (copied into the voice-note store)
    #[arg(long, value_name = "PATH")]
    pub audio_file: Option<PathBuf>,

    /// Hide the author when sharing
    #[arg(long)]
    pub anonymous: bool,

    /// Geocoding deadline (e.g., 5s)
    #[arg(long, value_name = "TIME")]
    pub timeout: Option<String>,

    #[command(flatten)]
    pub capture: CaptureArgs,
}

/// `list` options
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive text to look for in titles and stories
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only memories from this location ("All" for every location)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Only memories with a voice note
    #[arg(long)]
    pub audio_only: bool,

    /// Sort order: newest, oldest, most-liked, a-z
    #[arg(long, default_value = "newest")]
    pub sort: SortOrder,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "audio_dir",
    "scratch_dir",
    "journal_path",
    "geocode_timeout",
    "max_duration",
    "auto_grant",
    "geocoder.url",
    "geocoder.user_agent",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_requires_a_command() {
        assert!(Cli::try_parse_from(["souvenirs"]).is_err());
    }

    #[test]
    fn cli_parses_global_flags_after_command() {
        let cli = Cli::parse_from(["souvenirs", "list", "-vv", "--journal", "/tmp/j.json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.journal, Some(PathBuf::from("/tmp/j.json")));
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn cli_parses_record() {
        let cli = Cli::parse_from(["souvenirs", "record", "--max-duration", "30s", "-y"]);
        let Commands::Record(args) = cli.command else {
            panic!("Expected Record command");
        };
        assert_eq!(args.capture.max_duration, Some("30s".to_string()));
        assert!(args.capture.yes);
    }

    #[test]
    fn cli_parses_add() {
        let cli = Cli::parse_from([
            "souvenirs",
            "add",
            "-t",
            "Picnic",
            "-l",
            "Paris",
            "-b",
            "Sunny",
            "--anonymous",
        ]);
        let Commands::Add(args) = cli.command else {
            panic!("Expected Add command");
        };
        assert_eq!(args.title, "Picnic");
        assert_eq!(args.location, "Paris");
        assert_eq!(args.body, "Sunny");
        assert!(args.anonymous);
        assert!(!args.record);
    }

    #[test]
    fn add_record_conflicts_with_audio_file() {
        let result = Cli::try_parse_from([
            "souvenirs",
            "add",
            "-t",
            "T",
            "-l",
            "L",
            "--record",
            "--audio-file",
            "/tmp/a.flac",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_list_sort() {
        let cli = Cli::parse_from(["souvenirs", "list", "--sort", "most-liked", "--audio-only"]);
        let Commands::List(args) = cli.command else {
            panic!("Expected List command");
        };
        assert_eq!(args.sort, SortOrder::MostLiked);
        assert!(args.audio_only);
    }

    #[test]
    fn list_defaults_to_newest() {
        let cli = Cli::parse_from(["souvenirs", "list"]);
        let Commands::List(args) = cli.command else {
            panic!("Expected List command");
        };
        assert_eq!(args.sort, SortOrder::NewestFirst);
        assert!(args.search.is_empty());
        assert!(args.location.is_none());
    }

    #[test]
    fn invalid_sort_is_rejected() {
        assert!(Cli::try_parse_from(["souvenirs", "list", "--sort", "random"]).is_err());
    }

    #[test]
    fn like_requires_uuid() {
        assert!(Cli::try_parse_from(["souvenirs", "like", "not-a-uuid"]).is_err());
        let cli = Cli::parse_from(["souvenirs", "like", "67e55044-10b1-426f-9247-bb680e5fe0c8"]);
        assert!(matches!(cli.command, Commands::Like { .. }));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["souvenirs", "config", "set", "geocode_timeout", "3s"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "geocode_timeout");
            assert_eq!(value, "3s");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("journal_path"));
        assert!(is_valid_config_key("geocoder.url"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
