//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, console events
//! and the command runners.

pub mod app;
pub mod args;
pub mod capture_cmd;
pub mod config_cmd;
pub mod journal_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run, CommandError, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction};
pub use presenter::Presenter;
