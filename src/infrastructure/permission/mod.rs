//! Capture permission adapters

mod terminal;

pub use terminal::TerminalPermission;
