//! CLI presenter for output formatting

use std::io::{self, Write};
use std::time::Duration as StdDuration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::journal::Entry;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(StdDuration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Output text to stdout without newline
    pub fn output_inline(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    /// Recording progress against the safety limit
    pub fn format_progress(&self, elapsed: StdDuration, limit: StdDuration) -> String {
        let elapsed_ms = elapsed.as_millis() as u64;
        let limit_ms = limit.as_millis() as u64;
        let percent = if limit_ms > 0 {
            (elapsed_ms as f64 / limit_ms as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        let bar_width = 20;
        let filled = ((percent / 100.0) * bar_width as f64) as usize;
        let empty = bar_width - filled;

        format!(
            "[{}{}] {} / {}",
            "█".repeat(filled).cyan(),
            "░".repeat(empty),
            format_clock(elapsed),
            format_clock(limit)
        )
    }

    /// Update recording progress
    pub fn update_recording_progress(&self, elapsed: StdDuration, limit: StdDuration) {
        let progress = self.format_progress(elapsed, limit);
        self.update_spinner(&format!("Recording... {}", progress));
    }

    /// Update playback position
    pub fn update_playback_progress(&self, position: StdDuration, paused: bool) {
        let label = if paused { "Paused" } else { "Playing" };
        self.update_spinner(&format!("{} {}", label, format_clock(position)));
    }

    /// Print one journal entry
    pub fn entry(&self, entry: &Entry) {
        println!("{}", format_entry_row(entry));
        if !entry.body.is_empty() {
            println!("    {}", entry.body);
        }
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// `MM:SS`, minutes not capped at 59
pub fn format_clock(duration: StdDuration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Single-line summary of an entry
pub fn format_entry_row(entry: &Entry) -> String {
    let mut row = format!(
        "{} {} {} @ {}",
        entry.id.to_string().dimmed(),
        entry.created_at.format("%Y-%m-%d"),
        entry.title.bold(),
        entry.location_label
    );
    if let Some(c) = entry.coordinate {
        row.push_str(&format!(" ({:.4}, {:.4})", c.latitude, c.longitude));
    }
    if entry.like_count > 0 {
        row.push_str(&format!(" ♥ {}", entry.like_count));
    }
    if entry.has_audio() {
        row.push_str(" ♪");
    }
    if entry.is_anonymous {
        row.push_str(" [anonymous]");
    }
    row
}
