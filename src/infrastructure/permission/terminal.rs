//! Terminal prompt for microphone access

use std::io::{self, BufRead, Write};

use async_trait::async_trait;

use crate::application::ports::PermissionProvider;

const PROMPT: &str = "Allow souvenirs to use the microphone? [y/N] ";

/// Asks on stdin/stderr, or grants up front when configured to
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPermission {
    auto_grant: bool,
}

impl TerminalPermission {
    pub fn new(auto_grant: bool) -> Self {
        Self { auto_grant }
    }
}

#[async_trait]
impl PermissionProvider for TerminalPermission {
    async fn request_capture_permission(&self) -> bool {
        if self.auto_grant {
            log::debug!("Capture permission granted by configuration");
            return true;
        }

        tokio::task::spawn_blocking(|| ask(io::stdin().lock(), io::stderr()))
            .await
            .unwrap_or(false)
    }
}

/// Print the prompt and read one answer. End of input counts as a refusal.
fn ask(mut input: impl BufRead, mut output: impl Write) -> bool {
    let _ = write!(output, "{}", PROMPT);
    let _ = output.flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_yes(&answer),
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
