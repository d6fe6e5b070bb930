//! Console events for the interactive record and play loops
//!
//! Merges typed lines and Ctrl+C into one channel the command loops can
//! `select!` on next to session updates.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Something the user did at the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A line was entered (trimmed)
    Line(String),
    /// Ctrl+C
    Interrupt,
    /// Stdin reached end of file
    Closed,
}

impl ConsoleEvent {
    /// Map a raw stdin line to an event
    pub fn from_line(line: &str) -> Self {
        Self::Line(line.trim().to_string())
    }

    /// Whether the line asks to quit ("q" or "quit")
    pub fn is_quit(&self) -> bool {
        matches!(self, Self::Line(l) if l.eq_ignore_ascii_case("q") || l.eq_ignore_ascii_case("quit"))
    }
}

/// Console event source.
///
/// Ctrl+C is only watched while this is alive; once dropped, a later Ctrl+C
/// is no longer swallowed on its behalf.
pub struct ConsoleEvents {
    receiver: mpsc::Receiver<ConsoleEvent>,
    interrupt: JoinHandle<()>,
}

impl ConsoleEvents {
    /// Start listening for stdin lines and Ctrl+C.
    ///
    /// Stdin is read on a detached thread: a blocking read cannot be
    /// cancelled, and a runtime-owned blocking task would hold up shutdown.
    pub fn listen() -> Self {
        let (tx, rx) = mpsc::channel(10);

        let tx_int = tx.clone();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!();
                log::debug!("Received Ctrl+C");
                let _ = tx_int.send(ConsoleEvent::Interrupt).await;
            }
        });

        let spawned = thread::Builder::new()
            .name("souvenirs-stdin".to_string())
            .spawn(move || read_lines(io::stdin().lock(), tx));
        if let Err(e) = spawned {
            log::warn!("Failed to start stdin reader: {}", e);
        }

        Self {
            receiver: rx,
            interrupt,
        }
    }

    /// Wait for the next event. Pends forever once every source is gone.
    pub async fn recv(&mut self) -> ConsoleEvent {
        match self.receiver.recv().await {
            Some(event) => event,
            None => std::future::pending().await,
        }
    }
}

impl Drop for ConsoleEvents {
    fn drop(&mut self) {
        self.interrupt.abort();
    }
}

fn read_lines(input: impl BufRead, tx: mpsc::Sender<ConsoleEvent>) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        if tx.blocking_send(ConsoleEvent::from_line(&line)).is_err() {
            return;
        }
    }
    let _ = tx.blocking_send(ConsoleEvent::Closed);
}
