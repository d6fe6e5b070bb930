//! Periodic progress sampler
//!
//! A sampler ticks on the tokio clock, reads a position from the hardware
//! and forwards it to the session owner. It holds no session state: the
//! owner decides whether a sample still applies.

use std::time::Duration as StdDuration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Interval between progress samples
pub const DEFAULT_SAMPLE_INTERVAL: StdDuration = StdDuration::from_millis(100);

/// A running periodic sampler. Dropping it cancels the timer.
#[derive(Debug)]
pub struct Sampler {
    generation: u64,
    task: JoinHandle<()>,
}

impl Sampler {
    /// Start sampling every `period`, first sample one period from now.
    ///
    /// `read_position` reads the current position; `sink` forwards it and returns
    /// `false` once nobody is listening, which ends the sampler.
    ///
    /// # Errors
    /// Fails when called outside a tokio runtime.
    pub fn spawn<P, S>(
        generation: u64,
        period: StdDuration,
        mut read_position: P,
        mut sink: S,
    ) -> Result<Self, tokio::runtime::TryCurrentError>
    where
        P: FnMut() -> StdDuration + Send + 'static,
        S: FnMut(u64, StdDuration) -> bool + Send + 'static,
    {
        let runtime = Handle::try_current()?;
        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if !sink(generation, read_position()) {
                    break;
                }
            }
        });

        Ok(Self { generation, task })
    }

    /// Generation tag carried by every sample from this sampler
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.task.abort();
    }
}
