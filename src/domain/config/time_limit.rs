//! Time limits written in the config file and on the command line
//!
//! `geocode_timeout` and `max_duration` accept `90s`, `5m` or `2m30s`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::TimeLimitParseError;

/// A positive whole-second limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeLimit {
    secs: u64,
}

impl TimeLimit {
    /// How long a place-name lookup may hold up saving an entry
    pub const LOOKUP: Self = Self { secs: 5 };

    /// Safety cap on a single voice note
    pub const RECORDING: Self = Self { secs: 5 * 60 };

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.secs)
    }
}

impl FromStr for TimeLimit {
    type Err = TimeLimitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TimeLimitParseError {
            input: s.to_string(),
        };
        let text = s.trim().to_ascii_lowercase();

        let (minutes, rest) = match text.split_once('m') {
            Some((minutes, rest)) => (Some(minutes), rest),
            None => (None, text.as_str()),
        };
        let seconds = match rest {
            "" => None,
            rest => Some(rest.strip_suffix('s').ok_or_else(invalid)?),
        };
        if minutes.is_none() && seconds.is_none() {
            return Err(invalid());
        }

        let minutes = count(minutes).ok_or_else(invalid)?;
        let seconds = count(seconds).ok_or_else(invalid)?;
        let secs = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .filter(|total| *total > 0)
            .ok_or_else(invalid)?;

        Ok(Self { secs })
    }
}

/// Digits of one unit; a missing unit counts as zero
fn count(digits: Option<&str>) -> Option<u64> {
    match digits {
        None => Some(0),
        Some(d) if !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()) => d.parse().ok(),
        Some(_) => None,
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.secs / 60, self.secs % 60) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}
