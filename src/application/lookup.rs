//! Deadline-bounded geocoding

use std::time::Duration as StdDuration;

use crate::domain::config::TimeLimit;
use crate::domain::journal::Coordinate;

use super::ports::Geocoder;

/// Longest a lookup may hold up entry creation
pub const DEFAULT_LOOKUP_DEADLINE: StdDuration = TimeLimit::LOOKUP.as_std();

/// Result of one bounded lookup. Absent on no match, provider error or
/// timeout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LookupOutcome {
    pub coordinate: Option<Coordinate>,
}

impl LookupOutcome {
    pub fn found(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }
}

/// Races a single provider call against a deadline.
///
/// Never fails: coordinates are an enrichment, so every failure degrades to
/// an absent outcome. The provider future is dropped when the deadline wins,
/// and a late answer has nowhere to be written.
pub struct BoundedLookup<G: Geocoder> {
    geocoder: G,
}

impl<G: Geocoder> BoundedLookup<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    pub async fn lookup(&self, text: &str, deadline: StdDuration) -> LookupOutcome {
        let query = text.trim();
        if query.is_empty() {
            return LookupOutcome::absent();
        }

        match tokio::time::timeout(deadline, self.geocoder.resolve(query)).await {
            Ok(Ok(coordinate)) => {
                log::debug!(
                    "Resolved '{}' to {}, {}",
                    query,
                    coordinate.latitude,
                    coordinate.longitude
                );
                LookupOutcome::found(coordinate)
            }
            Ok(Err(e)) => {
                log::warn!("Geocoding '{}' failed: {}", query, e);
                LookupOutcome::absent()
            }
            Err(_) => {
                log::warn!("Geocoding '{}' timed out after {:?}", query, deadline);
                LookupOutcome::absent()
            }
        }
    }
}
