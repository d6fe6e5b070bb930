//! Geocoding port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::journal::Coordinate;

/// Geocoding errors
#[derive(Debug, Clone, Error)]
pub enum GeocodeError {
    #[error("No match for location")]
    NoMatch,

    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse geocoding response: {0}")]
    ParseError(String),
}

/// Port for resolving a free-text place name to coordinates.
/// Latency is unbounded; callers bound it.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<Coordinate, GeocodeError>;
}
