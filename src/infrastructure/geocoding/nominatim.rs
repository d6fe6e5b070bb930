//! Nominatim (OpenStreetMap) geocoder adapter

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{GeocodeError, Geocoder};
use crate::domain::config::DEFAULT_GEOCODER_URL;
use crate::domain::journal::Coordinate;

// Response types for the search API. Coordinates arrive as strings.

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocoder backed by a Nominatim `/search` endpoint
pub struct NominatimGeocoder {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    /// Create a geocoder for the public Nominatim API
    pub fn new(user_agent: &str) -> Result<Self, GeocodeError> {
        Self::with_base_url(DEFAULT_GEOCODER_URL, user_agent)
    }

    /// Create a geocoder for a self-hosted or test endpoint.
    ///
    /// Nominatim's usage policy requires an identifying user agent.
    pub fn with_base_url(
        base_url: impl Into<String>,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeocodeError::RequestFailed(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build the search URL
    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    /// Take the best (first) match
    fn first_coordinate(places: &[Place]) -> Result<Coordinate, GeocodeError> {
        let place = places.first().ok_or(GeocodeError::NoMatch)?;

        let latitude: f64 = place
            .lat
            .trim()
            .parse()
            .map_err(|_| GeocodeError::ParseError(format!("latitude '{}'", place.lat)))?;
        let longitude: f64 = place
            .lon
            .trim()
            .parse()
            .map_err(|_| GeocodeError::ParseError(format!("longitude '{}'", place.lon)))?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeocodeError::ParseError(format!(
                "coordinate out of range: {}, {}",
                latitude, longitude
            )));
        }

        if let Some(name) = &place.display_name {
            log::debug!("Best match: {}", name);
        }

        Ok(Coordinate::new(latitude, longitude))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let response = self
            .client
            .get(self.search_url())
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RequestFailed("Rate limited".to_string()));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GeocodeError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| GeocodeError::ParseError(e.to_string()))?;

        Self::first_coordinate(&places)
    }
}
