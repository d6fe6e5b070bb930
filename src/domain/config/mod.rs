//! Configuration value objects

mod app_config;
mod time_limit;

pub use app_config::{AppConfig, GeocoderConfig, DEFAULT_GEOCODER_URL};
pub use time_limit::TimeLimit;
