//! Souvenirs - a travel journal with voice notes
//!
//! This crate provides the core functionality for recording and replaying
//! voice notes, composing journal entries enriched with coordinates, and
//! browsing them through a filter and sort pipeline.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, journal entries, the filter pipeline and errors
//! - **Application**: The media session, bounded geocoding and use cases,
//!   plus the port interfaces (traits) they depend on
//! - **Infrastructure**: Adapter implementations (cpal, rodio, Nominatim, JSON files)
//! - **CLI**: Command-line interface, argument parsing and console events

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
