//! Directions API client.
//!
//! This module provides an HTTP binding of the directions-provider
//! capability against the Google Directions JSON API.
//!
//! Key characteristics:
//! - One request per origin/destination pair, no alternatives
//! - Durations come back in seconds, distances in meters
//! - `ZERO_RESULTS` is a normal answer (e.g. no transit between two
//!   points a few hundred meters apart) and maps to [`DirectionsError::NoRoute`]

mod client;
mod error;
mod types;

pub use client::{DirectionsClient, DirectionsConfig};
pub use error::DirectionsError;
pub use types::DirectionsResponse;
