//! Data models for the Geoscope application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Coordinates, place hints and the aggregated display payload
//! - Weather: Current weather conditions at a coordinate

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinate, LocationInfo, PlaceHint, Population, DEFAULT_CENTER};
pub use weather::CurrentWeather;
