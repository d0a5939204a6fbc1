//! Geoscope - Interactive location explorer
//!
//! This library provides the core functionality for cascading
//! country/state/city selection, coordinate resolution, and the
//! aggregation of weather, population and country metadata for a point.

pub mod api;
pub mod cascade;
pub mod config;
pub mod error;
pub mod explorer;
pub mod gateway;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod view;
pub mod web;

// Re-export core types for public API
pub use cascade::{Cascade, CascadeEvent, Selection};
pub use config::ExplorerConfig;
pub use error::ExplorerError;
pub use explorer::{DeviceTrigger, Explorer, GeolocationOptions};
pub use gateway::Gateway;
pub use models::{Coordinate, CurrentWeather, LocationInfo, PlaceHint, Population};
pub use resolver::LocationResolver;
pub use view::{MapView, MenuState, PanelState, ViewState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
