//! Weather data model and display methods

use serde::{Deserialize, Serialize};

/// Current weather conditions at a coordinate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentWeather {
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Human-readable description of weather conditions
    pub description: String,
}

impl CurrentWeather {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.0} °C", self.temp_c)
    }
}
