//! Location models: coordinates, place hints and the aggregated display payload

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Fallback map center used before any position has been obtained.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: 28.584359,
    longitude: 77.315493,
};

/// A geographic coordinate pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether the pair lies within valid latitude/longitude ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// What the caller already knows about a coordinate before resolution.
///
/// Missing fields are filled from the reverse geocoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceHint {
    pub city: Option<String>,
    pub country: Option<String>,
}

impl PlaceHint {
    #[must_use]
    pub fn known(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            country: Some(country.into()),
        }
    }
}

/// City population, taken from the most recent entry of a population
/// time series when one is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    Known(u64),
    Unknown,
}

impl Serialize for Population {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Population::Known(count) => serializer.serialize_u64(*count),
            Population::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Population::Known(count) => write!(f, "{count}"),
            Population::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The fully aggregated payload displayed for a resolved point.
///
/// Recomputed from scratch on every resolution; never partially updated.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LocationInfo {
    /// Display label for the place (city, locality or a fallback)
    pub city: String,
    /// Country name, possibly empty when no source knew it
    pub country: String,
    /// Current temperature in Celsius
    pub temp_c: f64,
    /// Human-readable current weather description
    pub weather_desc: String,
    pub population: Population,
}

impl fmt::Display for LocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.city)?;
        writeln!(f, "Country: {}", self.country)?;
        writeln!(f, "Temperature: {} °C", self.temp_c)?;
        writeln!(f, "Weather: {}", self.weather_desc)?;
        write!(f, "Population: {}", self.population)
    }
}
