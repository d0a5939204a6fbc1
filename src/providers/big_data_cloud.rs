//! Client for the BigDataCloud reverse-geocoding provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Coordinate;
use crate::{ExplorerError, Result};

use super::{ReverseGeocoder, ReversePlace};

pub struct BigDataCloudClient {
    client: Client,
    url: String,
}

impl BigDataCloudClient {
    #[must_use]
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ReverseGeocoder for BigDataCloudClient {
    async fn reverse(&self, coordinate: Coordinate) -> Result<ReversePlace> {
        let url = format!(
            "{}?latitude={}&longitude={}&localityLanguage=en",
            self.url, coordinate.latitude, coordinate.longitude
        );
        debug!("reverse-geocode request: GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("reverse-geocode request to {url} failed: {e}");
                ExplorerError::upstream("reverse-geocode request failed")
            })?;

        let place: ReverseGeocodeResponse = response.json().await.map_err(|e| {
            warn!("reverse-geocode response from {url} was malformed: {e}");
            ExplorerError::upstream("reverse-geocode response was malformed")
        })?;

        Ok(ReversePlace {
            city: place.city,
            locality: place.locality,
            principal_subdivision: place.principal_subdivision,
            country_name: place.country_name,
        })
    }
}

/// Any of these fields may be absent or empty; empty means "not known".
#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    #[serde(default)]
    city: String,
    #[serde(default)]
    locality: String,
    #[serde(rename = "principalSubdivision", default)]
    principal_subdivision: String,
    #[serde(rename = "countryName", default)]
    country_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let raw = r#"{
            "latitude": 28.6,
            "longitude": 77.2,
            "city": "New Delhi",
            "locality": "Connaught Place",
            "principalSubdivision": "Delhi",
            "countryName": "India",
            "countryCode": "IN"
        }"#;
        let place: ReverseGeocodeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(place.city, "New Delhi");
        assert_eq!(place.locality, "Connaught Place");
        assert_eq!(place.country_name, "India");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let raw = r#"{"latitude": 0.0, "longitude": 0.0, "countryName": ""}"#;
        let place: ReverseGeocodeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(place.city, "");
        assert_eq!(place.locality, "");
        assert_eq!(place.principal_subdivision, "");
        assert_eq!(place.country_name, "");
    }
}
