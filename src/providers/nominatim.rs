//! Client for the Nominatim forward-geocoding provider.
//!
//! Results arrive as a list with string-encoded coordinates; only the
//! first match is used. An empty list is a legitimate answer, not a
//! failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Coordinate;
use crate::{ExplorerError, Result};

use super::ForwardGeocoder;

pub struct NominatimClient {
    client: Client,
    url: String,
}

impl NominatimClient {
    #[must_use]
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ForwardGeocoder for NominatimClient {
    async fn search(&self, query: &str) -> Result<Option<Coordinate>> {
        let url = format!(
            "{}?format=json&q={}&limit=1",
            self.url,
            urlencoding::encode(query)
        );
        debug!("forward-geocode request: GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("forward-geocode request to {url} failed: {e}");
                ExplorerError::upstream("forward-geocode request failed")
            })?;

        let results: Vec<SearchResult> = response.json().await.map_err(|e| {
            warn!("forward-geocode response from {url} was malformed: {e}");
            ExplorerError::upstream("forward-geocode response was malformed")
        })?;

        results.into_iter().next().map(parse_result).transpose()
    }
}

fn parse_result(result: SearchResult) -> Result<Coordinate> {
    let latitude: f64 = result.lat.parse().map_err(|_| {
        warn!("unparseable latitude in geocode result: {:?}", result.lat);
        ExplorerError::upstream("forward-geocode result had unparseable coordinates")
    })?;
    let longitude: f64 = result.lon.parse().map_err(|_| {
        warn!("unparseable longitude in geocode result: {:?}", result.lon);
        ExplorerError::upstream("forward-geocode result had unparseable coordinates")
    })?;

    Ok(Coordinate::new(latitude, longitude))
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}
