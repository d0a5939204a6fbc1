//! Client for the wttr.in weather provider.
//!
//! The `?format=j1` payload carries current conditions as a one-element
//! list with string-encoded numbers. Weather has no fallback value, so a
//! malformed shape here is an error, not a default.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{Coordinate, CurrentWeather};
use crate::{ExplorerError, Result};

use super::WeatherSource;

pub struct WttrClient {
    client: Client,
    base_url: String,
}

impl WttrClient {
    #[must_use]
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl WeatherSource for WttrClient {
    async fn current(&self, coordinate: Coordinate) -> Result<CurrentWeather> {
        let url = format!(
            "{}/{},{}?format=j1",
            self.base_url, coordinate.latitude, coordinate.longitude
        );
        debug!("weather request: GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("weather request to {url} failed: {e}");
                ExplorerError::upstream("weather request failed")
            })?;

        let report: WeatherReport = response.json().await.map_err(|e| {
            warn!("weather response from {url} was malformed: {e}");
            ExplorerError::upstream("weather response was malformed")
        })?;

        current_from_report(report)
    }
}

fn current_from_report(report: WeatherReport) -> Result<CurrentWeather> {
    let condition = report
        .current_condition
        .into_iter()
        .next()
        .ok_or_else(|| ExplorerError::upstream("weather response had no current conditions"))?;

    let temp_c: f64 = condition.temp_c.parse().map_err(|_| {
        warn!("unparseable temperature value: {:?}", condition.temp_c);
        ExplorerError::upstream("weather response had an unparseable temperature")
    })?;

    let description = condition
        .weather_desc
        .into_iter()
        .next()
        .map(|d| d.value)
        .unwrap_or_default();

    Ok(CurrentWeather {
        temp_c,
        description,
    })
}

// ─── Wire types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WeatherReport {
    #[serde(default)]
    current_condition: Vec<CurrentCondition>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<WeatherDesc>,
}

#[derive(Debug, Deserialize)]
struct WeatherDesc {
    value: String,
}
