//! Client for the countriesnow.space directory provider.
//!
//! Four endpoints share one response envelope `{ error, msg, data }`; an
//! `error: true` envelope counts as an upstream failure just like a non-2xx
//! status or a malformed body.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{ExplorerError, Result};

use super::{Directory, PopulationCount};

pub struct CountriesNowClient {
    client: Client,
    base_url: String,
}

impl CountriesNowClient {
    #[must_use]
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{path}", self.base_url);
        debug!("directory request: GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("directory request to {url} failed: {e}");
                ExplorerError::upstream("directory request failed")
            })?;

        response.json::<T>().await.map_err(|e| {
            warn!("directory response from {url} was malformed: {e}");
            ExplorerError::upstream("directory response was malformed")
        })
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}/{path}", self.base_url);
        debug!("directory request: POST {url}");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("directory request to {url} failed: {e}");
                ExplorerError::upstream("directory request failed")
            })?;

        response.json::<T>().await.map_err(|e| {
            warn!("directory response from {url} was malformed: {e}");
            ExplorerError::upstream("directory response was malformed")
        })
    }
}

#[async_trait]
impl Directory for CountriesNowClient {
    async fn countries(&self) -> Result<Vec<String>> {
        let envelope: Envelope<Vec<CountryPosition>> = self.get("countries/positions").await?;
        let data = envelope.into_data()?;
        Ok(data.into_iter().map(|c| c.name).collect())
    }

    async fn states(&self, country: &str) -> Result<Vec<String>> {
        let envelope: Envelope<CountryStates> = self
            .post("countries/states", &CountryBody { country })
            .await?;
        let data = envelope.into_data()?;
        Ok(data.states.into_iter().map(|s| s.name).collect())
    }

    async fn cities(&self, country: &str, state: &str) -> Result<Vec<String>> {
        let envelope: Envelope<Vec<String>> = self
            .post("countries/state/cities", &StateBody { country, state })
            .await?;
        envelope.into_data()
    }

    async fn city_population(&self, country: &str, city: &str) -> Result<Vec<PopulationCount>> {
        let envelope: Envelope<CityPopulation> = self
            .post("countries/population/cities", &CityBody { country, city })
            .await?;
        let data = envelope.into_data()?;
        Ok(data
            .population_counts
            .into_iter()
            .map(|c| PopulationCount {
                year: c.year,
                value: c.value,
            })
            .collect())
    }
}

// ─── Wire types ──────────────────────────────────────────────────

#[derive(Serialize)]
struct CountryBody<'a> {
    country: &'a str,
}

#[derive(Serialize)]
struct StateBody<'a> {
    country: &'a str,
    state: &'a str,
}

#[derive(Serialize)]
struct CityBody<'a> {
    country: &'a str,
    city: &'a str,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T> {
        if self.error {
            warn!("directory provider rejected the request: {}", self.msg);
            return Err(ExplorerError::upstream("directory provider rejected the request"));
        }
        self.data
            .ok_or_else(|| ExplorerError::upstream("directory response was missing data"))
    }
}

#[derive(Debug, Deserialize)]
struct CountryPosition {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CountryStates {
    states: Vec<StateEntry>,
}

#[derive(Debug, Deserialize)]
struct StateEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CityPopulation {
    #[serde(rename = "populationCounts")]
    population_counts: Vec<PopulationEntry>,
}

#[derive(Debug, Deserialize)]
struct PopulationEntry {
    #[serde(default)]
    year: String,
    value: String,
}
