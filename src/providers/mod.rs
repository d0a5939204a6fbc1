//! Upstream provider clients and the trait seams the core logic talks to.
//!
//! Each provider is a black-box HTTP dependency. The traits keep the
//! cascade, gateway and resolver testable without a network; the `Http*`
//! implementations below them all share one `reqwest::Client` and make
//! exactly one attempt per request.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;

use crate::Result;
use crate::config::UpstreamConfig;
use crate::models::{Coordinate, CurrentWeather};

pub mod big_data_cloud;
pub mod countries_now;
pub mod nominatim;
pub mod wttr;

pub use big_data_cloud::BigDataCloudClient;
pub use countries_now::CountriesNowClient;
pub use nominatim::NominatimClient;
pub use wttr::WttrClient;

/// One sample of a city population time series
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationCount {
    pub year: String,
    /// String-encoded count, exactly as the provider sent it
    pub value: String,
}

/// What a reverse-geocode lookup knows about a coordinate.
///
/// Any field may be empty; callers apply their own fallback chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReversePlace {
    pub city: String,
    pub locality: String,
    pub principal_subdivision: String,
    pub country_name: String,
}

/// Countries/states/cities directory provider
#[async_trait]
pub trait Directory: Send + Sync {
    async fn countries(&self) -> Result<Vec<String>>;
    async fn states(&self, country: &str) -> Result<Vec<String>>;
    async fn cities(&self, country: &str, state: &str) -> Result<Vec<String>>;
    async fn city_population(&self, country: &str, city: &str) -> Result<Vec<PopulationCount>>;
}

/// Weather-by-coordinate provider
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, coordinate: Coordinate) -> Result<CurrentWeather>;
}

/// Coordinate-to-place provider
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, coordinate: Coordinate) -> Result<ReversePlace>;
}

/// Free-text-to-coordinate provider; `None` means no matches
#[async_trait]
pub trait ForwardGeocoder: Send + Sync {
    async fn search(&self, query: &str) -> Result<Option<Coordinate>>;
}

/// Build the HTTP client shared by all providers.
pub fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(concat!(
            "geoscope/",
            env!("CARGO_PKG_VERSION"),
            " (location explorer)"
        ))
        .timeout(timeout)
        .build()
        .context("failed to build an HTTP client")
}

/// The full provider set, wired to their production endpoints.
#[derive(Clone)]
pub struct HttpProviders {
    pub directory: Arc<CountriesNowClient>,
    pub weather: Arc<WttrClient>,
    pub reverse: Arc<BigDataCloudClient>,
    pub forward: Arc<NominatimClient>,
}

impl HttpProviders {
    pub fn from_config(upstream: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = build_client(Duration::from_secs(upstream.timeout_seconds.into()))?;

        Ok(Self {
            directory: Arc::new(CountriesNowClient::new(
                client.clone(),
                upstream.directory_base_url.clone(),
            )),
            weather: Arc::new(WttrClient::new(
                client.clone(),
                upstream.weather_base_url.clone(),
            )),
            reverse: Arc::new(BigDataCloudClient::new(
                client.clone(),
                upstream.reverse_geocode_url.clone(),
            )),
            forward: Arc::new(NominatimClient::new(
                client,
                upstream.forward_geocode_url.clone(),
            )),
        })
    }
}
