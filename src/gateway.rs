//! Proxy gateway over the directory provider.
//!
//! Centralizes the three listing operations used by both the HTTP API and
//! the session orchestrator: validate input, forward to the directory,
//! sort the names, and collapse every upstream failure into one generic
//! message per operation. Upstream detail never crosses this boundary.

use std::sync::Arc;

use tracing::warn;

use crate::providers::Directory;
use crate::{ExplorerError, Result};

#[derive(Clone)]
pub struct Gateway {
    directory: Arc<dyn Directory>,
}

impl Gateway {
    #[must_use]
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    /// List all country names, sorted ascending.
    pub async fn list_countries(&self) -> Result<Vec<String>> {
        let mut countries = self.directory.countries().await.map_err(|e| {
            warn!("listing countries failed: {e}");
            ExplorerError::upstream("Failed to fetch countries")
        })?;
        countries.sort();
        Ok(countries)
    }

    /// List the state names of a country, sorted ascending.
    pub async fn list_states(&self, country: &str) -> Result<Vec<String>> {
        if country.is_empty() {
            return Err(ExplorerError::validation("Country required"));
        }

        let mut states = self.directory.states(country).await.map_err(|e| {
            warn!("listing states for {country:?} failed: {e}");
            ExplorerError::upstream("Failed to fetch states")
        })?;
        states.sort();
        Ok(states)
    }

    /// List the city names of a country+state, sorted ascending.
    pub async fn list_cities(&self, country: &str, state: &str) -> Result<Vec<String>> {
        if country.is_empty() || state.is_empty() {
            return Err(ExplorerError::validation("Country and state required"));
        }

        let mut cities = self.directory.cities(country, state).await.map_err(|e| {
            warn!("listing cities for {country:?}/{state:?} failed: {e}");
            ExplorerError::upstream("Failed to fetch cities")
        })?;
        cities.sort();
        Ok(cities)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rstest::rstest;

    use crate::providers::PopulationCount;

    use super::*;

    /// Directory double that counts calls and can be switched to fail.
    #[derive(Default)]
    struct FakeDirectory {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeDirectory {
        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer(&self, names: &[&str]) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ExplorerError::upstream("boom"));
            }
            Ok(names.iter().map(ToString::to_string).collect())
        }
    }

    #[async_trait]
    impl Directory for FakeDirectory {
        async fn countries(&self) -> Result<Vec<String>> {
            self.answer(&["Norway", "Albania", "india", "India"])
        }

        async fn states(&self, _country: &str) -> Result<Vec<String>> {
            self.answer(&["Goa", "Delhi", "Assam"])
        }

        async fn cities(&self, _country: &str, _state: &str) -> Result<Vec<String>> {
            self.answer(&["Najafgarh", "New Delhi", "Delhi"])
        }

        async fn city_population(&self, _country: &str, _city: &str) -> Result<Vec<PopulationCount>> {
            unimplemented!("not exercised by gateway tests")
        }
    }

    fn gateway(directory: FakeDirectory) -> Gateway {
        Gateway::new(Arc::new(directory))
    }

    fn is_sorted(names: &[String]) -> bool {
        names.windows(2).all(|pair| pair[0] <= pair[1])
    }

    #[tokio::test]
    async fn test_countries_sorted_ascending() {
        let countries = gateway(FakeDirectory::default())
            .list_countries()
            .await
            .unwrap();
        assert!(is_sorted(&countries));
        // Case-sensitive default string ordering: uppercase sorts first.
        assert_eq!(countries, vec!["Albania", "India", "Norway", "india"]);
    }

    #[tokio::test]
    async fn test_states_and_cities_sorted() {
        let gw = gateway(FakeDirectory::default());

        let states = gw.list_states("India").await.unwrap();
        assert_eq!(states, vec!["Assam", "Delhi", "Goa"]);
        assert!(is_sorted(&states));

        let cities = gw.list_cities("India", "Delhi").await.unwrap();
        assert_eq!(cities, vec!["Delhi", "Najafgarh", "New Delhi"]);
        assert!(is_sorted(&cities));
    }

    #[tokio::test]
    async fn test_states_validation_happens_before_upstream_call() {
        let directory = Arc::new(FakeDirectory::default());
        let gw = Gateway::new(directory.clone());

        let err = gw.list_states("").await.unwrap_err();
        assert!(matches!(err, ExplorerError::Validation { .. }));
        assert_eq!(err.user_message(), "Country required");
        assert_eq!(directory.call_count(), 0);
    }

    #[rstest]
    #[case("", "Delhi")]
    #[case("India", "")]
    #[case("", "")]
    #[tokio::test]
    async fn test_cities_require_both_fields(#[case] country: &str, #[case] state: &str) {
        let err = gateway(FakeDirectory::default())
            .list_cities(country, state)
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::Validation { .. }));
        assert_eq!(err.user_message(), "Country and state required");
    }

    #[tokio::test]
    async fn test_upstream_failures_surface_generic_messages() {
        let gw = gateway(FakeDirectory::failing());

        let err = gw.list_countries().await.unwrap_err();
        assert!(matches!(err, ExplorerError::Upstream { .. }));
        assert_eq!(err.user_message(), "Failed to fetch countries");

        let err = gw.list_states("India").await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to fetch states");

        let err = gw.list_cities("India", "Delhi").await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to fetch cities");
    }
}
