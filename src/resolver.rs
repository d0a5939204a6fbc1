//! Aggregates reverse geocoding, weather and population lookups for a
//! coordinate into one display payload.
//!
//! The three sources degrade differently: a silent reverse geocoder falls
//! back to a label chain, a silent population source becomes "Unknown",
//! but weather has no stand-in value, so a weather failure aborts the
//! whole resolution.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::models::{Coordinate, LocationInfo, PlaceHint, Population};
use crate::providers::{Directory, ReverseGeocoder, WeatherSource};
use crate::view::MapView;
use crate::Result;

/// Label used when no source could name the place. A place carrying this
/// label is never sent to the population lookup.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

pub struct LocationResolver {
    reverse: Arc<dyn ReverseGeocoder>,
    weather: Arc<dyn WeatherSource>,
    directory: Arc<dyn Directory>,
}

impl LocationResolver {
    #[must_use]
    pub fn new(
        reverse: Arc<dyn ReverseGeocoder>,
        weather: Arc<dyn WeatherSource>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            reverse,
            weather,
            directory,
        }
    }

    /// Resolve a coordinate into the full display payload, re-fetching
    /// every source.
    ///
    /// The map is focused as soon as the place labels are settled, so the
    /// pin moves even when a later step fails.
    #[instrument(skip(self, map), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    pub async fn resolve(
        &self,
        coordinate: Coordinate,
        hint: PlaceHint,
        map: &mut MapView,
    ) -> Result<LocationInfo> {
        let (city, country) = self.place_labels(coordinate, hint).await;
        debug!("resolved place labels: {city:?} / {country:?}");

        map.focus(coordinate);

        let weather = self.weather.current(coordinate).await?;

        let population = self.population_for(&country, &city).await;

        Ok(LocationInfo {
            city,
            country,
            temp_c: weather.temp_c,
            weather_desc: weather.description,
            population,
        })
    }

    /// Fill the missing place labels from the reverse geocoder.
    ///
    /// City preference: city, then locality, then principal subdivision,
    /// then the unknown-location label. A failed lookup lands on the same
    /// fallbacks; this step is never fatal.
    async fn place_labels(&self, coordinate: Coordinate, hint: PlaceHint) -> (String, String) {
        let mut city = hint.city;
        let mut country = hint.country;

        if city.is_none() || country.is_none() {
            match self.reverse.reverse(coordinate).await {
                Ok(place) => {
                    if city.is_none() {
                        city = Some(
                            [place.city, place.locality, place.principal_subdivision]
                                .into_iter()
                                .find(|label| !label.is_empty())
                                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
                        );
                    }
                    if country.is_none() {
                        country = Some(place.country_name);
                    }
                }
                Err(e) => {
                    warn!("reverse geocoding failed, using fallback labels: {e}");
                }
            }
        }

        (
            city.unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            country.unwrap_or_default(),
        )
    }

    /// Population of `city` in `country`, from the most recent entry of
    /// the population time series. Anything short of a parseable entry
    /// degrades to `Unknown`; this step never aborts a resolution.
    async fn population_for(&self, country: &str, city: &str) -> Population {
        if city == UNKNOWN_LOCATION || city.is_empty() || country.is_empty() {
            return Population::Unknown;
        }

        match self.directory.city_population(country, city).await {
            Ok(counts) => counts
                .last()
                .and_then(|latest| parse_count(&latest.value))
                .map_or(Population::Unknown, Population::Known),
            Err(e) => {
                debug!("population lookup for {city:?}, {country:?} failed: {e}");
                Population::Unknown
            }
        }
    }
}

fn parse_count(raw: &str) -> Option<u64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::models::CurrentWeather;
    use crate::providers::{PopulationCount, ReversePlace};
    use crate::ExplorerError;

    use super::*;

    #[derive(Default)]
    struct FakeReverse {
        place: ReversePlace,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReverseGeocoder for FakeReverse {
        async fn reverse(&self, _coordinate: Coordinate) -> Result<ReversePlace> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ExplorerError::upstream("reverse-geocode request failed"));
            }
            Ok(self.place.clone())
        }
    }

    struct FakeWeather {
        fail: bool,
    }

    #[async_trait]
    impl WeatherSource for FakeWeather {
        async fn current(&self, _coordinate: Coordinate) -> Result<CurrentWeather> {
            if self.fail {
                return Err(ExplorerError::upstream("weather request failed"));
            }
            Ok(CurrentWeather {
                temp_c: 24.0,
                description: "Sunny".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct FakePopulation {
        counts: Vec<PopulationCount>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Directory for FakePopulation {
        async fn countries(&self) -> Result<Vec<String>> {
            unimplemented!("not exercised by resolver tests")
        }

        async fn states(&self, _country: &str) -> Result<Vec<String>> {
            unimplemented!("not exercised by resolver tests")
        }

        async fn cities(&self, _country: &str, _state: &str) -> Result<Vec<String>> {
            unimplemented!("not exercised by resolver tests")
        }

        async fn city_population(&self, _country: &str, _city: &str) -> Result<Vec<PopulationCount>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ExplorerError::upstream("directory request failed"));
            }
            Ok(self.counts.clone())
        }
    }

    fn count(year: &str, value: &str) -> PopulationCount {
        PopulationCount {
            year: year.to_string(),
            value: value.to_string(),
        }
    }

    fn resolver(
        reverse: FakeReverse,
        weather: FakeWeather,
        population: FakePopulation,
    ) -> LocationResolver {
        LocationResolver::new(Arc::new(reverse), Arc::new(weather), Arc::new(population))
    }

    fn delhi() -> Coordinate {
        Coordinate::new(28.6, 77.2)
    }

    #[tokio::test]
    async fn test_full_resolution_with_known_place() {
        let population = FakePopulation {
            counts: vec![count("2001", "12877470"), count("2011", "16349831")],
            ..Default::default()
        };
        let resolver = resolver(
            FakeReverse::default(),
            FakeWeather { fail: false },
            population,
        );

        let mut map = MapView::new();
        let info = resolver
            .resolve(delhi(), PlaceHint::known("New Delhi", "India"), &mut map)
            .await
            .unwrap();

        assert_eq!(info.city, "New Delhi");
        assert_eq!(info.country, "India");
        assert_eq!(info.temp_c, 24.0);
        assert_eq!(info.weather_desc, "Sunny");
        // Latest entry of the series wins.
        assert_eq!(info.population, Population::Known(16_349_831));
        assert_eq!(map.marker, Some(delhi()));
    }

    #[tokio::test]
    async fn test_known_place_skips_reverse_geocoding() {
        let reverse = Arc::new(FakeReverse::default());
        let resolver = LocationResolver::new(
            reverse.clone(),
            Arc::new(FakeWeather { fail: false }),
            Arc::new(FakePopulation {
                counts: vec![count("2011", "16349831")],
                ..Default::default()
            }),
        );

        resolver
            .resolve(delhi(), PlaceHint::known("New Delhi", "India"), &mut MapView::new())
            .await
            .unwrap();

        assert_eq!(reverse.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_locality_fallback_when_city_field_empty() {
        let reverse = FakeReverse {
            place: ReversePlace {
                city: String::new(),
                locality: "Connaught Place".to_string(),
                principal_subdivision: "Delhi".to_string(),
                country_name: "India".to_string(),
            },
            ..Default::default()
        };
        let resolver = resolver(reverse, FakeWeather { fail: false }, FakePopulation::default());

        let info = resolver
            .resolve(delhi(), PlaceHint::default(), &mut MapView::new())
            .await
            .unwrap();

        assert_eq!(info.city, "Connaught Place");
        assert_eq!(info.country, "India");
    }

    #[tokio::test]
    async fn test_reverse_failure_degrades_to_fallback_labels() {
        let reverse = FakeReverse {
            fail: true,
            ..Default::default()
        };
        let population = FakePopulation::default();
        let population_calls = Arc::new(population);
        let resolver = LocationResolver::new(
            Arc::new(reverse),
            Arc::new(FakeWeather { fail: false }),
            population_calls.clone(),
        );

        let info = resolver
            .resolve(delhi(), PlaceHint::default(), &mut MapView::new())
            .await
            .unwrap();

        assert_eq!(info.city, UNKNOWN_LOCATION);
        assert_eq!(info.country, "");
        assert_eq!(info.population, Population::Unknown);
        // An unknown place is never sent to the population lookup.
        assert_eq!(population_calls.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_weather_failure_aborts_resolution_but_moves_the_map() {
        let resolver = resolver(
            FakeReverse::default(),
            FakeWeather { fail: true },
            FakePopulation {
                counts: vec![count("2011", "16349831")],
                ..Default::default()
            },
        );

        let mut map = MapView::new();
        let result = resolver
            .resolve(delhi(), PlaceHint::known("New Delhi", "India"), &mut map)
            .await;

        assert!(matches!(result, Err(ExplorerError::Upstream { .. })));
        assert_eq!(map.marker, Some(delhi()));
    }

    #[tokio::test]
    async fn test_population_failure_degrades_to_unknown() {
        let resolver = resolver(
            FakeReverse::default(),
            FakeWeather { fail: false },
            FakePopulation {
                fail: true,
                ..Default::default()
            },
        );

        let info = resolver
            .resolve(delhi(), PlaceHint::known("New Delhi", "India"), &mut MapView::new())
            .await
            .unwrap();

        assert_eq!(info.city, "New Delhi");
        assert_eq!(info.temp_c, 24.0);
        assert_eq!(info.population, Population::Unknown);
    }

    #[tokio::test]
    async fn test_empty_population_series_is_unknown() {
        let resolver = resolver(
            FakeReverse::default(),
            FakeWeather { fail: false },
            FakePopulation::default(),
        );

        let info = resolver
            .resolve(delhi(), PlaceHint::known("New Delhi", "India"), &mut MapView::new())
            .await
            .unwrap();

        assert_eq!(info.population, Population::Unknown);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("16349831"), Some(16_349_831));
        assert_eq!(parse_count("31870.5"), Some(31_871));
        assert_eq!(parse_count(" 120 "), Some(120));
        assert_eq!(parse_count("-5"), None);
        assert_eq!(parse_count("many"), None);
    }
}
