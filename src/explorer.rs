//! Session orchestrator: drives the selection cascade, the two coordinate
//! entry points and the resolver against one view state.
//!
//! Everything runs on the caller's single logical thread; network calls
//! are awaited in sequence and a superseded fetch is discarded by the
//! cascade's generation check when it finally lands.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::cascade::{Action, Cascade, CascadeEvent, Selection};
use crate::gateway::Gateway;
use crate::models::{Coordinate, PlaceHint};
use crate::providers::ForwardGeocoder;
use crate::resolver::LocationResolver;
use crate::view::{
    MenuState, PanelState, ViewState, MSG_COORDINATE_ERROR, MSG_ERROR_CITIES, MSG_ERROR_COUNTRIES,
    MSG_ERROR_STATES, MSG_GETTING_LOCATION, MSG_INFO_ERROR, MSG_LOADING_INFO,
    MSG_LOCATION_NOT_FOUND, MSG_PERMISSION_DENIED,
};
use crate::Result;

/// How a device position request was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceTrigger {
    /// Automatic best-effort request on page load; failures stay silent
    PageLoad,
    /// Explicit button press; failures are shown to the user
    ButtonPress,
}

/// The options a frontend must pass to the device geolocation API.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GeolocationOptions {
    #[serde(rename = "enableHighAccuracy")]
    pub enable_high_accuracy: bool,
    #[serde(rename = "timeout")]
    pub timeout_ms: u32,
    #[serde(rename = "maximumAge")]
    pub maximum_age_ms: u32,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 0,
        }
    }
}

pub struct Explorer {
    cascade: Cascade,
    view: ViewState,
    gateway: Gateway,
    resolver: LocationResolver,
    forward: Arc<dyn ForwardGeocoder>,
}

impl Explorer {
    #[must_use]
    pub fn new(
        gateway: Gateway,
        resolver: LocationResolver,
        forward: Arc<dyn ForwardGeocoder>,
    ) -> Self {
        Self {
            cascade: Cascade::new(),
            view: ViewState::new(),
            gateway,
            resolver,
            forward,
        }
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        self.cascade.selection()
    }

    /// Populate the country menu. Called once when the session begins.
    pub async fn start(&mut self) {
        self.view.country_menu = MenuState::Loading;
        match self.gateway.list_countries().await {
            Ok(countries) => self.view.country_menu = MenuState::Ready(countries),
            Err(e) => {
                warn!("loading countries failed: {e}");
                self.view.country_menu = MenuState::Failed(MSG_ERROR_COUNTRIES);
            }
        }
    }

    /// The user picked (or cleared) a country.
    pub async fn select_country(&mut self, country: Option<String>) {
        self.view.panel = PanelState::Empty;
        self.view.city_menu = MenuState::Disabled;

        match self.cascade.apply(CascadeEvent::CountryChosen(country)) {
            Action::FetchStates { country, generation } => {
                self.view.state_menu = MenuState::Loading;
                let result = self.gateway.list_states(&country).await;
                if !self.cascade.states_fetch_is_current(generation) {
                    // A newer selection superseded this fetch.
                    return;
                }
                match result {
                    Ok(states) => self.view.state_menu = MenuState::Ready(states),
                    Err(e) => {
                        warn!("loading states for {country:?} failed: {e}");
                        self.view.state_menu = MenuState::Failed(MSG_ERROR_STATES);
                    }
                }
            }
            _ => {
                self.view.state_menu = MenuState::Disabled;
            }
        }
    }

    /// The user picked (or cleared) a state.
    pub async fn select_state(&mut self, state: Option<String>) {
        self.view.panel = PanelState::Empty;

        match self.cascade.apply(CascadeEvent::StateChosen(state)) {
            Action::FetchCities {
                country,
                state,
                generation,
            } => {
                self.view.city_menu = MenuState::Loading;
                let result = self.gateway.list_cities(&country, &state).await;
                if !self.cascade.cities_fetch_is_current(generation) {
                    return;
                }
                match result {
                    Ok(cities) => self.view.city_menu = MenuState::Ready(cities),
                    Err(e) => {
                        warn!("loading cities for {country:?}/{state:?} failed: {e}");
                        self.view.city_menu = MenuState::Failed(MSG_ERROR_CITIES);
                    }
                }
            }
            _ => {
                self.view.city_menu = MenuState::Disabled;
            }
        }
    }

    /// The user picked (or cleared) a city. A real pick searches for the
    /// city's coordinate and resolves it.
    pub async fn select_city(&mut self, city: Option<String>) {
        if let Action::SearchCity { city, country } =
            self.cascade.apply(CascadeEvent::CityChosen(city))
        {
            self.search_city(city, Some(country)).await;
        }
    }

    /// Forward-geocode a city name and resolve the first match.
    pub async fn search_city(&mut self, city: String, country: Option<String>) {
        match self.forward.search(&city).await {
            Ok(Some(coordinate)) => {
                let hint = PlaceHint {
                    city: Some(city),
                    country,
                };
                self.resolve(coordinate, hint).await;
            }
            Ok(None) => {
                self.view.panel = PanelState::Message(MSG_LOCATION_NOT_FOUND.to_string());
            }
            Err(e) => {
                warn!("forward geocoding {city:?} failed: {e}");
                self.view.panel = PanelState::Message(MSG_COORDINATE_ERROR.to_string());
            }
        }
    }

    /// A device position request finished.
    pub async fn device_position(
        &mut self,
        outcome: Result<Coordinate>,
        trigger: DeviceTrigger,
    ) {
        match (outcome, trigger) {
            (Ok(coordinate), DeviceTrigger::ButtonPress) => {
                self.view.panel = PanelState::Loading(MSG_GETTING_LOCATION);
                self.cascade.clear();
                self.view.state_menu = MenuState::Disabled;
                self.view.city_menu = MenuState::Disabled;
                self.resolve(coordinate, PlaceHint::default()).await;
            }
            (Ok(coordinate), DeviceTrigger::PageLoad) => {
                // The automatic fix must not clobber a selection the user
                // already completed.
                if self.cascade.selection().city().is_none() {
                    self.resolve(coordinate, PlaceHint::default()).await;
                }
            }
            (Err(_), DeviceTrigger::PageLoad) => {}
            (Err(e), DeviceTrigger::ButtonPress) => {
                warn!("device geolocation failed: {e}");
                self.view.panel = PanelState::Message(MSG_PERMISSION_DENIED.to_string());
            }
        }
    }

    async fn resolve(&mut self, coordinate: Coordinate, mut hint: PlaceHint) {
        if hint.country.is_none() {
            hint.country = self.cascade.selection().country().map(str::to_string);
        }

        self.view.panel = PanelState::Loading(MSG_LOADING_INFO);
        match self
            .resolver
            .resolve(coordinate, hint, &mut self.view.map)
            .await
        {
            Ok(info) => self.view.panel = PanelState::Info(info),
            Err(e) => {
                warn!("resolution at {coordinate} failed: {e}");
                self.view.panel = PanelState::Message(MSG_INFO_ERROR.to_string());
            }
        }
    }
}
