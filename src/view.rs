//! View state for the explorer page.
//!
//! The cascade and resolver never touch a rendering surface; they mutate
//! this object and a frontend (or the CLI) draws it. Each region owns the
//! short static message that replaces it on failure.

use serde::Serialize;

use crate::models::{Coordinate, LocationInfo, DEFAULT_CENTER};

// Messages shown in place of a UI region when something goes wrong.
pub const MSG_ERROR_COUNTRIES: &str = "Error loading countries";
pub const MSG_ERROR_STATES: &str = "Error loading states";
pub const MSG_ERROR_CITIES: &str = "Error loading cities";
pub const MSG_LOADING_INFO: &str = "Loading location info...";
pub const MSG_GETTING_LOCATION: &str = "Getting your precise location...";
pub const MSG_LOCATION_NOT_FOUND: &str = "Location not found";
pub const MSG_COORDINATE_ERROR: &str = "Error fetching location coordinates";
pub const MSG_INFO_ERROR: &str = "Error loading location info";
pub const MSG_PERMISSION_DENIED: &str = "Permission denied or unable to get location.";

/// One dropdown's option list.
///
/// `Failed` renders as a single disabled error entry and leaves the level
/// non-functional until the user re-triggers the fetch upstream of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MenuState {
    Disabled,
    Loading,
    Ready(Vec<String>),
    Failed(&'static str),
}

impl MenuState {
    /// Whether the control accepts a selection
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, MenuState::Ready(_))
    }

    /// The selectable options, when there are any
    #[must_use]
    pub fn options(&self) -> &[String] {
        match self {
            MenuState::Ready(options) => options,
            _ => &[],
        }
    }
}

/// The info panel region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PanelState {
    Empty,
    Loading(&'static str),
    Info(LocationInfo),
    Message(String),
}

/// State of the opaque map widget: a center and a single marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Option<Coordinate>,
    pub marker: Option<Coordinate>,
}

impl MapView {
    pub const ZOOM: u8 = 13;

    /// A map focused on the fixed fallback point
    #[must_use]
    pub fn new() -> Self {
        let mut map = Self {
            center: None,
            marker: None,
        };
        map.focus(DEFAULT_CENTER);
        map
    }

    /// Center on the coordinate, creating the marker if absent and
    /// moving it if present.
    pub fn focus(&mut self, coordinate: Coordinate) {
        self.center = Some(coordinate);
        self.marker = Some(coordinate);
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub country_menu: MenuState,
    pub state_menu: MenuState,
    pub city_menu: MenuState,
    pub panel: PanelState,
    pub map: MapView,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            country_menu: MenuState::Loading,
            state_menu: MenuState::Disabled,
            city_menu: MenuState::Disabled,
            panel: PanelState::Empty,
            map: MapView::new(),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
