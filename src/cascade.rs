//! The country → state → city selection cascade.
//!
//! Selection is a tagged state: a city cannot exist without a state, nor a
//! state without a country. One transition function consumes user events
//! and answers with the follow-up work, so every enable/disable rule lives
//! in one place instead of scattered field checks.
//!
//! Each dependent level carries a generation counter. A fetch started for
//! generation `g` whose result arrives after the counter moved past `g`
//! is stale and must be dropped, not rendered.

/// The current three-level selection. Illegal combinations are
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Empty,
    Country {
        country: String,
    },
    CountryState {
        country: String,
        state: String,
    },
    Full {
        country: String,
        state: String,
        city: String,
    },
}

impl Selection {
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        match self {
            Selection::Empty => None,
            Selection::Country { country }
            | Selection::CountryState { country, .. }
            | Selection::Full { country, .. } => Some(country),
        }
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        match self {
            Selection::CountryState { state, .. } | Selection::Full { state, .. } => Some(state),
            _ => None,
        }
    }

    #[must_use]
    pub fn city(&self) -> Option<&str> {
        match self {
            Selection::Full { city, .. } => Some(city),
            _ => None,
        }
    }
}

/// A discrete user action on one of the dropdowns. `None` (or an empty
/// string) means the placeholder entry was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeEvent {
    CountryChosen(Option<String>),
    StateChosen(Option<String>),
    CityChosen(Option<String>),
}

/// Follow-up work a transition asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    FetchStates {
        country: String,
        generation: u64,
    },
    FetchCities {
        country: String,
        state: String,
        generation: u64,
    },
    SearchCity {
        city: String,
        country: String,
    },
}

#[derive(Debug, Default)]
pub struct Cascade {
    selection: Selection,
    states_generation: u64,
    cities_generation: u64,
}

impl Cascade {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Apply one user event and return the follow-up work.
    ///
    /// Changing an upstream level always resets everything downstream of
    /// it and invalidates any fetch still in flight for those levels.
    pub fn apply(&mut self, event: CascadeEvent) -> Action {
        match event {
            CascadeEvent::CountryChosen(country) => {
                self.states_generation += 1;
                self.cities_generation += 1;
                match normalize(country) {
                    None => {
                        self.selection = Selection::Empty;
                        Action::None
                    }
                    Some(country) => {
                        self.selection = Selection::Country {
                            country: country.clone(),
                        };
                        Action::FetchStates {
                            country,
                            generation: self.states_generation,
                        }
                    }
                }
            }
            CascadeEvent::StateChosen(state) => {
                self.cities_generation += 1;
                let Some(country) = self.selection.country().map(str::to_string) else {
                    // A state event without a country is a stray; ignore it.
                    return Action::None;
                };
                match normalize(state) {
                    None => {
                        self.selection = Selection::Country { country };
                        Action::None
                    }
                    Some(state) => {
                        self.selection = Selection::CountryState {
                            country: country.clone(),
                            state: state.clone(),
                        };
                        Action::FetchCities {
                            country,
                            state,
                            generation: self.cities_generation,
                        }
                    }
                }
            }
            CascadeEvent::CityChosen(city) => {
                let (Some(country), Some(state)) = (
                    self.selection.country().map(str::to_string),
                    self.selection.state().map(str::to_string),
                ) else {
                    return Action::None;
                };
                match normalize(city) {
                    None => {
                        self.selection = Selection::CountryState { country, state };
                        Action::None
                    }
                    Some(city) => {
                        self.selection = Selection::Full {
                            country: country.clone(),
                            state,
                            city: city.clone(),
                        };
                        Action::SearchCity { city, country }
                    }
                }
            }
        }
    }

    /// Drop the whole selection, invalidating any in-flight fetches.
    pub fn clear(&mut self) {
        self.states_generation += 1;
        self.cities_generation += 1;
        self.selection = Selection::Empty;
    }

    /// Whether a states fetch started at `generation` is still the latest
    #[must_use]
    pub fn states_fetch_is_current(&self, generation: u64) -> bool {
        self.states_generation == generation
    }

    /// Whether a cities fetch started at `generation` is still the latest
    #[must_use]
    pub fn cities_fetch_is_current(&self, generation: u64) -> bool {
        self.cities_generation == generation
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
