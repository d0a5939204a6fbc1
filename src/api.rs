//! The JSON API surface: the three directory proxy routes plus
//! server-side geocoding/resolution for the browser.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::explorer::GeolocationOptions;
use crate::gateway::Gateway;
use crate::models::{Coordinate, LocationInfo, PlaceHint, DEFAULT_CENTER};
use crate::providers::{ForwardGeocoder, HttpProviders};
use crate::resolver::LocationResolver;
use crate::view::{MapView, MSG_INFO_ERROR, MSG_LOCATION_NOT_FOUND};
use crate::ExplorerError;

pub struct AppState {
    pub gateway: Gateway,
    pub resolver: LocationResolver,
    pub forward: Arc<dyn ForwardGeocoder>,
}

impl AppState {
    #[must_use]
    pub fn new(providers: HttpProviders) -> Self {
        Self {
            gateway: Gateway::new(providers.directory.clone()),
            resolver: LocationResolver::new(
                providers.reverse,
                providers.weather,
                providers.directory,
            ),
            forward: providers.forward,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/states", post(list_states))
        .route("/cities", post(list_cities))
        .route("/search", get(search))
        .route("/locate", get(locate))
        .route("/client-config", get(client_config))
        .with_state(state)
}

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
}

pub(crate) struct ApiError(ExplorerError);

impl From<ExplorerError> for ApiError {
    fn from(error: ExplorerError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ExplorerError::Validation { .. } => StatusCode::BAD_REQUEST,
            ExplorerError::NotFound { .. } => StatusCode::NOT_FOUND,
            ExplorerError::Permission { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ApiErrorBody {
            error: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

// ─── Directory proxy routes ──────────────────────────────────────

#[derive(Serialize)]
struct CountriesResponse {
    countries: Vec<String>,
}

async fn list_countries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountriesResponse>, ApiError> {
    let countries = state.gateway.list_countries().await?;
    Ok(Json(CountriesResponse { countries }))
}

#[derive(Deserialize)]
struct StatesRequest {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Serialize)]
struct StatesResponse {
    states: Vec<String>,
}

async fn list_states(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StatesRequest>,
) -> Result<Json<StatesResponse>, ApiError> {
    let country = body.country.unwrap_or_default();
    let states = state.gateway.list_states(&country).await?;
    Ok(Json(StatesResponse { states }))
}

#[derive(Deserialize)]
struct CitiesRequest {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Serialize)]
struct CitiesResponse {
    cities: Vec<String>,
}

async fn list_cities(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CitiesRequest>,
) -> Result<Json<CitiesResponse>, ApiError> {
    let country = body.country.unwrap_or_default();
    let region = body.state.unwrap_or_default();
    let cities = state.gateway.list_cities(&country, &region).await?;
    Ok(Json(CitiesResponse { cities }))
}

// ─── GET /api/search ─────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Coordinate>, ApiError> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ExplorerError::validation("Missing 'q' parameter").into());
    }

    match state.forward.search(query.trim()).await? {
        Some(coordinate) => Ok(Json(coordinate)),
        None => Err(ExplorerError::not_found(MSG_LOCATION_NOT_FOUND).into()),
    }
}

// ─── GET /api/locate ─────────────────────────────────────────────

#[derive(Deserialize)]
struct LocateQuery {
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    country: Option<String>,
}

async fn locate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocateQuery>,
) -> Result<Json<LocationInfo>, ApiError> {
    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        return Err(ExplorerError::validation("Provide 'lat' and 'lon' parameters").into());
    };

    let coordinate = Coordinate::new(lat, lon);
    if !coordinate.is_valid() {
        return Err(
            ExplorerError::validation("Invalid coordinates. Lat: -90..90, Lon: -180..180").into(),
        );
    }

    let hint = PlaceHint {
        city: params.city.filter(|c| !c.is_empty()),
        country: params.country.filter(|c| !c.is_empty()),
    };

    // The browser owns the real map; the resolver just needs a surface to
    // focus.
    let mut map = MapView::new();
    let info = state
        .resolver
        .resolve(coordinate, hint, &mut map)
        .await
        .map_err(|e| {
            warn!("locating {coordinate} failed: {e}");
            ExplorerError::upstream(MSG_INFO_ERROR)
        })?;

    Ok(Json(info))
}

// ─── GET /api/client-config ──────────────────────────────────────

#[derive(Serialize)]
struct ClientConfig {
    geolocation: GeolocationOptions,
    default_center: Coordinate,
}

async fn client_config() -> Json<ClientConfig> {
    Json(ClientConfig {
        geolocation: GeolocationOptions::default(),
        default_center: DEFAULT_CENTER,
    })
}
