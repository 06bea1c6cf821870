use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use weather_core::{WeatherDto, WeatherError};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        let status = match err {
            WeatherError::CityNotFound(_) => StatusCode::NOT_FOUND,
            WeatherError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        ApiError(status, err.user_message())
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

/// Last-resort response for a handler that panicked.
pub(super) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "request handler panicked");

    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An unexpected error occurred. Please try again later.",
    )
    .into_response()
}

// ─── GET /health ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ─── GET /api/countries ──────────────────────────────────────────

#[derive(Serialize)]
pub struct CountryResponse {
    pub name: String,
    pub code: String,
}

pub async fn countries(State(state): State<Arc<AppState>>) -> Json<Vec<CountryResponse>> {
    let countries = state
        .directory
        .countries()
        .map(|c| CountryResponse {
            name: c.name.clone(),
            code: c.code.clone(),
        })
        .collect();

    Json(countries)
}

// ─── GET /api/countries/{country_code}/cities ────────────────────

#[derive(Serialize)]
pub struct CityResponse {
    pub name: String,
}

pub async fn cities(
    State(state): State<Arc<AppState>>,
    Path(country_code): Path<String>,
) -> Json<Vec<CityResponse>> {
    let cities = state
        .directory
        .cities_for_country(&country_code)
        .iter()
        .map(|c| CityResponse {
            name: c.name.clone(),
        })
        .collect();

    Json(cities)
}

// ─── GET /api/weather/{city_name} ────────────────────────────────

pub async fn weather(
    State(state): State<Arc<AppState>>,
    Path(city_name): Path<String>,
) -> Result<Json<WeatherDto>, ApiError> {
    if city_name.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "City name must not be empty"));
    }

    let start = Instant::now();
    let result = state.weather.current_weather(&city_name).await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(reading) => {
            tracing::info!(city = %city_name, elapsed_ms, "GET /api/weather -> ok");
            Ok(Json(WeatherDto::from(reading)))
        }
        Err(err) => {
            tracing::info!(city = %city_name, elapsed_ms, error = %err, "GET /api/weather -> failed");
            Err(err.into())
        }
    }
}
