use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::Method,
    routing::any,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::form_urlencoded;

use crate::{
    CepWeatherError, Result,
    config::{HttpConfig, ServiceConfig},
    location_resolver::{CityResolver, ViaCepClient},
    models::{PostalCode, TemperatureReading},
    weather::{TemperatureProvider, WeatherApiClient},
};

mod error;

/// Collaborators shared by every request
#[derive(Clone)]
pub struct AppState {
    resolver: Arc<dyn CityResolver>,
    weather: Arc<dyn TemperatureProvider>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn CityResolver>, weather: Arc<dyn TemperatureProvider>) -> Self {
        Self { resolver, weather }
    }

    /// Wire the `ViaCEP` and `WeatherAPI` clients from configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let client = http_client(&config.http)?;

        let resolver = ViaCepClient::new(
            client.clone(),
            config.postal.base_url.clone(),
            config.simulate_cep_not_found,
        );
        let weather = WeatherApiClient::new(
            client,
            config.weather.base_url.clone(),
            config.weather.api_key.clone(),
            config.test_mode,
        );

        Ok(Self::new(Arc::new(resolver), Arc::new(weather)))
    }
}

/// Outbound client shared by both upstream lookups
pub fn http_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(concat!("cep-weather/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(get_temperature))
        .route("/health", any(health))
        .with_state(state)
}

#[instrument(skip_all, fields(cep = tracing::field::Empty))]
async fn get_temperature(
    method: Method,
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<TemperatureReading>> {
    if method != Method::GET {
        return Err(CepWeatherError::MethodNotAllowed);
    }

    let raw = first_query_value(query.as_deref(), "cep")
        .filter(|cep| !cep.is_empty())
        .ok_or(CepWeatherError::MissingPostalCode)?;
    tracing::Span::current().record("cep", raw.as_str());

    let cep = PostalCode::parse(&raw)?;
    let city = state.resolver.resolve(&cep).await.into_result(&cep)?;
    let celsius = state.weather.current_celsius(&city).await?;

    let reading = TemperatureReading::from_celsius(celsius);
    tracing::info!(
        "{} ({}): {}°C / {}°F / {}K",
        cep,
        city,
        reading.celsius,
        reading.fahrenheit,
        reading.kelvin
    );
    Ok(Json(reading))
}

/// First value of `key` in a raw query string; later repeats are ignored
fn first_query_value(query: Option<&str>, key: &str) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}
