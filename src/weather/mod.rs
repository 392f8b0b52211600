//! `WeatherAPI` client for current conditions
//!
//! Only the current Celsius temperature is read from the response. In test
//! mode the client never touches the network and reports a fixed value.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::normalize::remove_accents;
use crate::{CepWeatherError, Result};

const SERVICE: &str = "WeatherAPI";

/// Temperature reported for every city while in test mode
pub const TEST_MODE_CELSIUS: f64 = 25.0;

/// Source of the current temperature for a city
#[async_trait]
pub trait TemperatureProvider: Send + Sync {
    async fn current_celsius(&self, city: &str) -> Result<f64>;
}

/// `current.json` response, only the fields we read
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Option<CurrentData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    temp_c: Option<f64>,
}

/// Error body, e.g. `{"error": {"code": 1002, "message": "API key is invalid"}}`
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<i64>,
    message: String,
}

/// `WeatherAPI` current conditions client
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    test_mode: bool,
}

impl WeatherApiClient {
    /// Create a new client on top of a shared HTTP client
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        test_mode: bool,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
            test_mode,
        }
    }

    fn current_url(&self, api_key: &str, city: &str) -> String {
        format!(
            "{}/current.json?key={}&q={}&aqi=no",
            self.base_url,
            urlencoding::encode(api_key),
            urlencoding::encode(&remove_accents(city))
        )
    }
}

#[async_trait]
impl TemperatureProvider for WeatherApiClient {
    #[instrument(skip(self))]
    async fn current_celsius(&self, city: &str) -> Result<f64> {
        if self.test_mode {
            debug!("Test mode, skipping {} call", SERVICE);
            return Ok(TEST_MODE_CELSIUS);
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CepWeatherError::config("WEATHER_API_KEY not set"))?;

        // The URL carries the key, keep it out of the logs.
        let url = self.current_url(api_key, city);
        debug!("Querying {} for {}", SERVICE, remove_accents(city));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => match parsed.error.code {
                    Some(code) => format!("{} (code {})", parsed.error.message, code),
                    None => parsed.error.message,
                },
                Err(_) => body,
            };
            warn!("{} returned status {}: {}", SERVICE, status, message);
            return Err(CepWeatherError::upstream_status(
                SERVICE,
                status.as_u16(),
                message,
            ));
        }

        let body: CurrentResponse = response
            .json()
            .await
            .map_err(|e| CepWeatherError::decode(SERVICE, e.without_url().to_string()))?;

        let celsius = body
            .current
            .and_then(|current| current.temp_c)
            .ok_or_else(|| CepWeatherError::decode(SERVICE, "missing current.temp_c"))?;

        info!("Current temperature in {} is {}°C", city, celsius);
        Ok(celsius)
    }
}
