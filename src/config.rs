//! Configuration management for the `CepWeather` service
//!
//! Settings come from environment variables and are validated once at
//! startup. The resulting [`ServiceConfig`] is passed explicitly to the
//! clients and the router; nothing reads the environment per request.

use crate::{CepWeatherError, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Root configuration structure for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// TCP port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Answer weather lookups with a fixed temperature instead of calling out
    #[serde(default)]
    pub test_mode: bool,
    /// Make every postal lookup report "not found" without calling out
    #[serde(default)]
    pub simulate_cep_not_found: bool,
    /// Postal code resolution service settings
    #[serde(default)]
    pub postal: PostalConfig,
    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Outbound HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Postal code resolution service (`ViaCEP`) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostalConfig {
    /// Base URL, the lookup path is `{base_url}/{cep}/json/`
    #[serde(default = "default_postal_base_url")]
    pub base_url: String,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// `WeatherAPI` key, required unless running in test mode
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_postal_base_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

fn default_weather_base_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            test_mode: false,
            simulate_cep_not_found: false,
            postal: PostalConfig::default(),
            weather: WeatherConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PostalConfig {
    fn default() -> Self {
        Self {
            base_url: default_postal_base_url(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset and empty values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| CepWeatherError::config(format!("Invalid PORT '{port}'")))?;
        }
        config.test_mode = get("TEST_MODE").is_some_and(|v| is_enabled(&v));
        config.simulate_cep_not_found =
            get("SIMULATE_CEP_NOT_FOUND").is_some_and(|v| is_enabled(&v));

        config.weather.api_key = get("WEATHER_API_KEY");
        if let Some(url) = get("WEATHER_API_BASE_URL") {
            config.weather.base_url = url;
        }
        if let Some(url) = get("VIACEP_BASE_URL") {
            config.postal.base_url = url;
        }
        if let Some(timeout) = get("HTTP_TIMEOUT_SECONDS") {
            config.http.timeout_seconds = timeout.trim().parse().map_err(|_| {
                CepWeatherError::config(format!("Invalid HTTP_TIMEOUT_SECONDS '{timeout}'"))
            })?;
        }
        if let Some(level) = get("LOG_LEVEL") {
            config.logging.level = level.to_lowercase();
        }
        if let Some(format) = get("LOG_FORMAT") {
            config.logging.format = format.to_lowercase();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            return Err(CepWeatherError::config(
                "HTTP timeout must be at least 1 second",
            ));
        }

        if self.http.timeout_seconds > 300 {
            return Err(CepWeatherError::config(
                "HTTP timeout cannot exceed 300 seconds",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CepWeatherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CepWeatherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("Weather API", &self.weather.base_url),
            ("ViaCEP", &self.postal.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CepWeatherError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}

fn is_enabled(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
