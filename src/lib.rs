//! `CepWeather` - current temperature for a Brazilian postal code
//!
//! This library resolves a CEP to its city through `ViaCEP`, looks up the
//! city's current temperature on `WeatherAPI` and exposes the result in
//! Celsius, Fahrenheit and Kelvin over a small JSON HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod models;
pub mod normalize;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::{AppState, router};
pub use config::ServiceConfig;
pub use error::CepWeatherError;
pub use location_resolver::{CityLookup, CityResolver, NotFoundReason, ViaCepClient};
pub use models::{PostalCode, TemperatureReading};
pub use weather::{TemperatureProvider, WeatherApiClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CepWeatherError>;
