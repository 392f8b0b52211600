//! Data models for the `CepWeather` service
//!
//! - Postal code: validated CEP input
//! - Temperature: the reading returned to callers

pub mod postal_code;
pub mod temperature;

pub use postal_code::PostalCode;
pub use temperature::TemperatureReading;
