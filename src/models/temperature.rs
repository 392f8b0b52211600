//! Temperature reading returned to callers

use serde::{Deserialize, Serialize};

/// Offset added to Celsius to get Kelvin.
///
/// Kept at 273 rather than 273.15 because clients already depend on it.
pub const KELVIN_OFFSET: f64 = 273.0;

/// Current temperature in the three units the API exposes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    #[serde(rename = "temp_C")]
    pub celsius: f64,
    #[serde(rename = "temp_F")]
    pub fahrenheit: f64,
    #[serde(rename = "temp_K")]
    pub kelvin: f64,
}

impl TemperatureReading {
    /// Derive Fahrenheit and Kelvin from a Celsius value
    #[must_use]
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: Self::celsius_to_fahrenheit(celsius),
            kelvin: Self::celsius_to_kelvin(celsius),
        }
    }

    #[must_use]
    pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
        celsius * 1.8 + 32.0
    }

    #[must_use]
    pub fn celsius_to_kelvin(celsius: f64) -> f64 {
        celsius + KELVIN_OFFSET
    }
}
