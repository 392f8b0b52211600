//! Error types and handling for the `CepWeather` service

use thiserror::Error;

/// Main error type for the `CepWeather` service
#[derive(Error, Debug)]
pub enum CepWeatherError {
    /// Request used a method other than GET
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The `cep` query parameter was absent or empty
    #[error("CEP is required")]
    MissingPostalCode,

    /// The postal code is not exactly eight decimal digits
    #[error("Invalid postal code: {cep:?}")]
    InvalidPostalCode { cep: String },

    /// The postal code could not be resolved to a city
    #[error("Postal code not found: {cep}")]
    NotFound { cep: String },

    /// An upstream service answered with a non-success status
    #[error("{service} returned status {status}: {message}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// An upstream response did not have the expected shape
    #[error("Invalid response from {service}: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    /// Transport-level failure talking to an upstream service
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CepWeatherError {
    /// Create a new invalid postal code error
    pub fn invalid_postal_code<S: Into<String>>(cep: S) -> Self {
        Self::InvalidPostalCode { cep: cep.into() }
    }

    /// Create a new not found error
    pub fn not_found<S: Into<String>>(cep: S) -> Self {
        Self::NotFound { cep: cep.into() }
    }

    /// Create a new upstream status error
    pub fn upstream_status<S: Into<String>>(service: &'static str, status: u16, message: S) -> Self {
        Self::UpstreamStatus {
            service,
            status,
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::Decode {
            service,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than by us
    /// or an upstream service.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MethodNotAllowed
                | Self::MissingPostalCode
                | Self::InvalidPostalCode { .. }
                | Self::NotFound { .. }
        )
    }

    /// Get the message that is safe to return to the caller.
    ///
    /// Server-side failures collapse to one generic text, the cause is only logged.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            CepWeatherError::MethodNotAllowed => "Method not allowed",
            CepWeatherError::MissingPostalCode => "CEP is required",
            CepWeatherError::InvalidPostalCode { .. } => "invalid zipcode",
            CepWeatherError::NotFound { .. } => "can not find zipcode",
            CepWeatherError::UpstreamStatus { .. }
            | CepWeatherError::Decode { .. }
            | CepWeatherError::Http { .. }
            | CepWeatherError::Config { .. }
            | CepWeatherError::Io { .. } => "Error getting temperature",
        }
    }
}
