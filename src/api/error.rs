use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::CepWeatherError;

impl CepWeatherError {
    /// HTTP status the error is reported with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            CepWeatherError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            CepWeatherError::MissingPostalCode => StatusCode::BAD_REQUEST,
            CepWeatherError::InvalidPostalCode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CepWeatherError::NotFound { .. } => StatusCode::NOT_FOUND,
            CepWeatherError::UpstreamStatus { .. }
            | CepWeatherError::Decode { .. }
            | CepWeatherError::Http { .. }
            | CepWeatherError::Config { .. }
            | CepWeatherError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CepWeatherError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::debug!("Rejecting request: {}", self);
        } else {
            tracing::error!("Error getting temperature: {}", self);
        }

        (self.status_code(), self.user_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(CepWeatherError::MethodNotAllowed, 405, "Method not allowed")]
    #[case(CepWeatherError::MissingPostalCode, 400, "CEP is required")]
    #[case(CepWeatherError::invalid_postal_code("123"), 422, "invalid zipcode")]
    #[case(CepWeatherError::not_found("99999999"), 404, "can not find zipcode")]
    #[case(
        CepWeatherError::upstream_status("WeatherAPI", 401, "API key is invalid"),
        500,
        "Error getting temperature"
    )]
    #[case(
        CepWeatherError::config("WEATHER_API_KEY not set"),
        500,
        "Error getting temperature"
    )]
    #[tokio::test]
    async fn test_error_responses(
        #[case] err: CepWeatherError,
        #[case] status: u16,
        #[case] body: &str,
    ) {
        let response = err.into_response();
        assert_eq!(response.status().as_u16(), status);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], body.as_bytes());
    }
}
