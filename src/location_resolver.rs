//! Location Resolution Module
//!
//! Resolves a Brazilian postal code (CEP) into the name of its city through
//! the `ViaCEP` service. Transport failures and "unknown postal code" are kept
//! apart in [`CityLookup`] so they can be logged differently, even though
//! callers end up treating both as "not found".

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::models::PostalCode;
use crate::{CepWeatherError, Result};

const SERVICE: &str = "ViaCEP";

/// Why a postal code was reported as unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Forced by `SIMULATE_CEP_NOT_FOUND`, no request was sent
    Simulated,
    /// The service answered with a non-200 status
    Status(u16),
    /// The service answered `{"erro": true}`
    Flagged,
    /// The response carried no city name
    EmptyCity,
}

/// Outcome of a postal code lookup
#[derive(Debug)]
pub enum CityLookup {
    Found(String),
    NotFound(NotFoundReason),
    /// The service could not be reached or its response could not be decoded
    Unavailable(CepWeatherError),
}

impl CityLookup {
    /// Collapse the lookup into a result, both failure kinds become `NotFound`
    pub fn into_result(self, cep: &PostalCode) -> Result<String> {
        match self {
            CityLookup::Found(city) => Ok(city),
            CityLookup::NotFound(_) | CityLookup::Unavailable(_) => {
                Err(CepWeatherError::not_found(cep.as_str()))
            }
        }
    }
}

/// Maps a postal code to a city name
#[async_trait]
pub trait CityResolver: Send + Sync {
    async fn resolve(&self, cep: &PostalCode) -> CityLookup;
}

/// `ViaCEP` response, only the fields we read
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default, deserialize_with = "deserialize_erro")]
    erro: bool,
}

/// `erro` has been seen both as `true` and as `"true"`
fn deserialize_erro<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Text(text) => text.eq_ignore_ascii_case("true"),
    })
}

/// `ViaCEP` postal code client
pub struct ViaCepClient {
    client: Client,
    base_url: String,
    simulate_not_found: bool,
}

impl ViaCepClient {
    /// Create a new client on top of a shared HTTP client
    pub fn new(client: Client, base_url: impl Into<String>, simulate_not_found: bool) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            simulate_not_found,
        }
    }

    fn lookup_url(&self, cep: &PostalCode) -> String {
        format!("{}/{}/json/", self.base_url, cep)
    }

    async fn fetch(&self, cep: &PostalCode) -> Result<CityLookup> {
        let url = self.lookup_url(cep);
        debug!("Querying {}: {}", SERVICE, url);

        let response = self.client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Ok(CityLookup::NotFound(NotFoundReason::Status(
                response.status().as_u16(),
            )));
        }

        let body: ViaCepResponse = response
            .json()
            .await
            .map_err(|e| CepWeatherError::decode(SERVICE, e.to_string()))?;

        if body.erro {
            return Ok(CityLookup::NotFound(NotFoundReason::Flagged));
        }
        if body.localidade.trim().is_empty() {
            return Ok(CityLookup::NotFound(NotFoundReason::EmptyCity));
        }

        Ok(CityLookup::Found(body.localidade))
    }
}

#[async_trait]
impl CityResolver for ViaCepClient {
    #[instrument(skip_all, fields(cep = %cep))]
    async fn resolve(&self, cep: &PostalCode) -> CityLookup {
        if self.simulate_not_found {
            debug!("Simulating unknown postal code");
            return CityLookup::NotFound(NotFoundReason::Simulated);
        }

        let lookup = self.fetch(cep).await.unwrap_or_else(CityLookup::Unavailable);

        match &lookup {
            CityLookup::Found(city) => info!("Resolved postal code to {}", city),
            CityLookup::NotFound(reason) => info!("Postal code not found: {:?}", reason),
            CityLookup::Unavailable(e) => warn!("{} lookup failed: {}", SERVICE, e),
        }

        lookup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cep(raw: &str) -> PostalCode {
        PostalCode::parse(raw).unwrap()
    }

    async fn client_for(server: &MockServer) -> ViaCepClient {
        ViaCepClient::new(Client::new(), format!("{}/ws", server.uri()), false)
    }

    #[tokio::test]
    async fn test_resolves_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/01001000/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "01001-000",
                "logradouro": "Praça da Sé",
                "bairro": "Sé",
                "localidade": "São Paulo",
                "uf": "SP"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let lookup = client_for(&server).await.resolve(&cep("01001000")).await;
        assert!(matches!(lookup, CityLookup::Found(ref city) if city == "São Paulo"));
    }

    #[tokio::test]
    async fn test_erro_flag_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/99999999/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"erro": true})))
            .mount(&server)
            .await;

        let lookup = client_for(&server).await.resolve(&cep("99999999")).await;
        assert!(matches!(lookup, CityLookup::NotFound(NotFoundReason::Flagged)));
    }

    #[tokio::test]
    async fn test_erro_flag_as_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"erro": "true"}"#, "application/json"))
            .mount(&server)
            .await;

        let lookup = client_for(&server).await.resolve(&cep("12345678")).await;
        assert!(matches!(lookup, CityLookup::NotFound(NotFoundReason::Flagged)));
    }

    #[tokio::test]
    async fn test_non_200_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"erro": "true"}"#))
            .mount(&server)
            .await;

        let lookup = client_for(&server).await.resolve(&cep("12345678")).await;
        assert!(matches!(lookup, CityLookup::NotFound(NotFoundReason::Status(400))));
    }

    #[tokio::test]
    async fn test_empty_city_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"localidade": ""})))
            .mount(&server)
            .await;

        let lookup = client_for(&server).await.resolve(&cep("12345678")).await;
        assert!(matches!(lookup, CityLookup::NotFound(NotFoundReason::EmptyCity)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let lookup = client_for(&server).await.resolve(&cep("12345678")).await;
        assert!(matches!(
            lookup,
            CityLookup::Unavailable(CepWeatherError::Decode { .. })
        ));
        assert!(matches!(
            lookup.into_result(&cep("12345678")),
            Err(CepWeatherError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_simulated_not_found_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ViaCepClient::new(Client::new(), format!("{}/ws", server.uri()), true);
        let lookup = client.resolve(&cep("01001000")).await;
        assert!(matches!(lookup, CityLookup::NotFound(NotFoundReason::Simulated)));
    }

    /// Base URL of a port that was bound and released, so connects are refused
    fn unreachable_base_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/ws")
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let client = ViaCepClient::new(Client::new(), unreachable_base_url(), false);

        let lookup = client.resolve(&cep("01001000")).await;
        assert!(matches!(
            lookup,
            CityLookup::Unavailable(CepWeatherError::Http { .. })
        ));

        let err = lookup.into_result(&cep("01001000")).unwrap_err();
        assert!(matches!(err, CepWeatherError::NotFound { .. }));
    }

    #[test]
    fn test_lookup_url_trims_trailing_slash() {
        let client = ViaCepClient::new(Client::new(), "https://viacep.com.br/ws/", false);
        assert_eq!(
            client.lookup_url(&cep("01001000")),
            "https://viacep.com.br/ws/01001000/json/"
        );
    }
}
