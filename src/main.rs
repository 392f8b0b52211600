use anyhow::{Context, Result};
use cep_weather::{ServiceConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env().context("Failed to load configuration")?;
    telemetry::init(&config.logging);

    if config.test_mode {
        tracing::info!("Starting in test mode");
    }
    if config.simulate_cep_not_found {
        tracing::warn!("Every postal code lookup will report not found");
    }
    if !config.test_mode && config.weather.api_key.is_none() {
        tracing::warn!("WEATHER_API_KEY not set, temperature lookups will fail");
    }

    web::run(&config).await.context("Web server failed")?;
    Ok(())
}
