use crate::{
    Config, ForecastRequest, RawForecast, error::ForecastError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of raw forecast entries for a location.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, request: &ForecastRequest) -> Result<RawForecast, ForecastError>;
}

/// Construct the OpenWeather provider from config (API key env var included).
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    build_provider(config, config.api_key())
}

fn build_provider(
    config: &Config,
    api_key: Option<String>,
) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let api_key = api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `forecast configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key, config.base_url(), config.request_timeout())?;
    Ok(Box::new(provider))
}
