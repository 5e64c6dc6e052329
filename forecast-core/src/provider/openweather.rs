use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{error::ForecastError, model::ForecastRequest, model::RawForecast};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// 5-day / 3-hour forecast client for the OpenWeather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn forecast_url(&self) -> String {
        format!("{}/data/2.5/forecast", self.base_url)
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch_forecast(&self, request: &ForecastRequest) -> Result<RawForecast, ForecastError> {
        let location = request.location.as_str();
        if location.is_empty() {
            return Err(ForecastError::InvalidLocation {
                location: String::new(),
                reason: "no location given".to_string(),
            });
        }

        tracing::debug!(location, units = %request.units, "requesting OpenWeather forecast");

        let res = self
            .http
            .get(self.forecast_url())
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", request.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ForecastError::transport(location, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ForecastError::transport(location, e))?;

        // Outages are transport failures even when they carry a JSON error body.
        if status.is_server_error() {
            let detail = api_message(&body).unwrap_or_else(|| truncate_body(&body));
            return Err(ForecastError::transport(location, format!("status {status}: {detail}")));
        }

        // Anything else but success or 404 (bad key, rate limit, ...) is a
        // rejected request, not an unknown city.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(ForecastError::Rejected {
                location: location.to_string(),
                status: status.as_u16(),
                message: api_message(&body).unwrap_or_else(|| truncate_body(&body)),
            });
        }

        let parsed: Value = serde_json::from_str(&body).map_err(|_| {
            ForecastError::transport(
                location,
                format!("unreadable response with status {status}: {}", truncate_body(&body)),
            )
        })?;

        // A 2xx or 404 body without `list` is how OpenWeather reports an unknown city.
        match parsed.get("list").and_then(Value::as_array) {
            Some(entries) => {
                tracing::debug!(location, entries = entries.len(), "received forecast");
                Ok(RawForecast {
                    entries: entries.clone(),
                })
            }
            None => {
                let reason = message_of(&parsed)
                    .unwrap_or_else(|| format!("response without forecast list, status {status}"));

                Err(ForecastError::InvalidLocation {
                    location: location.to_string(),
                    reason,
                })
            }
        }
    }
}

fn message_of(parsed: &Value) -> Option<String> {
    parsed
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// The `message` field of a JSON error body, if there is one.
fn api_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body).ok().as_ref().and_then(message_of)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let p = OpenWeatherProvider::new("KEY".into(), "http://localhost:1234/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(p.forecast_url(), "http://localhost:1234/data/2.5/forecast");
    }

    #[test]
    fn api_message_reads_json_error_bodies() {
        assert_eq!(
            api_message(r#"{"cod":401,"message":"Invalid API key"}"#).as_deref(),
            Some("Invalid API key")
        );
        assert_eq!(api_message("<html>oops</html>"), None);
        assert_eq!(api_message(r#"{"cod":"500","message":""}"#), None);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
