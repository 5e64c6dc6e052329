//! Default unit system from the caller's region.
//!
//! The region comes from an IP lookup service; any failure there is
//! non-fatal and resolves to metric.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::GeolocationUnavailable, model::UnitSystem};

pub const DEFAULT_IPINFO_URL: &str = "https://ipinfo.io";

const IMPERIAL_REGIONS: &[&str] = &["US", "BS", "BZ", "KY", "PW"];

/// Default unit system for an ISO 3166 alpha-2 region code.
pub fn unit_system_for_region(region: &str) -> UnitSystem {
    let region = region.trim();
    if IMPERIAL_REGIONS.iter().any(|r| r.eq_ignore_ascii_case(region)) {
        UnitSystem::Imperial
    } else {
        UnitSystem::Metric
    }
}

/// Resolves the caller's region code.
#[async_trait]
pub trait RegionLocator: Send + Sync {
    async fn region_code(&self) -> Result<String, GeolocationUnavailable>;
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    country: Option<String>,
}

/// Region lookup through ipinfo.io's `/json` endpoint.
#[derive(Debug, Clone)]
pub struct IpInfoLocator {
    base_url: String,
    http: Client,
}

impl IpInfoLocator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeolocationUnavailable> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeolocationUnavailable(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl RegionLocator for IpInfoLocator {
    async fn region_code(&self) -> Result<String, GeolocationUnavailable> {
        let url = format!("{}/json", self.base_url);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GeolocationUnavailable(e.to_string()))?;

        if !res.status().is_success() {
            return Err(GeolocationUnavailable(format!(
                "lookup returned status {}",
                res.status()
            )));
        }

        let body: IpInfoResponse = res
            .json()
            .await
            .map_err(|e| GeolocationUnavailable(e.to_string()))?;

        body.country
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| GeolocationUnavailable("lookup returned no country".to_string()))
    }
}

/// Unit system for the caller's region, metric when the lookup fails.
pub async fn default_unit_system(locator: &dyn RegionLocator) -> UnitSystem {
    match locator.region_code().await {
        Ok(region) => {
            let units = unit_system_for_region(&region);
            tracing::debug!(%region, %units, "resolved default unit system");
            units
        }
        Err(err) => {
            tracing::warn!("{err}; falling back to metric units");
            UnitSystem::Metric
        }
    }
}
