//! Core library for the `forecast` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast provider abstraction and its OpenWeather client
//! - Normalization of raw forecast entries into typed samples
//! - Derived metrics, alerts, summaries and multi-location comparison
//! - Unit-system defaults from geolocation, CSV export and session history
//!
//! It is used by `forecast-cli`, but can also be reused by other front ends.

pub mod comparison;
pub mod config;
pub mod error;
pub mod export;
pub mod geolocation;
pub mod history;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod provider;

pub use comparison::{Comparison, MetricSeries};
pub use config::Config;
pub use error::{ForecastError, GeolocationUnavailable, ParseError};
pub use history::SearchHistory;
pub use metrics::{Alert, ForecastSummary};
pub use model::{ForecastReport, ForecastRequest, ForecastSample, RawForecast, UnitSystem};
pub use pipeline::{ComparisonOutcome, ForecastPipeline};
pub use provider::{ForecastProvider, provider_from_config};
