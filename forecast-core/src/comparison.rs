//! Side-by-side view of several locations' forecasts.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;

use crate::{error::ForecastError, model::ForecastSample};

/// One metric's values for one location, aligned with [`Comparison::timestamps`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub location: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Timestamps present in every input sequence, ascending.
    pub timestamps: Vec<NaiveDateTime>,
    pub temperature: Vec<MetricSeries>,
    pub rainfall: Vec<MetricSeries>,
}

impl Comparison {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.temperature.iter().map(|s| s.location.as_str())
    }
}

/// Inner-join forecasts on timestamp.
///
/// Timestamps missing from any location are dropped, so inputs that are not
/// on the same 3-hour grid can produce a short (or empty) comparison.
pub fn compare(forecasts: &[(String, Vec<ForecastSample>)]) -> Result<Comparison, ForecastError> {
    if forecasts.len() < 2 {
        return Err(ForecastError::NotEnoughLocations(forecasts.len()));
    }

    let mut shared: BTreeSet<NaiveDateTime> =
        forecasts[0].1.iter().map(|s| s.timestamp).collect();
    for (_, samples) in &forecasts[1..] {
        let present: BTreeSet<NaiveDateTime> = samples.iter().map(|s| s.timestamp).collect();
        shared.retain(|ts| present.contains(ts));
    }

    let mut temperature = Vec::with_capacity(forecasts.len());
    let mut rainfall = Vec::with_capacity(forecasts.len());

    for (location, samples) in forecasts {
        // first sample wins if a sequence repeats a timestamp
        let mut by_time: BTreeMap<NaiveDateTime, &ForecastSample> = BTreeMap::new();
        for s in samples {
            by_time.entry(s.timestamp).or_insert(s);
        }
        let ordered: Vec<&ForecastSample> = shared.iter().filter_map(|ts| by_time.get(ts).copied()).collect();

        temperature.push(MetricSeries {
            location: location.clone(),
            values: ordered.iter().map(|s| s.temperature).collect(),
        });
        rainfall.push(MetricSeries {
            location: location.clone(),
            values: ordered.iter().map(|s| s.rainfall_last_3h).collect(),
        });
    }

    tracing::debug!(locations = forecasts.len(), rows = shared.len(), "built comparison");

    Ok(Comparison {
        timestamps: shared.into_iter().collect(),
        temperature,
        rainfall,
    })
}
