//! Derived metrics, alert classification and the plain-text summary.
//!
//! Everything here is a pure function of the samples and the unit system.

use crate::model::{ForecastSample, UnitSystem};

const FLOOD_RAINFALL_MM: f64 = 20.0;
const HEATWAVE_CELSIUS: f64 = 35.0;
const COLD_WAVE_CELSIUS: f64 = 10.0;

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `temperature + 0.1 * humidity`, rounded to one decimal.
pub fn comfort_index(sample: &ForecastSample) -> f64 {
    round_to(sample.temperature + 0.1 * f64::from(sample.humidity), 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    FloodRisk,
    HeatwaveRisk,
    ColdWaveRisk,
    Normal,
}

impl Alert {
    pub fn label(&self) -> &'static str {
        match self {
            Alert::FloodRisk => "flood risk",
            Alert::HeatwaveRisk => "heatwave risk",
            Alert::ColdWaveRisk => "cold-wave risk",
            Alert::Normal => "normal",
        }
    }

    pub fn is_warning(&self) -> bool {
        !matches!(self, Alert::Normal)
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify one sample. Rules are checked in order and the first match wins.
///
/// Thermal thresholds are Celsius values, so no heat or cold alert is ever
/// raised for imperial units.
pub fn classify(sample: &ForecastSample, units: UnitSystem) -> Alert {
    let metric = units == UnitSystem::Metric;

    if sample.rainfall_last_3h > FLOOD_RAINFALL_MM {
        Alert::FloodRisk
    } else if metric && sample.temperature > HEATWAVE_CELSIUS {
        Alert::HeatwaveRisk
    } else if metric && sample.temperature < COLD_WAVE_CELSIUS {
        Alert::ColdWaveRisk
    } else {
        Alert::Normal
    }
}

/// Aggregates over a whole forecast sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSummary {
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Rounded to one decimal.
    pub mean_temperature: f64,
    /// Rounded to a whole percent.
    pub mean_humidity: f64,
    /// Full weekday names of days with rain, distinct, in order of first appearance.
    pub rainy_days: Vec<String>,
}

impl ForecastSummary {
    /// Returns `None` for an empty slice.
    pub fn from_samples(samples: &[ForecastSample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len() as f64;
        let mut min_temperature = f64::INFINITY;
        let mut max_temperature = f64::NEG_INFINITY;
        let mut temperature_sum = 0.0;
        let mut humidity_sum = 0.0;
        let mut rainy_days = Vec::new();

        for s in samples {
            min_temperature = min_temperature.min(s.temperature);
            max_temperature = max_temperature.max(s.temperature);
            temperature_sum += s.temperature;
            humidity_sum += f64::from(s.humidity);

            if s.rainfall_last_3h > 0.0 {
                let day = s.timestamp.format("%A").to_string();
                if !rainy_days.contains(&day) {
                    rainy_days.push(day);
                }
            }
        }

        Some(Self {
            min_temperature,
            max_temperature,
            mean_temperature: round_to(temperature_sum / count, 1),
            mean_humidity: round_to(humidity_sum / count, 0),
            rainy_days,
        })
    }

    /// Human-readable summary, e.g.
    /// "Average temperature 34.7°C with 28% humidity. Rain expected on Monday."
    pub fn describe(&self, units: UnitSystem) -> String {
        let rain = match self.rainy_days.as_slice() {
            [] => "Mostly dry.".to_string(),
            [only] => format!("Rain expected on {only}."),
            [init @ .., last] => format!("Rain expected on {} and {last}.", init.join(", ")),
        };

        format!(
            "Average temperature {:.1}{} with {:.0}% humidity. {rain}",
            self.mean_temperature,
            units.temperature_symbol(),
            self.mean_humidity,
        )
    }
}
