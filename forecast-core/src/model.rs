use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{error::ParseError, metrics::Alert, metrics::ForecastSummary};

/// Fixed timestamp layout used by the API's `dt_txt` field and by CSV exports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a timestamp in the API's `YYYY-MM-DD HH:MM:SS` layout.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT).map_err(|source| ParseError {
        input: input.to_string(),
        source,
    })
}

/// Measurement family requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported unit systems: metric, imperial."
            )),
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitSystem::try_from(s)
    }
}

#[derive(Debug, Clone)]
pub struct ForecastRequest {
    /// Free-form location, expected as `City,CountryCode`.
    pub location: String,
    pub units: UnitSystem,
}

impl ForecastRequest {
    pub fn new(location: impl Into<String>, units: UnitSystem) -> Self {
        Self {
            location: location.into().trim().to_string(),
            units,
        }
    }
}

/// Undecoded forecast entries as returned by a provider.
#[derive(Debug, Clone, Default)]
pub struct RawForecast {
    pub entries: Vec<serde_json::Value>,
}

/// One 3-hour forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    #[serde(with = "timestamp_text")]
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub feels_like_temperature: f64,
    pub humidity: u8,
    pub cloudiness: u8,
    pub wind_speed: f64,
    pub weather_description: String,
    pub rainfall_last_3h: f64,
}

/// Everything derived from one successful lookup.
#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub location: String,
    pub units: UnitSystem,
    /// Ascending by timestamp; non-empty when built by `build_report`.
    pub samples: Vec<ForecastSample>,
    pub alert: Alert,
    pub summary: ForecastSummary,
}

impl ForecastReport {
    /// The first sample, i.e. current conditions. `None` only for a report
    /// assembled by hand without samples.
    pub fn current(&self) -> Option<&ForecastSample> {
        self.samples.first()
    }
}

mod timestamp_text {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{TIMESTAMP_FORMAT, parse_timestamp};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_system_as_str_roundtrip() {
        for units in UnitSystem::all() {
            let parsed = UnitSystem::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn unit_system_parse_is_case_insensitive() {
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert_eq!(" METRIC ".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
    }

    #[test]
    fn unknown_unit_system_error() {
        let err = UnitSystem::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn parses_api_timestamp() {
        let ts = parse_timestamp("2024-01-01 03:00:00").unwrap();
        assert_eq!(ts.to_string(), "2024-01-01 03:00:00");
    }

    #[test]
    fn rejects_iso_timestamp() {
        let err = parse_timestamp("2024-01-01T03:00:00").unwrap_err();
        assert_eq!(err.input, "2024-01-01T03:00:00");
    }

    #[test]
    fn report_without_samples_has_no_current() {
        let report = ForecastReport {
            location: "Delhi,IN".into(),
            units: UnitSystem::Metric,
            samples: Vec::new(),
            alert: Alert::Normal,
            summary: ForecastSummary {
                min_temperature: 0.0,
                max_temperature: 0.0,
                mean_temperature: 0.0,
                mean_humidity: 0.0,
                rainy_days: Vec::new(),
            },
        };

        assert!(report.current().is_none());
    }

    #[test]
    fn request_trims_location() {
        let req = ForecastRequest::new("  Delhi,IN ", UnitSystem::Metric);
        assert_eq!(req.location, "Delhi,IN");
    }
}
