//! Turns raw OpenWeather `list` entries into ordered [`ForecastSample`]s.
//!
//! Decoding is fail-fast: the first entry that lacks a required field, or
//! carries an out-of-range value, rejects the whole batch.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::ForecastError,
    model::{ForecastSample, parse_timestamp},
};

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: OwClouds,
    rain: Option<OwRain>,
}

/// Normalize raw entries into samples sorted by ascending timestamp.
///
/// Entries sharing a timestamp keep the first occurrence.
pub fn normalize(entries: &[Value]) -> Result<Vec<ForecastSample>, ForecastError> {
    if entries.is_empty() {
        return Err(ForecastError::EmptyForecast);
    }

    let mut samples = entries
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_entry(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    // Stable sort, so `dedup_by_key` keeps the entry that came first.
    samples.sort_by_key(|s| s.timestamp);
    let before = samples.len();
    samples.dedup_by_key(|s| s.timestamp);
    if samples.len() != before {
        tracing::debug!(dropped = before - samples.len(), "dropped duplicate forecast timestamps");
    }

    Ok(samples)
}

fn normalize_entry(index: usize, raw: &Value) -> Result<ForecastSample, ForecastError> {
    let malformed = |reason: String| ForecastError::MalformedEntry { index, reason };

    let entry = OwForecastEntry::deserialize(raw).map_err(|e| malformed(e.to_string()))?;

    let timestamp = parse_timestamp(&entry.dt_txt).map_err(|e| malformed(e.to_string()))?;

    let description = entry
        .weather
        .first()
        .map(|w| title_case(&w.description))
        .ok_or_else(|| malformed("no weather condition".to_string()))?;

    let rainfall = entry.rain.and_then(|r| r.three_hours).unwrap_or(0.0);

    if entry.main.humidity > 100 {
        return Err(malformed(format!("humidity {} exceeds 100%", entry.main.humidity)));
    }
    if entry.clouds.all > 100 {
        return Err(malformed(format!("cloudiness {} exceeds 100%", entry.clouds.all)));
    }
    if entry.wind.speed.is_nan() || entry.wind.speed < 0.0 {
        return Err(malformed(format!("invalid wind speed {}", entry.wind.speed)));
    }
    if rainfall.is_nan() || rainfall < 0.0 {
        return Err(malformed(format!("invalid rainfall {rainfall}")));
    }

    Ok(ForecastSample {
        timestamp,
        temperature: entry.main.temp,
        feels_like_temperature: entry.main.feels_like,
        humidity: entry.main.humidity,
        cloudiness: entry.clouds.all,
        wind_speed: entry.wind.speed,
        weather_description: description,
        rainfall_last_3h: rainfall,
    })
}

/// Capitalize every whitespace-separated word ("light rain" -> "Light Rain").
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(dt: &str, temp: f64, humidity: u8) -> Value {
        json!({
            "dt": 0,
            "dt_txt": dt,
            "main": { "temp": temp, "feels_like": temp - 1.0, "humidity": humidity, "pressure": 1012 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky" }],
            "clouds": { "all": 5 },
            "wind": { "speed": 3.2, "deg": 180 }
        })
    }

    #[test]
    fn missing_rain_defaults_to_zero() {
        let samples = normalize(&[entry("2024-01-01 00:00:00", 20.0, 50)]).unwrap();
        assert_eq!(samples[0].rainfall_last_3h, 0.0);
    }

    #[test]
    fn rain_without_three_hour_key_defaults_to_zero() {
        let mut raw = entry("2024-01-01 00:00:00", 20.0, 50);
        raw["rain"] = json!({ "1h": 0.4 });

        let samples = normalize(&[raw]).unwrap();
        assert_eq!(samples[0].rainfall_last_3h, 0.0);
    }

    #[test]
    fn reads_three_hour_rain() {
        let mut raw = entry("2024-01-01 00:00:00", 20.0, 50);
        raw["rain"] = json!({ "3h": 4.75 });

        let samples = normalize(&[raw]).unwrap();
        assert_eq!(samples[0].rainfall_last_3h, 4.75);
    }

    #[test]
    fn maps_all_fields() {
        let samples = normalize(&[entry("2024-01-01 06:00:00", 12.5, 81)]).unwrap();
        let s = &samples[0];

        assert_eq!(s.timestamp, parse_timestamp("2024-01-01 06:00:00").unwrap());
        assert_eq!(s.temperature, 12.5);
        assert_eq!(s.feels_like_temperature, 11.5);
        assert_eq!(s.humidity, 81);
        assert_eq!(s.cloudiness, 5);
        assert_eq!(s.wind_speed, 3.2);
        assert_eq!(s.weather_description, "Clear Sky");
    }

    #[test]
    fn output_is_strictly_increasing() {
        let raw = vec![
            entry("2024-01-01 06:00:00", 3.0, 10),
            entry("2024-01-01 00:00:00", 1.0, 10),
            entry("2024-01-01 03:00:00", 2.0, 10),
            entry("2024-01-01 03:00:00", 99.0, 10),
        ];

        let samples = normalize(&raw).unwrap();

        assert_eq!(samples.len(), 3);
        assert!(samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(samples[1].temperature, 2.0);
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(normalize(&[]), Err(ForecastError::EmptyForecast)));
    }

    #[test]
    fn missing_main_fails_fast_with_index() {
        let mut bad = entry("2024-01-01 03:00:00", 2.0, 10);
        bad.as_object_mut().unwrap().remove("main");

        let err = normalize(&[entry("2024-01-01 00:00:00", 1.0, 10), bad]).unwrap_err();
        assert!(matches!(err, ForecastError::MalformedEntry { index: 1, .. }));
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let err = normalize(&[entry("01/01/2024 00:00", 1.0, 10)]).unwrap_err();
        match err {
            ForecastError::MalformedEntry { index, reason } => {
                assert_eq!(index, 0);
                assert!(reason.contains("YYYY-MM-DD HH:MM:SS"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_weather_array_is_malformed() {
        let mut bad = entry("2024-01-01 00:00:00", 1.0, 10);
        bad["weather"] = json!([]);

        assert!(matches!(normalize(&[bad]), Err(ForecastError::MalformedEntry { .. })));
    }

    #[test]
    fn out_of_range_values_are_malformed() {
        let mut humid = entry("2024-01-01 00:00:00", 1.0, 10);
        humid["main"]["humidity"] = json!(140);
        assert!(normalize(&[humid]).is_err());

        let mut windy = entry("2024-01-01 00:00:00", 1.0, 10);
        windy["wind"]["speed"] = json!(-2.0);
        assert!(normalize(&[windy]).is_err());
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("OVERCAST clouds"), "Overcast Clouds");
        assert_eq!(title_case(""), "");
    }
}
