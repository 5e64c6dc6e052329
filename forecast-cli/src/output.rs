//! Plain-text rendering of reports and comparisons.

use forecast_core::{
    ComparisonOutcome, ForecastReport, ForecastSample, UnitSystem, metrics::comfort_index,
};

const TIME_FORMAT: &str = "%a %d %b %H:%M";

pub fn print_report(report: &ForecastReport) {
    print!("{}", render_report(report));
}

pub fn print_comparison(outcome: &ComparisonOutcome, units: UnitSystem) {
    print!("{}", render_comparison(outcome, units));
}

pub fn render_report(report: &ForecastReport) -> String {
    let units = report.units;
    let t = units.temperature_symbol();
    let Some(now) = report.current() else {
        return format!("No forecast data for {}\n", report.location);
    };

    let mut out = format!(
        "Current conditions in {} ({})\n",
        report.location,
        now.timestamp.format(TIME_FORMAT)
    );
    out.push_str(&format!(
        "  Temperature    {:.1}{t} (feels like {:.1}{t})\n",
        now.temperature, now.feels_like_temperature
    ));
    out.push_str(&format!("  Conditions     {}\n", now.weather_description));
    out.push_str(&format!("  Humidity       {}%\n", now.humidity));
    out.push_str(&format!("  Cloudiness     {}%\n", now.cloudiness));
    out.push_str(&format!("  Wind           {:.1} {}\n", now.wind_speed, units.speed_symbol()));
    out.push_str(&format!("  Comfort index  {:.1}\n", comfort_index(now)));

    let marker = if report.alert.is_warning() { "!" } else { "-" };
    out.push_str(&format!("  Alert          {marker} {}\n\n", report.alert));

    out.push_str(&format!(
        "Range {:.1}{t} .. {:.1}{t}. {}\n\n",
        report.summary.min_temperature,
        report.summary.max_temperature,
        report.summary.describe(units)
    ));

    out.push_str("Forecast (every 3 hours)\n");
    for sample in &report.samples {
        out.push_str(&render_row(sample, units));
    }
    out
}

fn render_row(sample: &ForecastSample, units: UnitSystem) -> String {
    format!(
        "  {:<16} {:>6.1}{} {:>4}% {:>5.1} {} {:>5.1} mm  {}\n",
        sample.timestamp.format(TIME_FORMAT).to_string(),
        sample.temperature,
        units.temperature_symbol(),
        sample.humidity,
        sample.wind_speed,
        units.speed_symbol(),
        sample.rainfall_last_3h,
        sample.weather_description
    )
}

pub fn render_comparison(outcome: &ComparisonOutcome, units: UnitSystem) -> String {
    let mut out = String::new();

    for (location, err) in &outcome.failures {
        out.push_str(&format!("Skipped {location}: {err}\n"));
    }

    let Some(cmp) = &outcome.comparison else {
        out.push_str("Not enough locations could be fetched to compare.\n");
        return out;
    };

    if cmp.is_empty() {
        out.push_str("The forecasts share no timestamps.\n");
        return out;
    }

    let t = units.temperature_symbol();
    for (title, series, suffix) in [
        ("Temperature", &cmp.temperature, t),
        ("Rainfall (3h)", &cmp.rainfall, " mm"),
    ] {
        out.push_str(&format!("\n{title}\n  {:<16}", "time"));
        for s in series {
            out.push_str(&format!(" {:>14}", s.location));
        }
        out.push('\n');

        for (row, ts) in cmp.timestamps.iter().enumerate() {
            out.push_str(&format!("  {:<16}", ts.format(TIME_FORMAT).to_string()));
            for s in series {
                out.push_str(&format!(" {:>14}", format!("{:.1}{suffix}", s.values[row])));
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::{
        ForecastError, comparison::compare, model::parse_timestamp, pipeline::build_report,
    };

    fn sample(ts: &str, temperature: f64, rain: f64) -> ForecastSample {
        ForecastSample {
            timestamp: parse_timestamp(ts).unwrap(),
            temperature,
            feels_like_temperature: temperature - 1.0,
            humidity: 40,
            cloudiness: 10,
            wind_speed: 2.0,
            weather_description: "Clear Sky".into(),
            rainfall_last_3h: rain,
        }
    }

    #[test]
    fn report_shows_alert_and_summary() {
        let report = build_report(
            "Delhi,IN",
            UnitSystem::Metric,
            vec![
                sample("2024-01-01 00:00:00", 38.0, 0.0),
                sample("2024-01-01 03:00:00", 30.0, 2.0),
            ],
        )
        .unwrap();

        let text = render_report(&report);
        assert!(text.contains("Current conditions in Delhi,IN"));
        assert!(text.contains("! heatwave risk"));
        assert!(text.contains("Rain expected on Monday."));
        assert!(text.contains("Comfort index  42.0"));
        assert_eq!(text.lines().filter(|l| l.contains("Clear Sky")).count(), 3);
    }

    #[test]
    fn report_without_samples_renders_notice() {
        let mut report = build_report(
            "Delhi,IN",
            UnitSystem::Metric,
            vec![sample("2024-01-01 00:00:00", 20.0, 0.0)],
        )
        .unwrap();
        report.samples.clear();

        assert_eq!(render_report(&report), "No forecast data for Delhi,IN\n");
    }

    #[test]
    fn comparison_lists_failures_and_rows() {
        let a = vec![sample("2024-01-01 00:00:00", 20.0, 0.0), sample("2024-01-01 03:00:00", 21.0, 0.5)];
        let b = vec![sample("2024-01-01 03:00:00", 5.0, 1.0)];
        let outcome = ComparisonOutcome {
            reports: Vec::new(),
            comparison: Some(compare(&[("Delhi,IN".into(), a), ("London,GB".into(), b)]).unwrap()),
            failures: vec![("Atlantis".into(), ForecastError::EmptyForecast)],
        };

        let text = render_comparison(&outcome, UnitSystem::Metric);
        assert!(text.starts_with("Skipped Atlantis"));
        assert!(text.contains("21.0°C"));
        assert!(text.contains("1.0 mm"));
    }

    #[test]
    fn comparison_without_data_says_so() {
        let outcome = ComparisonOutcome {
            reports: Vec::new(),
            comparison: None,
            failures: Vec::new(),
        };

        assert!(render_comparison(&outcome, UnitSystem::Metric).contains("Not enough locations"));
    }
}
