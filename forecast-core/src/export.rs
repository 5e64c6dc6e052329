//! CSV export of a normalized forecast table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::ForecastSample;

/// File name offered for a location's export, e.g. `Delhi,IN_forecast.csv`.
pub fn export_file_name(location: &str) -> String {
    let safe: String = location
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}_forecast.csv")
}

/// Serialize samples as UTF-8 CSV with a header row of field names.
pub fn to_csv(samples: &[ForecastSample]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for sample in samples {
        writer.serialize(sample).context("Failed to serialize forecast row")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Parse CSV produced by [`to_csv`] back into samples.
pub fn read_csv(text: &str) -> Result<Vec<ForecastSample>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Failed to parse CSV row {}", i + 1)))
        .collect()
}

/// Write the export into `dir`, returning the full path written.
pub fn write_csv(dir: &Path, location: &str, samples: &[ForecastSample]) -> Result<PathBuf> {
    let path = dir.join(export_file_name(location));
    let csv = to_csv(samples)?;

    std::fs::write(&path, csv)
        .with_context(|| format!("Failed to write forecast export: {}", path.display()))?;

    tracing::debug!(path = %path.display(), rows = samples.len(), "wrote forecast export");
    Ok(path)
}
