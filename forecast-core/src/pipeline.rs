use crate::{
    comparison::{Comparison, compare},
    error::ForecastError,
    history::SearchHistory,
    metrics::{ForecastSummary, classify},
    model::{ForecastReport, ForecastRequest, ForecastSample, UnitSystem},
    normalize::normalize,
    provider::ForecastProvider,
};

/// Result of comparing several locations. Failures are kept per location.
#[derive(Debug)]
pub struct ComparisonOutcome {
    pub reports: Vec<ForecastReport>,
    /// `None` when fewer than two locations could be fetched.
    pub comparison: Option<Comparison>,
    pub failures: Vec<(String, ForecastError)>,
}

/// Fetch, normalize and derive. Holds no state besides the provider.
#[derive(Debug)]
pub struct ForecastPipeline {
    provider: Box<dyn ForecastProvider>,
}

impl ForecastPipeline {
    pub fn new(provider: Box<dyn ForecastProvider>) -> Self {
        Self { provider }
    }

    pub async fn report(&self, request: &ForecastRequest) -> Result<ForecastReport, ForecastError> {
        let raw = self.provider.fetch_forecast(request).await?;
        let samples = normalize(&raw.entries)?;
        build_report(&request.location, request.units, samples)
    }

    /// Like [`report`](Self::report), recording the location in `history`
    /// once the lookup succeeded.
    pub async fn search(
        &self,
        request: &ForecastRequest,
        history: &mut SearchHistory,
    ) -> Result<ForecastReport, ForecastError> {
        let report = self.report(request).await?;
        history.add(&request.location);
        Ok(report)
    }

    /// Fetch every location in turn and join the successful ones.
    pub async fn compare(
        &self,
        locations: &[String],
        units: UnitSystem,
    ) -> Result<ComparisonOutcome, ForecastError> {
        if locations.len() < 2 {
            return Err(ForecastError::NotEnoughLocations(locations.len()));
        }

        let mut reports = Vec::with_capacity(locations.len());
        let mut failures = Vec::new();

        for location in locations {
            let request = ForecastRequest::new(location.as_str(), units);
            match self.report(&request).await {
                Ok(report) => reports.push(report),
                Err(err) => {
                    tracing::warn!(location = %request.location, "forecast lookup failed: {err}");
                    failures.push((request.location, err));
                }
            }
        }

        let comparison = if reports.len() >= 2 {
            let series: Vec<(String, Vec<ForecastSample>)> = reports
                .iter()
                .map(|r| (r.location.clone(), r.samples.clone()))
                .collect();
            Some(compare(&series)?)
        } else {
            None
        };

        Ok(ComparisonOutcome {
            reports,
            comparison,
            failures,
        })
    }
}

/// Derive alert and summary for an already normalized sequence.
pub fn build_report(
    location: &str,
    units: UnitSystem,
    samples: Vec<ForecastSample>,
) -> Result<ForecastReport, ForecastError> {
    let current = samples.first().ok_or(ForecastError::EmptyForecast)?;
    let alert = classify(current, units);
    let summary = ForecastSummary::from_samples(&samples).ok_or(ForecastError::EmptyForecast)?;

    Ok(ForecastReport {
        location: location.to_string(),
        units,
        samples,
        alert,
        summary,
    })
}
