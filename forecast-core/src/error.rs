use thiserror::Error;

/// Failure of a single forecast lookup or of an operation over its samples.
///
/// Every variant is recoverable from the caller's point of view: a failed
/// lookup for one location never invalidates the session or other locations.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The weather API could not be reached or its answer could not be read.
    #[error("Weather service unreachable for '{location}': {message}")]
    Transport { location: String, message: String },

    /// The API answered, but without a forecast `list`.
    #[error(
        "Could not fetch forecast for '{location}' ({reason}). \
         Try again with City,CountryCode (e.g. Delhi,IN)"
    )]
    InvalidLocation { location: String, reason: String },

    /// The API refused the request for a reason other than the location,
    /// e.g. a bad API key or rate limiting.
    #[error("Weather service rejected the request for '{location}' (status {status}): {message}")]
    Rejected {
        location: String,
        status: u16,
        message: String,
    },

    /// A forecast entry is missing a required field or carries a bad value.
    #[error("Forecast entry #{index} is malformed: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("Forecast response contained no entries")]
    EmptyForecast,

    #[error("Comparison needs at least 2 locations, got {0}")]
    NotEnoughLocations(usize),
}

impl ForecastError {
    pub(crate) fn transport(location: &str, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            location: location.to_string(),
            message: err.to_string(),
        }
    }
}

/// A timestamp string that does not follow `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Error)]
#[error("Invalid timestamp '{input}': expected YYYY-MM-DD HH:MM:SS")]
pub struct ParseError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

/// The caller's region could not be determined; callers fall back to metric.
#[derive(Debug, Error)]
#[error("Geolocation unavailable: {0}")]
pub struct GeolocationUnavailable(pub String);
