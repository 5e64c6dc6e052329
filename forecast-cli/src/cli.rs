use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, ForecastPipeline, ForecastRequest, UnitSystem, export,
    geolocation::{self, DEFAULT_IPINFO_URL, IpInfoLocator},
    provider_from_config,
};
use inquire::{Password, PasswordDisplayMode, Select};

use crate::{dashboard, output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "5-day weather forecast dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default unit system.
    Configure,

    /// Show the forecast, alert and summary for one location.
    Show {
        /// Location as City,CountryCode, e.g. "Delhi,IN".
        location: String,

        /// "metric" or "imperial"; defaults to config, then to your region.
        #[arg(long)]
        units: Option<UnitSystem>,

        /// Write `<location>_forecast.csv` into this directory.
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },

    /// Compare temperature and rainfall across locations.
    Compare {
        #[arg(required = true, num_args = 2..)]
        locations: Vec<String>,

        #[arg(long)]
        units: Option<UnitSystem>,
    },

    /// Interactive session with search history.
    Dashboard {
        #[arg(long)]
        units: Option<UnitSystem>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                location,
                units,
                export: export_dir,
            } => {
                let config = Config::load()?;
                let pipeline = ForecastPipeline::new(provider_from_config(&config)?);
                let units = resolve_units(units, &config).await;

                let report = pipeline.report(&ForecastRequest::new(location, units)).await?;
                output::print_report(&report);

                if let Some(dir) = export_dir {
                    let path = export::write_csv(&dir, &report.location, &report.samples)?;
                    println!("\nExported forecast to {}", path.display());
                }
                Ok(())
            }
            Command::Compare { locations, units } => {
                let config = Config::load()?;
                let pipeline = ForecastPipeline::new(provider_from_config(&config)?);
                let units = resolve_units(units, &config).await;

                let outcome = pipeline.compare(&locations, units).await?;
                output::print_comparison(&outcome, units);
                Ok(())
            }
            Command::Dashboard { units } => {
                let config = Config::load()?;
                let pipeline = ForecastPipeline::new(provider_from_config(&config)?);
                let units = resolve_units(units, &config).await;

                dashboard::run(&pipeline, units).await
            }
        }
    }
}

/// Explicit flag, then configured default, then the caller's region.
async fn resolve_units(flag: Option<UnitSystem>, config: &Config) -> UnitSystem {
    if let Some(units) = flag.or(config.units) {
        return units;
    }

    match IpInfoLocator::new(DEFAULT_IPINFO_URL, config.request_timeout()) {
        Ok(locator) => geolocation::default_unit_system(&locator).await,
        Err(err) => {
            tracing::warn!("{err}; falling back to metric units");
            UnitSystem::Metric
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt aborted")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let units = Select::new(
        "Default unit system:",
        vec!["auto (from your region)", "metric", "imperial"],
    )
    .prompt()
    .context("Unit system prompt aborted")?;
    config.units = UnitSystem::try_from(units).ok();

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
