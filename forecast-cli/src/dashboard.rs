//! Interactive dashboard session.
//!
//! The session owns the search history; it lives until the user quits and
//! every failed lookup is reported without ending the session.

use std::fmt;

use anyhow::Context;
use forecast_core::{
    ForecastPipeline, ForecastReport, ForecastRequest, SearchHistory, UnitSystem, export,
};
use inquire::{Confirm, InquireError, Select, Text};

use crate::output;

const DEFAULT_LOCATION: &str = "Delhi,IN";

#[derive(Debug, Clone, PartialEq)]
enum MenuChoice {
    Recent(String),
    NewSearch,
    Compare,
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::Recent(location) => write!(f, "{location}"),
            MenuChoice::NewSearch => f.write_str("Search a new location..."),
            MenuChoice::Compare => f.write_str("Compare locations..."),
            MenuChoice::Quit => f.write_str("Quit"),
        }
    }
}

fn menu(history: &SearchHistory) -> Vec<MenuChoice> {
    let mut choices = vec![MenuChoice::NewSearch];
    choices.extend(history.entries().map(|l| MenuChoice::Recent(l.to_string())));
    choices.push(MenuChoice::Compare);
    choices.push(MenuChoice::Quit);
    choices
}

/// Split `"Delhi,IN; London,GB"` into locations. `;` separates, since
/// locations themselves contain commas.
fn parse_location_list(input: &str) -> Vec<String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn run(pipeline: &ForecastPipeline, units: UnitSystem) -> anyhow::Result<()> {
    let mut history = SearchHistory::new();
    println!("Forecast dashboard ({units} units). Press Esc to quit.\n");

    loop {
        let choice = match Select::new("What next?", menu(&history)).prompt() {
            Ok(choice) => choice,
            Err(err) if is_cancel(&err) => break,
            Err(err) => return Err(err).context("Menu prompt failed"),
        };

        match choice {
            MenuChoice::Quit => break,
            MenuChoice::Recent(location) => show(pipeline, &location, units, &mut history).await?,
            MenuChoice::NewSearch => {
                let Some(location) = ask("Enter a city (City,CountryCode):", DEFAULT_LOCATION)? else {
                    continue;
                };
                show(pipeline, &location, units, &mut history).await?;
            }
            MenuChoice::Compare => {
                let Some(input) = ask("Locations separated by ';':", "Delhi,IN; London,GB")? else {
                    continue;
                };
                match pipeline.compare(&parse_location_list(&input), units).await {
                    Ok(outcome) => output::print_comparison(&outcome, units),
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
        println!();
    }

    history.clear();
    Ok(())
}

/// Esc and Ctrl-C both abandon the current prompt.
fn is_cancel(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}

/// `None` when the user cancels the prompt.
fn ask(message: &str, default: &str) -> anyhow::Result<Option<String>> {
    match Text::new(message).with_default(default).prompt() {
        Ok(text) => Ok(Some(text)),
        Err(err) if is_cancel(&err) => Ok(None),
        Err(err) => Err(err).context("Location prompt failed"),
    }
}

async fn show(
    pipeline: &ForecastPipeline,
    location: &str,
    units: UnitSystem,
    history: &mut SearchHistory,
) -> anyhow::Result<()> {
    let request = ForecastRequest::new(location, units);
    match pipeline.search(&request, history).await {
        Ok(report) => {
            output::print_report(&report);
            offer_export(&report)?;
        }
        Err(err) => eprintln!("{err}"),
    }
    Ok(())
}

fn offer_export(report: &ForecastReport) -> anyhow::Result<()> {
    let file_name = export::export_file_name(&report.location);
    let wanted = match Confirm::new(&format!("Save as {file_name}?")).with_default(false).prompt() {
        Ok(wanted) => wanted,
        Err(err) if is_cancel(&err) => false,
        Err(err) => return Err(err).context("Export prompt failed"),
    };

    if wanted {
        let dir = std::env::current_dir().context("Failed to resolve current directory")?;
        match export::write_csv(&dir, &report.location, &report.samples) {
            Ok(path) => println!("Saved {}", path.display()),
            Err(err) => eprintln!("{err:#}"),
        }
    }
    Ok(())
}
