//! Command-line interface.
//!
//! One positional date argument and an output-format flag; anything else
//! is rejected with a usage error before any network traffic.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

/// Output format for the rendered schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain indented text, one line per agenda item.
    #[default]
    Text,
    /// Pretty-printed JSON mirroring the schedule structure.
    Json,
}

/// Fetches the first plan after the provided date and its related data.
#[derive(Debug, Parser)]
#[command(name = "planorder", version, about)]
pub struct Cli {
    /// Date in YYYY-MM-DD format used for the Planning Center 'after' filter
    #[arg(value_parser = parse_after_date)]
    pub after_date: NaiveDate,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Ensure the provided value matches YYYY-MM-DD.
fn parse_after_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| String::from("Date must be in YYYY-MM-DD format"))
}
