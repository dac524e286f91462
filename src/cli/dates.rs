use std::fmt::Display;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::utils::time::record_name_to_date;

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct DateArgs {
    #[arg(
        long,
        short,
        help = "Day to use. Examples are \"yesterday\", \"2026-03-14\", \"14/03/2026\", \"last friday\". Defaults to today"
    )]
    pub date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    pub date_style: DateStyle,
}

impl DateArgs {
    pub fn resolve(&self, today: NaiveDate) -> Result<NaiveDate> {
        match &self.date {
            Some(input) => parse_day(input, today, self.date_style),
            None => Ok(today),
        }
    }
}

/// Resolves an ISO date or a natural expression relative to `today`.
pub fn parse_day(input: &str, today: NaiveDate, style: DateStyle) -> Result<NaiveDate> {
    if let Some(date) = record_name_to_date(input.trim()) {
        return Ok(date);
    }
    // Noon keeps "yesterday"/"tomorrow" on the intended day whatever the offset handling.
    let reference = today
        .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
        .and_utc();
    match parse_date_string(input, reference, style.into()) {
        Ok(v) => Ok(v.with_timezone(&Utc).date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {input:?}: {e}"),
            )
            .into()),
    }
}
