use std::fmt::Display;

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};
use tracing::info;

use crate::{
    plot,
    storage::tracker_storage::TrackerStorage,
    utils::time::{format_day, parse_day},
};

use super::{confirm::Confirmer, Args};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
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
pub struct DateInput {
    #[arg(
        long = "date",
        help = "Day the value belongs to. Examples are \"2025-03-15\", \"15/03/2025\", \"yesterday\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

impl DateInput {
    /// Resolves the argument to a calendar day, defaulting to today. The
    /// canonical YYYY-MM-DD form is tried first since chrono-english has its
    /// own opinion about dashed dates.
    fn resolve(&self) -> Result<NaiveDate> {
        let Some(raw) = &self.date else {
            return Ok(Local::now().date_naive());
        };
        if let Ok(day) = parse_day(raw) {
            return Ok(day);
        }
        match parse_date_string(raw, Local::now(), self.date_style.into()) {
            Ok(v) => Ok(v.date_naive()),
            Err(e) => Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate date {raw:?}: {e}"),
                )
                .into()),
        }
    }
}

/// Tracker names double as record file names, so anything that can't be a
/// plain file name is rejected before it reaches storage.
pub fn validate_tracker_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Invalid tracker name {name:?}"),
            )
            .into());
    }
    Ok(())
}

/// Upserts a value onto `(tracker, day)`. A tracker that doesn't exist yet is
/// only created after the user types its name back; a mismatch is a hard
/// error and nothing is written.
pub async fn process_update_command(
    storage: &impl TrackerStorage,
    confirmer: &mut impl Confirmer,
    tracker: &str,
    value: f64,
    date: DateInput,
) -> Result<()> {
    validate_tracker_name(tracker)?;
    let day = date.resolve()?;

    if !storage.tracker_exists(tracker).await? {
        let answer = confirmer.confirm(&format!(
            "Tracker '{tracker}' doesn't exist yet. Type its name back to create it: "
        ))?;
        if answer != tracker {
            bail!("Confirmation didn't match, tracker '{tracker}' was not created");
        }
    }

    storage.upsert(tracker, day, value).await?;
    info!("Updated {tracker} on {} by {value}", format_day(day));
    println!("Added {value} to '{tracker}' on {}", format_day(day));
    Ok(())
}

pub async fn process_list_command(storage: &impl TrackerStorage) -> Result<()> {
    let names = storage.list_tracker_names().await?;
    if names.is_empty() {
        println!("No trackers yet");
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

pub async fn process_show_command(storage: &impl TrackerStorage, tracker: &str) -> Result<()> {
    validate_tracker_name(tracker)?;
    if !storage.tracker_exists(tracker).await? {
        bail!("Unknown tracker '{tracker}'");
    }

    let mut records = storage.fetch_records(tracker).await?;
    records.sort_by_key(|record| record.day);

    println!("{:<12} {:>12}", "Day", "Value");
    for record in records {
        println!("{:<12} {:>12.2}", format_day(record.day), record.value);
    }
    Ok(())
}

/// Deletes a tracker after the user types its name back. Unlike creation, a
/// mismatch here is a cancellation, not an error.
pub async fn process_delete_command(
    storage: &impl TrackerStorage,
    confirmer: &mut impl Confirmer,
    tracker: &str,
) -> Result<()> {
    validate_tracker_name(tracker)?;
    if !storage.tracker_exists(tracker).await? {
        bail!("Unknown tracker '{tracker}'");
    }

    let answer = confirmer.confirm(&format!(
        "This removes every record of '{tracker}'. Type its name back to confirm: "
    ))?;
    if answer != tracker {
        println!("cancelled");
        return Ok(());
    }

    storage.delete_all(tracker).await?;
    info!("Deleted tracker {tracker}");
    println!("Deleted '{tracker}'");
    Ok(())
}

pub async fn process_plot_command(storage: &impl TrackerStorage, tracker: &str) -> Result<()> {
    validate_tracker_name(tracker)?;
    if !storage.tracker_exists(tracker).await? {
        bail!("Unknown tracker '{tracker}'");
    }

    let mut records = storage.fetch_records(tracker).await?;
    if records.is_empty() {
        bail!("Tracker '{tracker}' has no records to plot");
    }
    records.sort_by_key(|record| record.day);

    plot::render(tracker, &records).await
}
