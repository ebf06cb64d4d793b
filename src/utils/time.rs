
use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};


/// This is the standard way of converting a day to a string in metrack. The
/// same form is used in storage, output, and the gnuplot time format.
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Inverse of [format_day].
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow!("Can't parse {value} as a date: {e}"))
}

/// Index of the day's weekday. 0 is Monday, 6 is Sunday.
pub fn weekday_index(day: NaiveDate) -> usize {
    day.weekday().num_days_from_monday() as usize
}
