//! Date helpers for partition-scoped processing.

use chrono::{Days, NaiveDate, Utc};

use crate::error::Result;

/// Returns the processing target date, `days_back` days before today.
pub fn target_date(days_back: u64) -> NaiveDate {
    Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(days_back))
        .unwrap_or(NaiveDate::MIN)
}

/// Parses a `YYYY-MM-DD` date string.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
}

/// Parses a compact `YYYYMMDD` date string as used by partition
/// suffixes and the raw export's `event_date` column.
pub fn parse_compact_date(s: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s, "%Y%m%d")?)
}

/// Formats a date as the compact `YYYYMMDD` partition suffix.
pub fn partition_suffix(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Inclusive date range from start to end; empty when start > end.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut range = Vec::new();
    let mut current = start;
    while current <= end {
        range.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    range
}
