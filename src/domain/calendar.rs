//! Calendar date parsing and day arithmetic.
//!
//! All string-to-date conversion and day differences used by the ledger go
//! through this module.

use chrono::NaiveDate;

use super::error::StorageError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(input: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| StorageError::DateParse {
        input: input.to_string(),
    })
}

/// Whole days from `from` to `to`. Negative when `to` precedes `from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
