//! Date normalization.
//!
//! The remote backend hands back dates as plain `YYYY-MM-DD` columns or as
//! full RFC 3339 timestamps depending on the column type, and operators
//! type `DD/MM/YYYY`. Everything is normalized to `NaiveDate`.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};

/// Parses a calendar date from any of the accepted formats.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.date_naive());
    }
    // Postgres `timestamp without time zone` renders with a `T` but no offset.
    if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }
    NaiveDate::parse_from_str(s, "%d/%m/%Y").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Parses an RFC 3339 timestamp; a bare date is taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s.trim()) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = parse_date(s)?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
