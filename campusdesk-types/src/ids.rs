//! Identifier types and generators.
//!
//! Student identifiers are human-assigned (`STU-1`, `STU-2024-017`) and are
//! normalized to upper case. Every other record identifier is generated
//! from a UUID v7 so ids sort by creation time.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a student within a collection snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Parses and normalizes a student id: surrounding whitespace is
    /// dropped and letters are upper-cased.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(Error::InvalidStudentId(s.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StudentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for StudentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generates a new record id of the form `<PREFIX>-<uuid v7 simple>`.
#[must_use]
pub fn new_record_id(prefix: &str) -> String {
    format!("{}-{}", prefix.to_ascii_uppercase(), Uuid::now_v7().simple())
}

/// Builds a receipt number from the payment date and the payment id.
///
/// The suffix is the last six alphanumeric characters of the payment id,
/// so two payments on the same day never share a receipt number as long
/// as their ids differ in that tail.
#[must_use]
pub fn receipt_number(date: NaiveDate, payment_id: &str) -> String {
    let tail: Vec<char> = payment_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let start = tail.len().saturating_sub(6);
    let suffix: String = tail[start..].iter().collect::<String>().to_ascii_uppercase();
    format!("RCP-{}-{:0>6}", date.format("%Y%m%d"), suffix)
}
