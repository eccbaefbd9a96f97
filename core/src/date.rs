//! Conversion between 8-digit `yyyymmdd` strings and calendar dates.
//!
//! Dates always travel as `yyyymmdd` text; `NaiveDate` is only used between
//! `parse` and `format`. Day-of-month is range-checked against 1..=31 only,
//! so `20240231` clears the range checks and is then rejected by the
//! calendar itself with [`DateError::OutOfRange`].

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::error::DateError;

/// Earliest accepted year.
pub const MIN_YEAR: i32 = 1911;

/// Parse an 8-digit `yyyymmdd` string.
pub fn parse(text: &str) -> Result<NaiveDate, DateError> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateError::Format);
    }

    let year: i32 = text[..4].parse().map_err(|_| DateError::Format)?;
    let month: u32 = text[4..6].parse().map_err(|_| DateError::Format)?;
    let day: u32 = text[6..].parse().map_err(|_| DateError::Format)?;

    if year < MIN_YEAR {
        return Err(DateError::Year);
    }
    if !(1..=12).contains(&month) {
        return Err(DateError::Month);
    }
    if !(1..=31).contains(&day) {
        return Err(DateError::Day);
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::OutOfRange)
}

/// Format a date as zero-padded `yyyymmdd`.
pub fn format(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// A date as it arrives at the boundary, before normalization.
///
/// Deserializing never fails: non-string JSON values become `Unsupported`
/// so the rejection surfaces as [`DateError::Unsupported`] from
/// [`DateInput::resolve`] instead of a generic body error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    Text(String),
    Unsupported,
}

impl DateInput {
    pub fn resolve(self) -> Result<NaiveDate, DateError> {
        match self {
            DateInput::Date(date) => Ok(date),
            DateInput::Text(text) => parse(&text),
            DateInput::Unsupported => Err(DateError::Unsupported),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl<'de> Deserialize<'de> for DateInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(text) => DateInput::Text(text),
            _ => DateInput::Unsupported,
        })
    }
}

/// `#[serde(with = "yyyymmdd")]` adapter for `NaiveDate` fields on the wire.
pub mod yyyymmdd {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse(&text).map_err(de::Error::custom)
    }
}
