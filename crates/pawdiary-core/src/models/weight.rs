//! Weight record model

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::error::{Error, Result};

/// Stored format of `WeightRecord::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One body-weight measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Store-assigned identity; not part of the wire fields.
    #[serde(skip)]
    pub id: RecordId,
    /// Kilograms.
    pub weight: f64,
    /// User-chosen calendar date (`YYYY-MM-DD`); display value and sort key.
    pub date: String,
    /// Derived from `date` at creation (midnight UTC), not wall clock, so
    /// ascending-by-date and ascending-by-timestamp agree.
    pub timestamp: i64,
}

impl WeightRecord {
    /// Epoch milliseconds of midnight UTC on `date`.
    #[must_use]
    pub fn timestamp_for(date: NaiveDate) -> i64 {
        date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }

    /// The record's calendar date, if the stored string is well formed.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Raw weight-form input; nothing is parsed until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightDraft {
    /// Free-text weight entry, expected to parse as a positive number.
    pub weight: String,
    /// Calendar date entry, `YYYY-MM-DD`.
    pub date: String,
}

impl WeightDraft {
    /// Validates the form input and yields the parsed weight and date.
    pub fn validate(&self) -> Result<(f64, NaiveDate)> {
        let weight: f64 = self
            .weight
            .trim()
            .parse()
            .map_err(|_| Error::Validation("Weight must be a number".to_string()))?;
        if weight <= 0.0 {
            return Err(Error::Validation("Weight must be positive".to_string()));
        }
        if self.date.trim().is_empty() {
            return Err(Error::Validation("Date must not be empty".to_string()));
        }
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| Error::Validation("Date must use the YYYY-MM-DD format".to_string()))?;
        Ok((weight, date))
    }
}
