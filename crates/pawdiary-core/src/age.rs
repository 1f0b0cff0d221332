//! Elapsed-age labels for weight measurements.

use chrono::NaiveDate;

/// Age labels count 30-day months, the way the vet card does, not calendar
/// months.
const DAYS_PER_MONTH: i64 = 30;

/// Remainder days below this are dropped from the label.
const REMAINDER_CUTOFF: i64 = 5;

/// Human-readable age of `date` relative to `birth`: "3天", "2個月",
/// "2個月12天".
///
/// Uses the absolute day difference, so a date before `birth` yields the
/// same label as one equally far after it.
#[must_use]
pub fn age_label(date: NaiveDate, birth: NaiveDate) -> String {
    let days = (date - birth).num_days().abs();
    if days < DAYS_PER_MONTH {
        return format!("{days}天");
    }
    let months = days / DAYS_PER_MONTH;
    let remainder = days % DAYS_PER_MONTH;
    if remainder < REMAINDER_CUTOFF {
        format!("{months}個月")
    } else {
        format!("{months}個月{remainder}天")
    }
}
