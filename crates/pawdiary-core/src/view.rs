//! Derived, display-ready projections of the synchronized snapshots.
//!
//! Pure functions over the current snapshot; recomputed on every render and
//! never mutating their input.

use chrono::NaiveDate;

use crate::age;
use crate::models::{CategoryFilter, FoodRecord, WeightRecord};

/// Sort order selection for the food list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first, by creation timestamp.
    #[default]
    Date,
    /// Best rated first.
    Rating,
    /// Brand name ascending, case-folded.
    Brand,
}

/// Filtered, sorted view of the food snapshot.
///
/// Stable: records with equal sort keys keep the order the synchronizer
/// delivered them in.
#[must_use]
pub fn project<'a>(
    records: &'a [FoodRecord],
    filter: CategoryFilter,
    key: SortKey,
) -> Vec<&'a FoodRecord> {
    let mut view: Vec<&FoodRecord> = records
        .iter()
        .filter(|record| filter.matches(record.category))
        .collect();
    match key {
        SortKey::Date => view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortKey::Rating => view.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortKey::Brand => view.sort_by_key(|record| record.brand.to_lowercase()),
    }
    view
}

/// One chart-ready weight point.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: String,
    pub weight: f64,
    /// The pet's age at this measurement, e.g. "2個月12天".
    pub age_label: String,
}

/// Chart points for the weight history: one per record, input order kept
/// (the synchronizer already delivers ascending by date).
#[must_use]
pub fn to_chart_series(records: &[WeightRecord], birth: NaiveDate) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|record| ChartPoint {
            date: record.date.clone(),
            weight: record.weight,
            age_label: record
                .parsed_date()
                .map_or_else(String::new, |date| age::age_label(date, birth)),
        })
        .collect()
}
