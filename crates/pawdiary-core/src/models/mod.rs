//! Data models for Pawdiary

mod food;
mod shopping;
mod weight;

pub use food::{Category, CategoryFilter, FoodDraft, FoodRecord};
pub use shopping::{ShoppingDraft, ShoppingItem};
pub use weight::{WeightDraft, WeightRecord, DATE_FORMAT as WEIGHT_DATE_FORMAT};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identity of one document within a collection.
///
/// Opaque to this crate: the remote store mints it at insert time and it is
/// only ever compared and echoed back on updates and deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
