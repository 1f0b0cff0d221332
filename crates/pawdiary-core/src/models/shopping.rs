//! Shopping list item model

use serde::{Deserialize, Serialize};

use super::{Category, RecordId};
use crate::error::{Error, Result};

/// One wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    /// Store-assigned identity; not part of the wire fields.
    #[serde(skip)]
    pub id: RecordId,
    pub category: Category,
    pub name: String,
    #[serde(default)]
    pub note: String,
    #[serde(rename = "isBought", default)]
    pub is_bought: bool,
    /// Creation instant in epoch milliseconds; the list's sole sort key.
    pub timestamp: i64,
}

/// The shopping form's staged fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingDraft {
    pub category: Category,
    pub name: String,
    pub note: String,
}

impl ShoppingDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("Name must not be empty".to_string()));
        }
        Ok(())
    }
}
