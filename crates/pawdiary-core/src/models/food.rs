//! Food record model

use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::error::{Error, Result};

/// Product category, shared by food records and shopping items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Canned,
    Pouch,
    Dry,
    Litter,
    Raw,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Canned => "canned",
            Self::Pouch => "pouch",
            Self::Dry => "dry",
            Self::Litter => "litter",
            Self::Raw => "raw",
        }
    }

    /// Parse a stored category string; unknown values map to `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "canned" => Some(Self::Canned),
            "pouch" => Some(Self::Pouch),
            "dry" => Some(Self::Dry),
            "litter" => Some(Self::Litter),
            "raw" => Some(Self::Raw),
            _ => None,
        }
    }

    /// Display label shown by the category selector.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Canned => "罐頭",
            Self::Pouch => "餐包",
            Self::Dry => "乾糧",
            Self::Litter => "貓砂",
            Self::Raw => "生食",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[Self::Canned, Self::Pouch, Self::Dry, Self::Litter, Self::Raw]
    }
}

/// Filter selection for the food list: one concrete category or everything.
///
/// A dedicated variant instead of a sentinel value inside `Category`, so the
/// enum's value space stays exactly the five product categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

/// One food consumption record.
///
/// `date` and `timestamp` are creation facts: they are generated exactly
/// once at insert time and survive every later edit untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRecord {
    /// Store-assigned identity; not part of the wire fields.
    #[serde(skip)]
    pub id: RecordId,
    pub category: Category,
    pub brand: String,
    pub flavor: String,
    /// 1-5 stars; 0 only ever appears in unsubmitted form state.
    pub rating: u8,
    #[serde(default)]
    pub notes: String,
    /// Display-formatted creation date, set once.
    pub date: String,
    /// Creation instant in epoch milliseconds, set once.
    pub timestamp: i64,
}

impl FoodRecord {
    /// Stages the mutable fields for the edit form.
    #[must_use]
    pub fn draft(&self) -> FoodDraft {
        FoodDraft {
            category: self.category,
            brand: self.brand.clone(),
            flavor: self.flavor.clone(),
            rating: self.rating,
            notes: self.notes.clone(),
        }
    }
}

/// The food form's staged fields, used for both create and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodDraft {
    pub category: Category,
    pub brand: String,
    pub flavor: String,
    pub rating: u8,
    pub notes: String,
}

impl FoodDraft {
    /// Required-field rules shared by the create and update paths.
    pub fn validate(&self) -> Result<()> {
        if self.brand.trim().is_empty() {
            return Err(Error::Validation("Brand must not be empty".to_string()));
        }
        if self.flavor.trim().is_empty() {
            return Err(Error::Validation("Flavor must not be empty".to_string()));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(Error::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }
}
