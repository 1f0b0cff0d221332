//! Pet profile configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The one pet this diary tracks.
///
/// Hosts decide where the profile lives (bundled asset, settings screen);
/// this crate only parses and validates it. `birth_date` is the fixed
/// reference every age label is computed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PetProfile {
    pub name: String,
    /// Reference date for all age labels, `YYYY-MM-DD`.
    pub birth_date: NaiveDate,
}

impl PetProfile {
    /// Parse a profile from a raw JSON payload.
    pub fn from_json_str(payload: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(payload)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("Pet name must not be empty".to_string()));
        }
        Ok(())
    }
}
