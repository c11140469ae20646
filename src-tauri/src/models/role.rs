use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ObserverRole {
    Attending,
    Resident,
}

impl ObserverRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObserverRole::Attending => "Attending",
            ObserverRole::Resident => "Resident",
        }
    }
}

impl FromStr for ObserverRole {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "attending" => Ok(ObserverRole::Attending),
            "resident" | "fellow" | "resident/fellow" => Ok(ObserverRole::Resident),
            _ => Err(ValidationError::UnknownRole(value.to_string())),
        }
    }
}

/// Post-graduate training year, always within 1..=7.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PgyYear(u8);

impl PgyYear {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for PgyYear {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(PgyYear(value as u8))
        } else {
            Err(ValidationError::PgyYearOutOfRange(value))
        }
    }
}

impl FromStr for PgyYear {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingPgyYear);
        }
        let parsed = trimmed
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidPgyYear(value.to_string()))?;
        PgyYear::try_from(parsed)
    }
}

impl fmt::Display for PgyYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
