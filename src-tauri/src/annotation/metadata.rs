use serde::Serialize;

use crate::{
    error::ValidationError,
    models::{ObserverRole, PgyYear},
};

const UNSET_LABEL: &str = "-";

/// A committed role. Residents always carry a PGY year; attendings never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSelection {
    Attending,
    Resident(PgyYear),
}

impl RoleSelection {
    pub fn role(&self) -> ObserverRole {
        match self {
            RoleSelection::Attending => ObserverRole::Attending,
            RoleSelection::Resident(_) => ObserverRole::Resident,
        }
    }

    pub fn pgy_year(&self) -> Option<PgyYear> {
        match self {
            RoleSelection::Attending => None,
            RoleSelection::Resident(year) => Some(*year),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSnapshot {
    pub role: Option<ObserverRole>,
    pub pgy_year: Option<PgyYear>,
    pub observer_name: Option<String>,
    pub label: String,
    pub complete: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SessionMetadata {
    selection: Option<RoleSelection>,
    observer_name: Option<String>,
}

impl SessionMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a role. A rejected selection leaves the previous one in place.
    pub fn select_role(
        &mut self,
        role: ObserverRole,
        pgy_year: Option<&str>,
    ) -> Result<RoleSelection, ValidationError> {
        let selection = match role {
            ObserverRole::Attending => RoleSelection::Attending,
            ObserverRole::Resident => {
                let raw = pgy_year.ok_or(ValidationError::MissingPgyYear)?;
                RoleSelection::Resident(raw.parse::<PgyYear>()?)
            }
        };
        self.selection = Some(selection);
        Ok(selection)
    }

    pub fn selection(&self) -> Option<RoleSelection> {
        self.selection
    }

    pub fn is_complete(&self) -> bool {
        self.selection.is_some()
    }

    pub fn describe(&self) -> String {
        match self.selection {
            None => UNSET_LABEL.to_string(),
            Some(RoleSelection::Attending) => "Attending".to_string(),
            Some(RoleSelection::Resident(year)) => format!("Resident/Fellow PGY{year}"),
        }
    }

    pub fn observer_name(&self) -> Option<&str> {
        self.observer_name.as_deref()
    }

    pub fn set_observer_name(&mut self, name: Option<&str>) {
        self.observer_name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
    }

    pub fn to_snapshot(&self) -> MetadataSnapshot {
        MetadataSnapshot {
            role: self.selection.map(|s| s.role()),
            pgy_year: self.selection.and_then(|s| s.pgy_year()),
            observer_name: self.observer_name.clone(),
            label: self.describe(),
            complete: self.is_complete(),
        }
    }
}
