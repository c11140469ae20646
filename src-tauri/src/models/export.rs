use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{ObserverRole, PgyYear};

/// One exported mark: `index, timestamp, role, pgy_year`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub index: usize,
    pub timestamp: f64,
    pub role: ObserverRole,
    pub pgy_year: Option<PgyYear>,
}

impl ExportRow {
    pub fn formatted_timestamp(&self) -> String {
        format!("{:.3}", self.timestamp)
    }
}

/// Everything a sink needs to persist one export.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub rows: Vec<ExportRow>,
    pub role: ObserverRole,
    pub pgy_year: Option<PgyYear>,
    pub observer_name: Option<String>,
    pub session_started_at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    pub count: usize,
    pub saved_to: PathBuf,
}
