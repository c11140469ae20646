use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::ValidationError,
    models::{ExportRequest, ExportRow, ObserverRole},
};

use super::{
    debounce::{DebounceGate, GateDecision},
    marks::{MarkSequence, MarksSnapshot},
    metadata::{MetadataSnapshot, SessionMetadata},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "status")]
pub enum MarkOutcome {
    Accepted { time: f64, count: usize },
    Debounced { time: f64, last_accepted: Option<f64> },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "status")]
pub enum UndoOutcome {
    Removed { time: f64, count: usize },
    NothingToUndo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub video: Option<PathBuf>,
    pub video_name: Option<String>,
    pub started_at: DateTime<Local>,
    pub mark_count: usize,
    pub role_label: String,
    pub debounce_secs: f64,
}

/// State for one loaded video: debounce window, marks and observer metadata.
#[derive(Debug, Clone)]
pub struct AnnotationSession {
    id: String,
    video: Option<PathBuf>,
    started_at: DateTime<Local>,
    gate: DebounceGate,
    marks: MarkSequence,
    metadata: SessionMetadata,
}

impl AnnotationSession {
    pub fn new(video: Option<PathBuf>, debounce_secs: f64) -> Self {
        Self::with_metadata(video, debounce_secs, SessionMetadata::new())
    }

    /// Starts a fresh session that keeps an earlier role selection pre-filled.
    pub fn with_metadata(
        video: Option<PathBuf>,
        debounce_secs: f64,
        metadata: SessionMetadata,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            video,
            started_at: Local::now(),
            gate: DebounceGate::new(debounce_secs),
            marks: MarkSequence::new(),
            metadata,
        }
    }

    /// Fresh session for `video` that keeps this one's role, observer name and
    /// mark revision counter.
    pub fn successor(&self, video: Option<PathBuf>, debounce_secs: f64) -> Self {
        let mut next = Self::with_metadata(video, debounce_secs, self.metadata.clone());
        next.marks = MarkSequence::following(&self.marks);
        next
    }

    pub fn video(&self) -> Option<&Path> {
        self.video.as_deref()
    }

    pub fn metadata_mut(&mut self) -> &mut SessionMetadata {
        &mut self.metadata
    }

    pub fn request_mark(&mut self, time: f64) -> Result<MarkOutcome, ValidationError> {
        if !time.is_finite() || time < 0.0 {
            return Err(ValidationError::InvalidTimestamp(time));
        }

        let last_accepted = self.gate.last_accepted();
        match self.gate.evaluate(time) {
            GateDecision::Accepted => {
                self.marks.append(time);
                Ok(MarkOutcome::Accepted {
                    time,
                    count: self.marks.count(),
                })
            }
            GateDecision::Rejected => Ok(MarkOutcome::Debounced {
                time,
                last_accepted,
            }),
        }
    }

    pub fn request_undo(&mut self) -> UndoOutcome {
        match self.marks.undo() {
            Some(time) => UndoOutcome::Removed {
                time,
                count: self.marks.count(),
            },
            None => UndoOutcome::NothingToUndo,
        }
    }

    pub fn marks(&self) -> MarksSnapshot {
        self.marks.to_snapshot()
    }

    pub fn metadata_snapshot(&self) -> MetadataSnapshot {
        self.metadata.to_snapshot()
    }

    /// Assembles export rows from the current marks; fails if no role is committed.
    pub fn export_request(&self) -> Result<ExportRequest, ValidationError> {
        let selection = self
            .metadata
            .selection()
            .ok_or(ValidationError::RoleNotSelected)?;
        let role: ObserverRole = selection.role();
        let pgy_year = selection.pgy_year();

        let rows = self
            .marks
            .snapshot()
            .into_iter()
            .enumerate()
            .map(|(idx, timestamp)| ExportRow {
                index: idx + 1,
                timestamp,
                role,
                pgy_year,
            })
            .collect();

        Ok(ExportRequest {
            rows,
            role,
            pgy_year,
            observer_name: self.metadata.observer_name().map(str::to_string),
            session_started_at: self.started_at,
        })
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            video: self.video.clone(),
            video_name: self
                .video
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned()),
            started_at: self.started_at,
            mark_count: self.marks.count(),
            role_label: self.metadata.describe(),
            debounce_secs: self.gate.threshold_secs(),
        }
    }
}
