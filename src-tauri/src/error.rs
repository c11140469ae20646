/// Rejected role / PGY input or an incomplete session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select Attending or Resident/Fellow before exporting")]
    RoleNotSelected,

    #[error("PGY year is required for Resident/Fellow")]
    MissingPgyYear,

    #[error("PGY year must be between 1 and 7, got {0}")]
    PgyYearOutOfRange(i64),

    #[error("PGY year must be a whole number, got '{0}'")]
    InvalidPgyYear(String),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Playback time must be a non-negative number of seconds, got {0}")]
    InvalidTimestamp(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorKind {
    Media,
    Captions,
    Export,
}

impl CollaboratorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollaboratorKind::Media => "media source",
            CollaboratorKind::Captions => "caption track",
            CollaboratorKind::Export => "export sink",
        }
    }
}

/// Failure reported by something outside the core (disk, caption file, sink).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} failed: {message}", .kind.as_str())]
pub struct CollaboratorError {
    pub kind: CollaboratorKind,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(kind: CollaboratorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn media(message: impl Into<String>) -> Self {
        Self::new(CollaboratorKind::Media, message)
    }

    pub fn captions(message: impl Into<String>) -> Self {
        Self::new(CollaboratorKind::Captions, message)
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new(CollaboratorKind::Export, message)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Malformed caption track. Tracks that fail these checks are not loaded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptionError {
    #[error("caption #{index} ends before it starts ({start:.3}s > {end:.3}s)")]
    InvertedInterval { index: usize, start: f64, end: f64 },

    #[error("caption #{index} starts at {start:.3}s, before the previous caption ends at {previous_end:.3}s")]
    Overlapping {
        index: usize,
        start: f64,
        previous_end: f64,
    },
}
