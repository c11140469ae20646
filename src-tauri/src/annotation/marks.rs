use serde::Serialize;

/// Accepted mark timestamps in acceptance order (not sorted by video time).
#[derive(Debug, Clone, Default)]
pub struct MarkSequence {
    marks: Vec<f64>,
    revision: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarksSnapshot {
    /// Bumped on every change; a listener drops snapshots older than one it has shown.
    pub revision: u64,
    pub count: usize,
    pub marks: Vec<f64>,
    pub last: Option<f64>,
}

impl MarkSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty sequence whose revisions continue after `previous`.
    pub fn following(previous: &MarkSequence) -> Self {
        Self {
            marks: Vec::new(),
            revision: previous.revision + 1,
        }
    }

    pub fn append(&mut self, time: f64) {
        debug_assert!(time >= 0.0, "mark time must be non-negative");
        self.marks.push(time);
        self.revision += 1;
    }

    /// Removes and returns the most recent mark, or `None` when empty.
    pub fn undo(&mut self) -> Option<f64> {
        let removed = self.marks.pop();
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn count(&self) -> usize {
        self.marks.len()
    }

    pub fn last(&self) -> Option<f64> {
        self.marks.last().copied()
    }

    pub fn snapshot(&self) -> Vec<f64> {
        self.marks.clone()
    }

    pub fn to_snapshot(&self) -> MarksSnapshot {
        MarksSnapshot {
            revision: self.revision,
            count: self.count(),
            marks: self.snapshot(),
            last: self.last(),
        }
    }
}
