use crate::{error::CaptionError, models::CaptionEntry};

/// Caption track sorted by start time, queried on every playback tick.
///
/// Entries never overlap. Touching entries (`next.start == prev.end`) are
/// allowed; at the shared instant the later entry is reported.
#[derive(Debug, Clone, Default)]
pub struct CaptionIndex {
    entries: Vec<CaptionEntry>,
}

impl CaptionIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(mut entries: Vec<CaptionEntry>) -> Result<Self, CaptionError> {
        entries.retain(|e| e.start.is_finite() && e.end.is_finite());
        entries.sort_by(|a, b| a.start.total_cmp(&b.start));

        for (idx, entry) in entries.iter().enumerate() {
            if entry.start > entry.end {
                return Err(CaptionError::InvertedInterval {
                    index: idx + 1,
                    start: entry.start,
                    end: entry.end,
                });
            }
            if let Some(previous) = idx.checked_sub(1).map(|p| &entries[p]) {
                if entry.start < previous.end {
                    return Err(CaptionError::Overlapping {
                        index: idx + 1,
                        start: entry.start,
                        previous_end: previous.end,
                    });
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CaptionEntry] {
        &self.entries
    }

    pub fn active_entry(&self, time: f64) -> Option<&CaptionEntry> {
        if time.is_nan() {
            return None;
        }
        let upper = self.entries.partition_point(|e| e.start <= time);
        let candidate = self.entries.get(upper.checked_sub(1)?)?;
        candidate.contains(time).then_some(candidate)
    }

    pub fn active_caption(&self, time: f64) -> Option<&str> {
        self.active_entry(time).map(|e| e.text.as_str())
    }
}
