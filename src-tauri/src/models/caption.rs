use serde::{Deserialize, Serialize};

/// One time-bounded caption, seconds from the start of the video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptionEntry {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl CaptionEntry {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}
