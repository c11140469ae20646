use serde::Serialize;

pub const DEFAULT_DEBOUNCE_SECS: f64 = 0.25;

/// Slack for float error in playback times, so `0.35 - 0.1` counts as a full 0.25s.
const GAP_TOLERANCE_SECS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GateDecision {
    Accepted,
    Rejected,
}

/// Suppresses a mark that lands too soon after the last accepted one.
///
/// The gate compares against the last *accepted* time only; rejected
/// requests never move the window, and undoing a mark does not reset it.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    threshold_secs: f64,
    last_accepted: Option<f64>,
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_SECS)
    }
}

impl DebounceGate {
    pub fn new(threshold_secs: f64) -> Self {
        let threshold_secs = if threshold_secs.is_finite() && threshold_secs >= 0.0 {
            threshold_secs
        } else {
            DEFAULT_DEBOUNCE_SECS
        };
        Self {
            threshold_secs,
            last_accepted: None,
        }
    }

    pub fn threshold_secs(&self) -> f64 {
        self.threshold_secs
    }

    pub fn last_accepted(&self) -> Option<f64> {
        self.last_accepted
    }

    pub fn evaluate(&mut self, requested: f64) -> GateDecision {
        let accepted = match self.last_accepted {
            None => true,
            Some(last) => requested - last + GAP_TOLERANCE_SECS >= self.threshold_secs,
        };

        if accepted {
            self.last_accepted = Some(requested);
            GateDecision::Accepted
        } else {
            GateDecision::Rejected
        }
    }
}
