//! Per-session counters

use std::collections::BTreeMap;

use serde::Serialize;

use crate::classifier::ActionKind;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionStats {
    /// Ticks seen, with or without a detection
    pub frames: u64,
    pub no_detection: u64,
    /// Detected frames with at least one vocabulary landmark missing
    pub partial_detection: u64,
    /// Candidates produced by the classifier
    pub candidates: u64,
    pub accepted: u64,
    pub suppressed: u64,
    pub accepted_by_action: BTreeMap<ActionKind, u64>,
}

impl SessionStats {
    pub(crate) fn record_accepted(&mut self, action: ActionKind) {
        self.accepted += 1;
        *self.accepted_by_action.entry(action).or_insert(0) += 1;
    }

    pub fn accepted_for(&self, action: ActionKind) -> u64 {
        self.accepted_by_action.get(&action).copied().unwrap_or(0)
    }
}
