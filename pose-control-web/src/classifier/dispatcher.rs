//! Action classifier - runs the rule tables in the configured mode

use serde::{Deserialize, Serialize};

use super::action::{ActionCandidate, ActionKind, ActionSet};
use super::rules::{first_match, Thresholds, COMBAT_RULES, MOVE_RULE, PRIORITY_TABLE, SPIN_RULE};
use crate::features::FeatureSnapshot;

/// How rule categories compete within one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierMode {
    /// All eight rules in one chain; the first match is the only candidate
    #[default]
    SingleCandidatePerFrame,
    /// Move, combat and spin are classified separately; the gate tries
    /// them in that order and accepts at most one
    IndependentMoveAndCombat,
}

/// Up to three ordered candidates for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Candidates {
    items: [Option<ActionKind>; 3],
    len: usize,
}

impl Candidates {
    fn push(&mut self, candidate: ActionCandidate) {
        if let Some(action) = candidate {
            if self.len < self.items.len() {
                self.items[self.len] = Some(action);
                self.len += 1;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.items[..self.len].iter().flatten().copied()
    }

    pub fn first(&self) -> ActionCandidate {
        self.items[0]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl From<ActionCandidate> for Candidates {
    fn from(candidate: ActionCandidate) -> Self {
        let mut out = Candidates::default();
        out.push(candidate);
        out
    }
}

/// Deterministic first-match classifier
#[derive(Clone, Debug, Default)]
pub struct ActionClassifier {
    mode: ClassifierMode,
    thresholds: Thresholds,
    enabled: ActionSet,
}

impl ActionClassifier {
    pub fn new(mode: ClassifierMode, thresholds: Thresholds, enabled: ActionSet) -> Self {
        Self { mode, thresholds, enabled }
    }

    /// Single verdict: the whole priority chain, first match wins
    pub fn classify(&self, features: &FeatureSnapshot) -> ActionCandidate {
        first_match(&PRIORITY_TABLE, features, &self.thresholds, &self.enabled)
    }

    /// Ordered candidates for the gate, according to the mode
    pub fn candidates(&self, features: &FeatureSnapshot) -> Candidates {
        match self.mode {
            ClassifierMode::SingleCandidatePerFrame => self.classify(features).into(),
            ClassifierMode::IndependentMoveAndCombat => {
                let t = &self.thresholds;
                let mut out = Candidates::default();
                out.push(first_match(&[MOVE_RULE], features, t, &self.enabled));
                out.push(first_match(&COMBAT_RULES, features, t, &self.enabled));
                out.push(first_match(&[SPIN_RULE], features, t, &self.enabled));
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy_frame() -> FeatureSnapshot {
        FeatureSnapshot {
            tilt_angle: Some(14.0),
            right_wrist_reach: Some(0.2),
            orientation_delta: Some(30.0),
            ..FeatureSnapshot::default()
        }
    }

    #[test]
    fn test_single_mode_yields_one_candidate() {
        let classifier = ActionClassifier::default();
        let candidates = classifier.candidates(&busy_frame());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates.first(), Some(ActionKind::LightPunch));
    }

    #[test]
    fn test_independent_mode_orders_move_combat_spin() {
        let classifier = ActionClassifier::new(
            ClassifierMode::IndependentMoveAndCombat,
            Thresholds::default(),
            ActionSet::all(),
        );
        let got: Vec<_> = classifier.candidates(&busy_frame()).iter().collect();
        assert_eq!(
            got,
            vec![ActionKind::MoveRight, ActionKind::LightPunch, ActionKind::SpinRight]
        );
    }

    #[test]
    fn test_independent_mode_skips_empty_categories() {
        let classifier = ActionClassifier::new(
            ClassifierMode::IndependentMoveAndCombat,
            Thresholds::default(),
            ActionSet::all(),
        );
        let features = FeatureSnapshot {
            orientation_delta: Some(-40.0),
            ..FeatureSnapshot::default()
        };
        let candidates = classifier.candidates(&features);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates.first(), Some(ActionKind::SpinLeft));
    }

    #[test]
    fn test_nothing_matches() {
        let classifier = ActionClassifier::default();
        assert!(classifier.candidates(&FeatureSnapshot::default()).is_empty());
        assert_eq!(classifier.classify(&FeatureSnapshot::default()), None);
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&ClassifierMode::IndependentMoveAndCombat).unwrap();
        assert_eq!(json, "\"independent-move-and-combat\"");
    }
}
