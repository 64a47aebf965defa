//! Classifier module - rule tables and the first-match dispatcher
//!
//! Re-exports only. All logic in submodules.

mod action;
mod dispatcher;
mod rules;

pub use action::{ActionCandidate, ActionCategory, ActionClass, ActionKind, ActionSet};
pub use dispatcher::{ActionClassifier, Candidates, ClassifierMode};
pub use rules::{
    first_match, KickSource, Rule, RuleFn, Thresholds, COMBAT_RULES, MOVE_RULE, PRIORITY_TABLE, SPIN_RULE,
};
