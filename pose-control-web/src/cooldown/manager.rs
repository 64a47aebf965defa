//! Cooldown gate - turns a jittery per-frame candidate into discrete events
//!
//! Two checks must pass for a candidate to be accepted:
//! - hold: nothing blocking is still active (see `HoldPolicy`)
//! - clock: `now - last_accepted > cooldown(candidate)`, strictly
//!
//! The active action is cleared by `release_expired` once the release window
//! has passed, and optionally by `release_idle` on a frame with no candidate.

use serde::{Deserialize, Serialize};

use super::table::CooldownTable;
use crate::classifier::{ActionClass, ActionKind};

/// Which active action blocks a new candidate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HoldPolicy {
    /// Any active action blocks every candidate
    #[default]
    AnyActive,
    /// Only a repeat of the active action's class is blocked
    SameAction,
}

/// Which clock the cooldown is measured against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CooldownScope {
    /// One clock shared by all actions
    #[default]
    Global,
    /// A clock per action class
    PerClass,
}

/// When the active action is cleared
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReleasePolicy {
    /// Seconds after acceptance; `None` disables time-based release
    pub window: Option<f32>,
    /// Clear on any detected frame that produced no candidate
    pub on_idle_frame: bool,
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        Self {
            window: Some(0.3),
            on_idle_frame: false,
        }
    }
}

/// Debouncer memory. Owned by the session, passed in on every tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CooldownState {
    /// Time of the most recent acceptance of any action
    pub last_accepted_time: Option<f64>,
    /// Action currently held, if any
    pub current_active_action: Option<ActionKind>,
    class_last_accepted: [Option<f64>; ActionClass::COUNT],
}

impl CooldownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_accepted_for(&self, class: ActionClass) -> Option<f64> {
        self.class_last_accepted[class.slot()]
    }

    fn record(&mut self, action: ActionKind, now: f64) {
        self.last_accepted_time = Some(now);
        self.current_active_action = Some(action);
        self.class_last_accepted[action.class().slot()] = Some(now);
    }
}

/// Idle / Suppressing view of the state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownPhase {
    Idle,
    Suppressing(ActionKind),
}

/// Why a candidate was not accepted
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SuppressReason {
    /// The clock has not run out; `remaining` seconds to go
    CoolingDown { remaining: f64 },
    /// Blocked by the active action
    Held(ActionKind),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateDecision {
    Accepted,
    Suppressed(SuppressReason),
}

impl GateDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateDecision::Accepted)
    }
}

/// Cooldown/hysteresis gate. Holds configuration only; all memory lives in
/// `CooldownState`.
#[derive(Clone, Debug, Default)]
pub struct CooldownManager {
    table: CooldownTable,
    hold_policy: HoldPolicy,
    scope: CooldownScope,
    release: ReleasePolicy,
}

impl CooldownManager {
    pub fn new(
        table: CooldownTable,
        hold_policy: HoldPolicy,
        scope: CooldownScope,
        release: ReleasePolicy,
    ) -> Self {
        Self {
            table,
            hold_policy,
            scope,
            release,
        }
    }

    pub fn phase(&self, state: &CooldownState) -> CooldownPhase {
        match state.current_active_action {
            Some(action) => CooldownPhase::Suppressing(action),
            None => CooldownPhase::Idle,
        }
    }

    /// Clear the active action once the release window has passed.
    /// Returns the released action.
    pub fn release_expired(&self, state: &mut CooldownState, now: f64) -> Option<ActionKind> {
        let window = self.release.window?;
        let last = state.last_accepted_time?;
        if state.current_active_action.is_some() && now - last > window as f64 {
            return state.current_active_action.take();
        }
        None
    }

    /// Clear the active action on a frame that produced no candidate,
    /// if the policy asks for it.
    pub fn release_idle(&self, state: &mut CooldownState) -> Option<ActionKind> {
        if self.release.on_idle_frame {
            state.current_active_action.take()
        } else {
            None
        }
    }

    /// Decide without touching the state
    pub fn evaluate(&self, state: &CooldownState, candidate: ActionKind, now: f64) -> GateDecision {
        if let Some(active) = state.current_active_action {
            let blocked = match self.hold_policy {
                HoldPolicy::AnyActive => true,
                HoldPolicy::SameAction => active.class() == candidate.class(),
            };
            if blocked {
                return GateDecision::Suppressed(SuppressReason::Held(active));
            }
        }

        let last = match self.scope {
            CooldownScope::Global => state.last_accepted_time,
            CooldownScope::PerClass => state.last_accepted_for(candidate.class()),
        };
        if let Some(last) = last {
            let cooldown = self.table.get(candidate) as f64;
            let elapsed = now - last;
            if elapsed <= cooldown {
                return GateDecision::Suppressed(SuppressReason::CoolingDown {
                    remaining: cooldown - elapsed,
                });
            }
        }

        GateDecision::Accepted
    }

    /// Evaluate and, on acceptance, record the action
    pub fn offer(&self, state: &mut CooldownState, candidate: ActionKind, now: f64) -> GateDecision {
        let decision = self.evaluate(state, candidate, now);
        if decision.is_accepted() {
            state.record(candidate, now);
        }
        decision
    }
}
