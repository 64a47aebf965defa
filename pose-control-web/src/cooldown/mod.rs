//! Cooldown module - debounce gate and cooldown table
//!
//! Re-exports only. All logic in submodules.

mod manager;
mod table;

pub use manager::{
    CooldownManager, CooldownPhase, CooldownScope, CooldownState, GateDecision, HoldPolicy, ReleasePolicy,
    SuppressReason,
};
pub use table::CooldownTable;
