//! Session module - the per-frame engine, its state and the driving loop
//!
//! Re-exports only. All logic in submodules.

mod engine;
mod source;
mod stats;

pub use engine::{ActionEvent, ControlSession, Detection, Engine, SessionState, TickOutcome};
pub use source::{drive, FrameSource, ReplaySource, SourceTick};
pub use stats::SessionStats;
