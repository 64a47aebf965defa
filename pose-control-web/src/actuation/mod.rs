//! Actuation module - key chords and the press/release scheduler
//!
//! Re-exports only. All logic in submodules.

mod keys;
mod scheduler;

pub use keys::{ChordMap, Key, KeyChord};
pub use scheduler::{Actuator, ChordScheduler, CommandLog, KeyCommand};
