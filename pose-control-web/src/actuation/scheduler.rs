//! Timed press/release without sleeping
//!
//! A chord is pressed immediately and released once its hold time has
//! passed, on whichever `poll` first sees the deadline. Re-scheduling a key
//! that is still down extends its deadline instead of pressing it twice.

use serde::Serialize;

use super::keys::{Key, KeyChord};

/// One command for the key backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "key", rename_all = "lowercase")]
pub enum KeyCommand {
    Press(Key),
    Release(Key),
}

/// Key backend boundary
pub trait Actuator {
    fn press(&mut self, key: Key);
    fn release(&mut self, key: Key);

    fn apply(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Press(key) => self.press(key),
            KeyCommand::Release(key) => self.release(key),
        }
    }
}

/// Actuator that records what it was told to do
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandLog {
    pub commands: Vec<KeyCommand>,
}

impl Actuator for CommandLog {
    fn press(&mut self, key: Key) {
        self.commands.push(KeyCommand::Press(key));
    }

    fn release(&mut self, key: Key) {
        self.commands.push(KeyCommand::Release(key));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct HeldKey {
    key: Key,
    release_at: f64,
}

/// Press/release queue driven by the caller's clock
#[derive(Clone, Debug, Default)]
pub struct ChordScheduler {
    outbox: Vec<KeyCommand>,
    held: Vec<HeldKey>,
}

impl ChordScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue presses for `chord` and release deadlines at `now + hold`
    pub fn schedule(&mut self, chord: &KeyChord, now: f64) {
        let release_at = now + chord.hold as f64;
        for &key in &chord.keys {
            match self.held.iter_mut().find(|h| h.key == key) {
                Some(held) => held.release_at = held.release_at.max(release_at),
                None => {
                    self.outbox.push(KeyCommand::Press(key));
                    self.held.push(HeldKey { key, release_at });
                }
            }
        }
    }

    /// Pending presses, then every release whose deadline is at or before `now`
    pub fn poll(&mut self, now: f64) -> Vec<KeyCommand> {
        let mut out: Vec<KeyCommand> = self.outbox.drain(..).collect();
        self.held.retain(|held| {
            if held.release_at <= now {
                out.push(KeyCommand::Release(held.key));
                false
            } else {
                true
            }
        });
        out
    }

    /// `poll` and hand the commands to `actuator`. Returns how many were sent.
    pub fn dispatch(&mut self, now: f64, actuator: &mut dyn Actuator) -> usize {
        let commands = self.poll(now);
        for command in &commands {
            actuator.apply(*command);
        }
        commands.len()
    }

    /// Flush pending presses and release everything still held
    pub fn release_all(&mut self) -> Vec<KeyCommand> {
        let mut out: Vec<KeyCommand> = self.outbox.drain(..).collect();
        out.extend(self.held.drain(..).map(|held| KeyCommand::Release(held.key)));
        out
    }

    /// Keys currently down
    pub fn pending(&self) -> usize {
        self.held.len()
    }

    pub fn is_idle(&self) -> bool {
        self.outbox.is_empty() && self.held.is_empty()
    }

    /// Earliest release deadline
    pub fn next_release(&self) -> Option<f64> {
        self.held.iter().map(|h| h.release_at).reduce(f64::min)
    }
}
