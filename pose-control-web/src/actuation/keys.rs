//! Key vocabulary and the action -> chord mapping

use std::fmt;

use serde::{Serialize, Serializer};

use crate::classifier::ActionKind;

/// Keys the engine can press. Names follow `KeyboardEvent.key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    D,
    Z,
    C,
    ArrowLeft,
    ArrowRight,
    ArrowDown,
}

impl Key {
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::A => "a",
            Key::D => "d",
            Key::Z => "z",
            Key::C => "c",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::ArrowDown => "ArrowDown",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Keys pressed together and held for `hold` seconds
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeyChord {
    pub keys: Vec<Key>,
    pub hold: f32,
}

/// Maps accepted actions to key chords
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChordMap {
    /// Hold time for combat and spin chords (seconds)
    pub hold: f32,
    /// Hold time for movement chords (seconds)
    pub move_hold: f32,
}

impl Default for ChordMap {
    fn default() -> Self {
        Self {
            hold: 0.05,
            move_hold: 0.05,
        }
    }
}

impl ChordMap {
    pub fn new(hold: f32, move_hold: f32) -> Self {
        Self { hold, move_hold }
    }

    pub fn keys_for(action: ActionKind) -> &'static [Key] {
        match action {
            ActionKind::UprisingStrike => &[Key::A, Key::D, Key::ArrowDown],
            ActionKind::EnergyBlast => &[Key::A, Key::D],
            ActionKind::LightPunch => &[Key::A],
            ActionKind::HeavyPunch => &[Key::D],
            ActionKind::LightKick => &[Key::Z],
            ActionKind::HeavyKick => &[Key::C],
            ActionKind::SpinLeft | ActionKind::SpinRight => &[Key::Z, Key::C],
            ActionKind::MoveLeft => &[Key::ArrowLeft],
            ActionKind::MoveRight => &[Key::ArrowRight],
        }
    }

    pub fn chord_for(&self, action: ActionKind) -> KeyChord {
        let hold = match action {
            ActionKind::MoveLeft | ActionKind::MoveRight => self.move_hold,
            _ => self.hold,
        };
        KeyChord {
            keys: Self::keys_for(action).to_vec(),
            hold,
        }
    }
}
