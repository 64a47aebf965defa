//! Action set - the closed list of moves the engine can emit

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game actions (order matches `ActionKind::ALL`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    MoveLeft,
    MoveRight,
    UprisingStrike,
    EnergyBlast,
    LightPunch,
    HeavyPunch,
    LightKick,
    HeavyKick,
    SpinLeft,
    SpinRight,
}

/// A classifier verdict for one frame; `None` means no action
pub type ActionCandidate = Option<ActionKind>;

/// Coarse grouping used by the classifier modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionCategory {
    Movement,
    Combat,
    Rotation,
}

/// Debounce class. Mirrored variants share one class so that, e.g.,
/// SpinLeft followed by SpinRight is held like a repeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionClass {
    Move,
    UprisingStrike,
    EnergyBlast,
    LightPunch,
    HeavyPunch,
    LightKick,
    HeavyKick,
    Spin,
}

impl ActionClass {
    pub const COUNT: usize = 8;

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl ActionKind {
    pub const COUNT: usize = 10;

    pub const ALL: [ActionKind; Self::COUNT] = [
        ActionKind::MoveLeft,
        ActionKind::MoveRight,
        ActionKind::UprisingStrike,
        ActionKind::EnergyBlast,
        ActionKind::LightPunch,
        ActionKind::HeavyPunch,
        ActionKind::LightKick,
        ActionKind::HeavyKick,
        ActionKind::SpinLeft,
        ActionKind::SpinRight,
    ];

    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::MoveLeft => "move_left",
            ActionKind::MoveRight => "move_right",
            ActionKind::UprisingStrike => "uprising_strike",
            ActionKind::EnergyBlast => "energy_blast",
            ActionKind::LightPunch => "light_punch",
            ActionKind::HeavyPunch => "heavy_punch",
            ActionKind::LightKick => "light_kick",
            ActionKind::HeavyKick => "heavy_kick",
            ActionKind::SpinLeft => "spin_left",
            ActionKind::SpinRight => "spin_right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == name)
    }

    pub fn category(&self) -> ActionCategory {
        match self {
            ActionKind::MoveLeft | ActionKind::MoveRight => ActionCategory::Movement,
            ActionKind::SpinLeft | ActionKind::SpinRight => ActionCategory::Rotation,
            _ => ActionCategory::Combat,
        }
    }

    pub fn class(&self) -> ActionClass {
        match self {
            ActionKind::MoveLeft | ActionKind::MoveRight => ActionClass::Move,
            ActionKind::UprisingStrike => ActionClass::UprisingStrike,
            ActionKind::EnergyBlast => ActionClass::EnergyBlast,
            ActionKind::LightPunch => ActionClass::LightPunch,
            ActionKind::HeavyPunch => ActionClass::HeavyPunch,
            ActionKind::LightKick => ActionClass::LightKick,
            ActionKind::HeavyKick => ActionClass::HeavyKick,
            ActionKind::SpinLeft | ActionKind::SpinRight => ActionClass::Spin,
        }
    }

    pub fn is_rotation(&self) -> bool {
        self.category() == ActionCategory::Rotation
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of enabled actions, one bit per `ActionKind`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionSet(u16);

impl ActionSet {
    pub fn all() -> Self {
        Self((1 << ActionKind::COUNT) - 1)
    }

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, action: ActionKind) -> Self {
        self.insert(action);
        self
    }

    pub fn insert(&mut self, action: ActionKind) {
        self.0 |= 1 << action.slot();
    }

    pub fn contains(&self, action: ActionKind) -> bool {
        self.0 & (1 << action.slot()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + '_ {
        ActionKind::ALL.iter().copied().filter(move |a| self.contains(*a))
    }
}

impl Default for ActionSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<ActionKind> for ActionSet {
    fn from_iter<I: IntoIterator<Item = ActionKind>>(iter: I) -> Self {
        let mut set = ActionSet::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}
