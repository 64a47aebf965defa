//! Per-action cooldown durations

use crate::classifier::ActionKind;

/// Minimum seconds between acceptances, indexed by action
#[derive(Clone, Debug, PartialEq)]
pub struct CooldownTable {
    durations: [f32; ActionKind::COUNT],
}

impl CooldownTable {
    /// Spins get `rotation_s`, everything else `action_s`
    pub fn new(action_s: f32, rotation_s: f32) -> Self {
        let mut durations = [action_s; ActionKind::COUNT];
        for action in ActionKind::ALL {
            if action.is_rotation() {
                durations[action.slot()] = rotation_s;
            }
        }
        Self { durations }
    }

    pub fn uniform(seconds: f32) -> Self {
        Self::new(seconds, seconds)
    }

    pub fn with_override(mut self, action: ActionKind, seconds: f32) -> Self {
        self.set(action, seconds);
        self
    }

    pub fn set(&mut self, action: ActionKind, seconds: f32) {
        self.durations[action.slot()] = seconds;
    }

    pub fn get(&self, action: ActionKind) -> f32 {
        self.durations[action.slot()]
    }
}

impl Default for CooldownTable {
    fn default() -> Self {
        Self::new(0.5, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        let table = CooldownTable::default();
        assert_eq!(table.get(ActionKind::LightPunch), 0.5);
        assert_eq!(table.get(ActionKind::MoveLeft), 0.5);
        assert_eq!(table.get(ActionKind::SpinLeft), 1.0);
        assert_eq!(table.get(ActionKind::SpinRight), 1.0);
    }

    #[test]
    fn test_override_touches_one_action() {
        let table = CooldownTable::uniform(0.2).with_override(ActionKind::HeavyKick, 0.8);
        assert_eq!(table.get(ActionKind::HeavyKick), 0.8);
        assert_eq!(table.get(ActionKind::LightKick), 0.2);
        assert_eq!(table.get(ActionKind::SpinRight), 0.2);
    }
}
