//! Rule table - one predicate per action, in priority order
//!
//! Each rule reads a `FeatureSnapshot` and either names an action or passes.
//! A rule whose features are `None` (landmark missing) always passes.

use serde::{Deserialize, Serialize};

use super::action::{ActionCategory, ActionKind, ActionSet};
use crate::features::{Facing, FeatureSnapshot};

/// Which joint the kick rules watch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KickSource {
    /// Knee raised above the hip line and rising
    #[default]
    Knee,
    /// Ankle or heel lifted above the knee and rising
    Ankle,
}

/// Rule thresholds (degrees / normalized image units)
#[derive(Clone, Debug, PartialEq)]
pub struct Thresholds {
    pub tilt_deg: f32,
    pub rotation_deg: f32,
    pub uprising_lift: f32,
    pub energy_blast_lift: f32,
    pub punch_offset: f32,
    pub kick_height: f32,
    pub kick_speed: f32,
    pub ankle_height: f32,
    pub kick_source: KickSource,
    /// Flip the move direction when facing left
    pub facing_aware_tilt: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            tilt_deg: 10.0,
            rotation_deg: 15.0,
            uprising_lift: 0.05,
            energy_blast_lift: 0.0,
            punch_offset: 0.10,
            kick_height: 0.05,
            kick_speed: 0.02,
            ankle_height: 0.02,
            kick_source: KickSource::Knee,
            facing_aware_tilt: false,
        }
    }
}

pub type RuleFn = fn(&FeatureSnapshot, &Thresholds) -> Option<ActionKind>;

/// A named predicate and the category it belongs to
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub category: ActionCategory,
    pub eval: RuleFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

fn exceeds(value: Option<f32>, threshold: f32) -> bool {
    value.map_or(false, |v| v > threshold)
}

fn uprising_strike(f: &FeatureSnapshot, t: &Thresholds) -> Option<ActionKind> {
    exceeds(f.right_wrist_lift, t.uprising_lift).then_some(ActionKind::UprisingStrike)
}

fn energy_blast(f: &FeatureSnapshot, t: &Thresholds) -> Option<ActionKind> {
    exceeds(f.left_wrist_lift, t.energy_blast_lift).then_some(ActionKind::EnergyBlast)
}

fn light_punch(f: &FeatureSnapshot, t: &Thresholds) -> Option<ActionKind> {
    exceeds(f.right_wrist_reach, t.punch_offset).then_some(ActionKind::LightPunch)
}

fn heavy_punch(f: &FeatureSnapshot, t: &Thresholds) -> Option<ActionKind> {
    exceeds(f.left_wrist_reach, t.punch_offset).then_some(ActionKind::HeavyPunch)
}

fn kick(
    t: &Thresholds,
    knee_raise: Option<f32>,
    knee_velocity: Option<f32>,
    ankle_height: Option<f32>,
    ankle_velocity: Option<f32>,
) -> bool {
    match t.kick_source {
        KickSource::Knee => exceeds(knee_raise, t.kick_height) && exceeds(knee_velocity, t.kick_speed),
        KickSource::Ankle => exceeds(ankle_height, t.ankle_height) && exceeds(ankle_velocity, t.kick_speed),
    }
}

fn light_kick(f: &FeatureSnapshot, t: &Thresholds) -> Option<ActionKind> {
    kick(
        t,
        f.knee_raise_left,
        f.knee_velocity_left,
        f.ankle_height_left,
        f.ankle_velocity_left,
    )
    .then_some(ActionKind::LightKick)
}

fn heavy_kick(f: &FeatureSnapshot, t: &Thresholds) -> Option<ActionKind> {
    kick(
        t,
        f.knee_raise_right,
        f.knee_velocity_right,
        f.ankle_height_right,
        f.ankle_velocity_right,
    )
    .then_some(ActionKind::HeavyKick)
}

// The scripts compute facing but map positive tilt to Right on both sides.
// That literal mapping is the default; `facing_aware_tilt` opts into the flip.
fn tilt_move(f: &FeatureSnapshot, t: &Thresholds) -> Option<ActionKind> {
    let tilt = f.tilt_angle?;
    if tilt.abs() <= t.tilt_deg {
        return None;
    }
    let mut right = tilt > 0.0;
    if t.facing_aware_tilt && f.facing == Some(Facing::Left) {
        right = !right;
    }
    Some(if right { ActionKind::MoveRight } else { ActionKind::MoveLeft })
}

fn spin(f: &FeatureSnapshot, t: &Thresholds) -> Option<ActionKind> {
    let delta = f.orientation_delta?;
    if delta.abs() <= t.rotation_deg {
        return None;
    }
    Some(if delta > 0.0 { ActionKind::SpinRight } else { ActionKind::SpinLeft })
}

const fn rule(name: &'static str, category: ActionCategory, eval: RuleFn) -> Rule {
    Rule { name, category, eval }
}

/// Combat rules, highest priority first
pub const COMBAT_RULES: [Rule; 6] = [
    rule("uprising_strike", ActionCategory::Combat, uprising_strike),
    rule("energy_blast", ActionCategory::Combat, energy_blast),
    rule("light_punch", ActionCategory::Combat, light_punch),
    rule("heavy_punch", ActionCategory::Combat, heavy_punch),
    rule("light_kick", ActionCategory::Combat, light_kick),
    rule("heavy_kick", ActionCategory::Combat, heavy_kick),
];

pub const MOVE_RULE: Rule = rule("tilt_move", ActionCategory::Movement, tilt_move);

pub const SPIN_RULE: Rule = rule("spin", ActionCategory::Rotation, spin);

/// Everything in one chain, for single-candidate mode
pub const PRIORITY_TABLE: [Rule; 8] = [
    COMBAT_RULES[0],
    COMBAT_RULES[1],
    COMBAT_RULES[2],
    COMBAT_RULES[3],
    COMBAT_RULES[4],
    COMBAT_RULES[5],
    MOVE_RULE,
    SPIN_RULE,
];

/// First enabled action named by `rules`, in table order
pub fn first_match(
    rules: &[Rule],
    features: &FeatureSnapshot,
    thresholds: &Thresholds,
    enabled: &ActionSet,
) -> Option<ActionKind> {
    rules
        .iter()
        .filter_map(|rule| (rule.eval)(features, thresholds))
        .find(|action| enabled.contains(*action))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(rules: &[Rule], f: &FeatureSnapshot) -> Option<ActionKind> {
        first_match(rules, f, &Thresholds::default(), &ActionSet::all())
    }

    #[test]
    fn test_uprising_threshold_is_strict() {
        let mut f = FeatureSnapshot::default();
        f.right_wrist_lift = Some(0.10);
        assert_eq!(eval(&PRIORITY_TABLE, &f), Some(ActionKind::UprisingStrike));

        f.right_wrist_lift = Some(0.04);
        assert_eq!(eval(&PRIORITY_TABLE, &f), None);
    }

    #[test]
    fn test_priority_order() {
        let mut f = FeatureSnapshot::default();
        f.right_wrist_reach = Some(0.2);
        f.left_wrist_lift = Some(0.01);
        assert_eq!(eval(&PRIORITY_TABLE, &f), Some(ActionKind::EnergyBlast));

        f.right_wrist_lift = Some(0.1);
        assert_eq!(eval(&PRIORITY_TABLE, &f), Some(ActionKind::UprisingStrike));
    }

    #[test]
    fn test_knee_kick_needs_height_and_speed() {
        let mut f = FeatureSnapshot::default();
        f.knee_raise_left = Some(0.08);
        f.knee_velocity_left = Some(0.01);
        assert_eq!(eval(&COMBAT_RULES, &f), None);

        f.knee_velocity_left = Some(0.03);
        assert_eq!(eval(&COMBAT_RULES, &f), Some(ActionKind::LightKick));

        let mut f = FeatureSnapshot::default();
        f.knee_raise_right = Some(0.08);
        f.knee_velocity_right = Some(0.03);
        assert_eq!(eval(&COMBAT_RULES, &f), Some(ActionKind::HeavyKick));
    }

    #[test]
    fn test_ankle_kick_source() {
        let thresholds = Thresholds {
            kick_source: KickSource::Ankle,
            ..Thresholds::default()
        };
        let mut f = FeatureSnapshot::default();
        f.knee_raise_left = Some(0.08);
        f.knee_velocity_left = Some(0.03);
        assert_eq!(first_match(&COMBAT_RULES, &f, &thresholds, &ActionSet::all()), None);

        f.ankle_height_left = Some(0.03);
        f.ankle_velocity_left = Some(0.03);
        assert_eq!(
            first_match(&COMBAT_RULES, &f, &thresholds, &ActionSet::all()),
            Some(ActionKind::LightKick)
        );
    }

    #[test]
    fn test_tilt_direction_ignores_facing_by_default() {
        let mut f = FeatureSnapshot::default();
        f.tilt_angle = Some(12.0);
        f.facing = Some(Facing::Left);
        assert_eq!(eval(&[MOVE_RULE], &f), Some(ActionKind::MoveRight));

        f.tilt_angle = Some(-12.0);
        assert_eq!(eval(&[MOVE_RULE], &f), Some(ActionKind::MoveLeft));

        f.tilt_angle = Some(10.0);
        assert_eq!(eval(&[MOVE_RULE], &f), None);
    }

    #[test]
    fn test_facing_aware_tilt_flips_when_facing_left() {
        let thresholds = Thresholds {
            facing_aware_tilt: true,
            ..Thresholds::default()
        };
        let mut f = FeatureSnapshot::default();
        f.tilt_angle = Some(12.0);
        f.facing = Some(Facing::Left);
        let all = ActionSet::all();
        assert_eq!(first_match(&[MOVE_RULE], &f, &thresholds, &all), Some(ActionKind::MoveLeft));

        f.facing = Some(Facing::Right);
        assert_eq!(first_match(&[MOVE_RULE], &f, &thresholds, &all), Some(ActionKind::MoveRight));
    }

    #[test]
    fn test_spin_direction_by_sign() {
        let mut f = FeatureSnapshot::default();
        f.orientation_delta = Some(20.0);
        assert_eq!(eval(&[SPIN_RULE], &f), Some(ActionKind::SpinRight));
        f.orientation_delta = Some(-155.0);
        assert_eq!(eval(&[SPIN_RULE], &f), Some(ActionKind::SpinLeft));
        f.orientation_delta = Some(2.0);
        assert_eq!(eval(&[SPIN_RULE], &f), None);
    }

    #[test]
    fn test_disabled_action_falls_through() {
        let mut f = FeatureSnapshot::default();
        f.right_wrist_lift = Some(0.1);
        f.right_wrist_reach = Some(0.2);
        let enabled: ActionSet = [ActionKind::LightPunch].into_iter().collect();
        assert_eq!(
            first_match(&PRIORITY_TABLE, &f, &Thresholds::default(), &enabled),
            Some(ActionKind::LightPunch)
        );
    }

    #[test]
    fn test_empty_snapshot_matches_nothing() {
        assert_eq!(eval(&PRIORITY_TABLE, &FeatureSnapshot::default()), None);
    }
}
