//! Engine configuration
//!
//! Every field has a default, so a JSON config only needs the keys it
//! changes. Named presets reproduce the four single-purpose controllers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actuation::ChordMap;
use crate::classifier::{ActionClassifier, ActionKind, ActionSet, ClassifierMode, KickSource, Thresholds};
use crate::cooldown::{CooldownManager, CooldownScope, CooldownTable, HoldPolicy, ReleasePolicy};
use crate::error::ConfigError;
use crate::pose::SmoothingConfig;

pub const PRESET_NAMES: [&str; 4] = ["combined", "punch", "kick", "move"];

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mode: ClassifierMode,

    // Classifier thresholds
    pub tilt_threshold_deg: f32,
    pub rotation_threshold_deg: f32,
    pub uprising_lift_threshold: f32,
    pub energy_blast_lift_threshold: f32,
    pub punch_offset_threshold: f32,
    pub kick_height_threshold: f32,
    pub kick_speed_threshold: f32,
    pub ankle_height_threshold: f32,
    pub kick_source: KickSource,
    /// Mirror the move direction when the player faces left
    pub facing_aware_tilt: bool,
    /// `None` enables every action
    pub enabled_actions: Option<Vec<ActionKind>>,

    // Cooldown gate
    pub action_cooldown_s: f32,
    pub rotation_cooldown_s: f32,
    pub cooldown_overrides: BTreeMap<ActionKind, f32>,
    pub hold_policy: HoldPolicy,
    pub cooldown_scope: CooldownScope,
    /// `None` keeps the active action until an idle frame releases it
    pub release_window_s: Option<f32>,
    pub release_on_idle_frame: bool,

    // Input conditioning
    pub min_visibility: f32,
    /// One Euro smoothing, off when `None`
    pub smoothing: Option<SmoothingConfig>,

    // Key output
    pub key_hold_s: f32,
    pub move_hold_s: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ClassifierMode::SingleCandidatePerFrame,
            tilt_threshold_deg: 10.0,
            rotation_threshold_deg: 15.0,
            uprising_lift_threshold: 0.05,
            energy_blast_lift_threshold: 0.0,
            punch_offset_threshold: 0.10,
            kick_height_threshold: 0.05,
            kick_speed_threshold: 0.02,
            ankle_height_threshold: 0.02,
            kick_source: KickSource::Knee,
            facing_aware_tilt: false,
            enabled_actions: None,
            action_cooldown_s: 0.5,
            rotation_cooldown_s: 1.0,
            cooldown_overrides: BTreeMap::new(),
            hold_policy: HoldPolicy::AnyActive,
            cooldown_scope: CooldownScope::Global,
            release_window_s: Some(0.3),
            release_on_idle_frame: false,
            min_visibility: 0.0,
            smoothing: None,
            key_hold_s: 0.05,
            move_hold_s: 0.05,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "combined" => Ok(Self::combined()),
            "punch" => Ok(Self::punch()),
            "kick" => Ok(Self::kick()),
            "move" => Ok(Self::movement()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    /// Move, combat and spin together, one global 0.2 s clock
    pub fn combined() -> Self {
        Self {
            mode: ClassifierMode::IndependentMoveAndCombat,
            action_cooldown_s: 0.2,
            rotation_cooldown_s: 1.0,
            release_window_s: Some(0.2),
            ..Self::default()
        }
    }

    /// Arm attacks only; the held action clears on the first idle frame
    pub fn punch() -> Self {
        Self {
            enabled_actions: Some(vec![
                ActionKind::UprisingStrike,
                ActionKind::EnergyBlast,
                ActionKind::LightPunch,
                ActionKind::HeavyPunch,
            ]),
            action_cooldown_s: 0.5,
            release_window_s: None,
            release_on_idle_frame: true,
            ..Self::default()
        }
    }

    /// Kicks and spins; a different action may interrupt the held one
    pub fn kick() -> Self {
        Self {
            enabled_actions: Some(vec![
                ActionKind::LightKick,
                ActionKind::HeavyKick,
                ActionKind::SpinLeft,
                ActionKind::SpinRight,
            ]),
            action_cooldown_s: 0.2,
            rotation_cooldown_s: 1.0,
            hold_policy: HoldPolicy::SameAction,
            release_window_s: Some(0.3),
            ..Self::default()
        }
    }

    /// Lean left/right only, paced by the 0.15 s key hold
    pub fn movement() -> Self {
        Self {
            enabled_actions: Some(vec![ActionKind::MoveLeft, ActionKind::MoveRight]),
            action_cooldown_s: 0.15,
            release_window_s: Some(0.15),
            move_hold_s: 0.15,
            ..Self::default()
        }
    }

    /// Check every numeric field. Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("tilt_threshold_deg", self.tilt_threshold_deg),
            ("rotation_threshold_deg", self.rotation_threshold_deg),
            ("action_cooldown_s", self.action_cooldown_s),
            ("rotation_cooldown_s", self.rotation_cooldown_s),
            ("kick_speed_threshold", self.kick_speed_threshold),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        // Offsets may be negative (wrist level with or below the shoulder)
        let finite = [
            ("uprising_lift_threshold", self.uprising_lift_threshold),
            ("energy_blast_lift_threshold", self.energy_blast_lift_threshold),
            ("punch_offset_threshold", self.punch_offset_threshold),
            ("kick_height_threshold", self.kick_height_threshold),
            ("ankle_height_threshold", self.ankle_height_threshold),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        for &value in self.cooldown_overrides.values() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "cooldown_overrides",
                    value,
                });
            }
        }

        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(ConfigError::InvalidValue {
                field: "min_visibility",
                value: self.min_visibility,
            });
        }

        let mut positive = vec![("key_hold_s", self.key_hold_s), ("move_hold_s", self.move_hold_s)];
        if let Some(window) = self.release_window_s {
            positive.push(("release_window_s", window));
        }
        if let Some(smoothing) = &self.smoothing {
            positive.push(("smoothing.min_cutoff", smoothing.min_cutoff));
            positive.push(("smoothing.d_cutoff", smoothing.d_cutoff));
        }
        for (field, value) in positive {
            if value.is_nan() {
                return Err(ConfigError::InvalidValue { field, value });
            }
            if value <= 0.0 || value.is_infinite() {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if self.enabled_set().is_empty() {
            return Err(ConfigError::NoActionsEnabled);
        }
        Ok(())
    }

    pub fn enabled_set(&self) -> ActionSet {
        match &self.enabled_actions {
            Some(actions) => actions.iter().copied().collect(),
            None => ActionSet::all(),
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            tilt_deg: self.tilt_threshold_deg,
            rotation_deg: self.rotation_threshold_deg,
            uprising_lift: self.uprising_lift_threshold,
            energy_blast_lift: self.energy_blast_lift_threshold,
            punch_offset: self.punch_offset_threshold,
            kick_height: self.kick_height_threshold,
            kick_speed: self.kick_speed_threshold,
            ankle_height: self.ankle_height_threshold,
            kick_source: self.kick_source,
            facing_aware_tilt: self.facing_aware_tilt,
        }
    }

    pub fn cooldown_table(&self) -> CooldownTable {
        self.cooldown_overrides.iter().fold(
            CooldownTable::new(self.action_cooldown_s, self.rotation_cooldown_s),
            |table, (&action, &seconds)| table.with_override(action, seconds),
        )
    }

    pub fn release_policy(&self) -> ReleasePolicy {
        ReleasePolicy {
            window: self.release_window_s,
            on_idle_frame: self.release_on_idle_frame,
        }
    }

    pub fn classifier(&self) -> ActionClassifier {
        ActionClassifier::new(self.mode, self.thresholds(), self.enabled_set())
    }

    pub fn cooldown_manager(&self) -> CooldownManager {
        CooldownManager::new(
            self.cooldown_table(),
            self.hold_policy,
            self.cooldown_scope,
            self.release_policy(),
        )
    }

    pub fn chord_map(&self) -> ChordMap {
        ChordMap::new(self.key_hold_s, self.move_hold_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tilt_threshold_deg, 10.0);
        assert_eq!(config.rotation_cooldown_s, 1.0);
        assert_eq!(config.enabled_set(), ActionSet::all());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "mode": "independent-move-and-combat", "action_cooldown_s": 0.2,
                 "cooldown_overrides": { "heavy_kick": 0.4 } }"#,
        )
        .unwrap();
        assert_eq!(config.mode, ClassifierMode::IndependentMoveAndCombat);
        assert_eq!(config.tilt_threshold_deg, 10.0);
        let table = config.cooldown_table();
        assert_eq!(table.get(ActionKind::LightKick), 0.2);
        assert_eq!(table.get(ActionKind::HeavyKick), 0.4);
        assert_eq!(table.get(ActionKind::SpinLeft), 1.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::kick();
        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "mode": "sometimes" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_validation_errors() {
        let config = EngineConfig {
            action_cooldown_s: -1.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "action_cooldown_s", .. })
        ));

        let config = EngineConfig {
            release_window_s: Some(0.0),
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "release_window_s", .. })
        ));

        let config = EngineConfig {
            tilt_threshold_deg: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            enabled_actions: Some(vec![]),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoActionsEnabled)));
    }

    #[test]
    fn test_presets() {
        for name in PRESET_NAMES {
            let config = EngineConfig::preset(name).unwrap();
            assert!(config.validate().is_ok(), "preset {}", name);
        }
        assert!(matches!(
            EngineConfig::preset("dance"),
            Err(ConfigError::UnknownPreset(_))
        ));

        let punch = EngineConfig::punch();
        assert!(punch.enabled_set().contains(ActionKind::HeavyPunch));
        assert!(!punch.enabled_set().contains(ActionKind::LightKick));
        assert_eq!(punch.release_policy().window, None);

        let movement = EngineConfig::movement();
        assert_eq!(movement.chord_map().move_hold, 0.15);
    }
}
