//! Frame-at-a-time control engine
//!
//! `Engine` is the immutable pipeline (extract -> classify -> gate -> chord).
//! `SessionState` is everything that changes between frames. `ControlSession`
//! bundles the two with the config they were built from.

use log::{debug, info, warn};
use serde::Serialize;

use super::stats::SessionStats;
use crate::actuation::{ChordMap, KeyChord};
use crate::classifier::{ActionClassifier, ActionKind, Candidates};
use crate::config::EngineConfig;
use crate::cooldown::{CooldownManager, CooldownPhase, CooldownState, GateDecision, SuppressReason};
use crate::error::ConfigError;
use crate::features::{ExtractorState, FeatureExtractor, FeatureSnapshot};
use crate::pose::{LandmarkSmoother, PoseFrame};

/// How much of the body the detector reported
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Detection {
    /// Every vocabulary landmark present
    Full,
    /// Some landmarks missing; rules that need them are skipped
    Partial,
    /// No person in frame
    None,
}

/// An accepted action and the chord to press for it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionEvent {
    pub action: ActionKind,
    pub timestamp: f64,
    pub chord: KeyChord,
}

/// Result of one tick
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    pub detection: Detection,
    pub candidates: Candidates,
    pub suppressed: Vec<(ActionKind, SuppressReason)>,
    pub event: Option<ActionEvent>,
    pub features: Option<FeatureSnapshot>,
}

impl TickOutcome {
    fn no_detection() -> Self {
        Self {
            detection: Detection::None,
            candidates: Candidates::default(),
            suppressed: Vec::new(),
            event: None,
            features: None,
        }
    }

    pub fn accepted(&self) -> Option<ActionKind> {
        self.event.as_ref().map(|e| e.action)
    }
}

/// Mutable per-session memory
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub extractor: ExtractorState,
    pub cooldown: CooldownState,
    pub smoother: Option<LandmarkSmoother>,
    pub stats: SessionStats,
}

impl SessionState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            smoother: config.smoothing.map(LandmarkSmoother::new),
            ..Self::default()
        }
    }
}

/// The configured pipeline. Holds no per-frame state.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    min_visibility: f32,
    extractor: FeatureExtractor,
    classifier: ActionClassifier,
    gate: CooldownManager,
    chords: ChordMap,
}

impl Engine {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            min_visibility: config.min_visibility,
            extractor: FeatureExtractor,
            classifier: config.classifier(),
            gate: config.cooldown_manager(),
            chords: config.chord_map(),
        }
    }

    /// Run one frame through the pipeline.
    ///
    /// `None` (or a frame with nothing visible) is a no-detection tick:
    /// no candidate, and extractor and cooldown state are left as they were.
    /// A tick whose clock is not finite is treated the same way.
    pub fn tick(&self, state: &mut SessionState, frame: Option<&PoseFrame>, now: f64) -> TickOutcome {
        state.stats.frames += 1;

        if !now.is_finite() {
            warn!("ignoring tick at non-finite time {}", now);
            state.stats.no_detection += 1;
            return TickOutcome::no_detection();
        }

        let frame = match frame.map(|frame| frame.gated(self.min_visibility)) {
            Some(frame) if !frame.is_empty() => frame,
            _ => {
                state.stats.no_detection += 1;
                return TickOutcome::no_detection();
            }
        };

        let detection = if frame.is_complete() {
            Detection::Full
        } else {
            debug!("partial frame, missing {:?}", frame.missing().collect::<Vec<_>>());
            state.stats.partial_detection += 1;
            Detection::Partial
        };

        let frame = match state.smoother.as_mut() {
            Some(smoother) => smoother.apply(&frame),
            None => frame,
        };

        let (features, next) = self.extractor.extract(&frame, &state.extractor);
        state.extractor = next;

        if let Some(released) = self.gate.release_expired(&mut state.cooldown, now) {
            debug!("released {} at {:.3}", released, now);
        }

        let candidates = self.classifier.candidates(&features);
        state.stats.candidates += candidates.len() as u64;
        if candidates.is_empty() {
            if let Some(released) = self.gate.release_idle(&mut state.cooldown) {
                debug!("released {} on idle frame", released);
            }
        }

        let mut event = None;
        let mut suppressed = Vec::new();
        for candidate in candidates.iter() {
            match self.gate.offer(&mut state.cooldown, candidate, now) {
                GateDecision::Accepted => {
                    debug!("accepted {} at {:.3}", candidate, now);
                    state.stats.record_accepted(candidate);
                    event = Some(ActionEvent {
                        action: candidate,
                        timestamp: now,
                        chord: self.chords.chord_for(candidate),
                    });
                    break;
                }
                GateDecision::Suppressed(reason) => {
                    debug!("suppressed {} at {:.3}: {:?}", candidate, now, reason);
                    state.stats.suppressed += 1;
                    suppressed.push((candidate, reason));
                }
            }
        }

        TickOutcome {
            detection,
            candidates,
            suppressed,
            event,
            features: Some(features),
        }
    }
}

/// Engine + state + the config both came from
#[derive(Clone, Debug)]
pub struct ControlSession {
    config: EngineConfig,
    engine: Engine,
    state: SessionState,
}

impl Default for ControlSession {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            engine: Engine::from_config(&config),
            state: SessionState::new(&config),
            config,
        }
    }
}

impl ControlSession {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            engine: Engine::from_config(&config),
            state: SessionState::new(&config),
            config,
        })
    }

    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        Self::new(EngineConfig::preset(name)?)
    }

    pub fn tick(&mut self, frame: Option<&PoseFrame>, now: f64) -> TickOutcome {
        self.engine.tick(&mut self.state, frame, now)
    }

    /// Forget all per-frame memory and counters
    pub fn reset(&mut self) {
        info!("session reset after {} frames", self.state.stats.frames);
        self.state = SessionState::new(&self.config);
    }

    /// Swap in a new config. The session starts over.
    pub fn reconfigure(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        info!("session reconfigured: mode {:?}", config.mode);
        self.engine = Engine::from_config(&config);
        self.state = SessionState::new(&config);
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.state.stats
    }

    pub fn phase(&self) -> CooldownPhase {
        self.engine.gate.phase(&self.state.cooldown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, LandmarkId, SmoothingConfig};

    fn arms_down(t: f64) -> PoseFrame {
        PoseFrame::new(t)
            .with(LandmarkId::LeftShoulder, Landmark::new(0.6, 0.40, -0.1))
            .with(LandmarkId::RightShoulder, Landmark::new(0.4, 0.40, -0.2))
            .with(LandmarkId::LeftWrist, Landmark::new(0.62, 0.60, 0.0))
            .with(LandmarkId::RightWrist, Landmark::new(0.38, 0.60, 0.0))
    }

    fn right_arm_up(t: f64) -> PoseFrame {
        arms_down(t).with(LandmarkId::RightWrist, Landmark::new(0.38, 0.30, 0.0))
    }

    #[test]
    fn test_no_detection_leaves_state_alone() {
        let mut session = ControlSession::default();
        session.tick(Some(&right_arm_up(0.0)), 0.0);
        let before = session.state().cooldown.clone();
        let frames_before = session.state().extractor.frames();

        let outcome = session.tick(None, 0.1);
        assert_eq!(outcome.detection, Detection::None);
        assert!(outcome.event.is_none());
        assert_eq!(session.state().cooldown, before);
        assert_eq!(session.state().extractor.frames(), frames_before);
        assert_eq!(session.stats().no_detection, 1);
    }

    #[test]
    fn test_empty_frame_counts_as_no_detection() {
        let mut session = ControlSession::default();
        let outcome = session.tick(Some(&PoseFrame::new(0.0)), 0.0);
        assert_eq!(outcome.detection, Detection::None);
        assert_eq!(session.state().extractor.frames(), 0);
    }

    #[test]
    fn test_partial_frame_still_classifies() {
        let mut session = ControlSession::default();
        let outcome = session.tick(Some(&right_arm_up(0.0)), 0.0);
        assert_eq!(outcome.detection, Detection::Partial);
        assert_eq!(outcome.accepted(), Some(ActionKind::UprisingStrike));
        assert_eq!(session.stats().partial_detection, 1);
    }

    #[test]
    fn test_event_carries_chord() {
        let mut session = ControlSession::default();
        let outcome = session.tick(Some(&right_arm_up(0.0)), 0.0);
        let event = outcome.event.unwrap();
        assert_eq!(event.chord.keys.len(), 3);
        assert_eq!(event.timestamp, 0.0);
        assert_eq!(session.phase(), CooldownPhase::Suppressing(ActionKind::UprisingStrike));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = ControlSession::default();
        session.tick(Some(&right_arm_up(0.0)), 0.0);
        session.reset();
        assert_eq!(session.phase(), CooldownPhase::Idle);
        assert_eq!(session.stats(), &SessionStats::default());
        assert!(session.state().extractor.is_fresh());
    }

    #[test]
    fn test_reconfigure_rejects_bad_config() {
        let mut session = ControlSession::default();
        let bad = EngineConfig {
            key_hold_s: 0.0,
            ..EngineConfig::default()
        };
        assert!(session.reconfigure(bad).is_err());
        assert!(session.reconfigure(EngineConfig::punch()).is_ok());
        assert_eq!(session.config(), &EngineConfig::punch());
    }

    #[test]
    fn test_visibility_gate_hides_low_confidence_frame() {
        let config = EngineConfig {
            min_visibility: 0.5,
            ..EngineConfig::default()
        };
        let mut session = ControlSession::new(config).unwrap();
        let mut faint = PoseFrame::new(0.0);
        faint.set(LandmarkId::Nose, Landmark::new(0.5, 0.1, 0.0).with_visibility(0.2));
        let outcome = session.tick(Some(&faint), 0.0);
        assert_eq!(outcome.detection, Detection::None);
    }

    #[test]
    fn test_low_visibility_landmark_is_dropped_before_extraction() {
        let config = EngineConfig {
            min_visibility: 0.5,
            ..EngineConfig::default()
        };
        let mut session = ControlSession::new(config).unwrap();
        let frame = right_arm_up(0.0).with(
            LandmarkId::RightWrist,
            Landmark::new(0.38, 0.30, 0.0).with_visibility(0.1),
        );
        let outcome = session.tick(Some(&frame), 0.0);
        let features = outcome.features.unwrap();
        assert_eq!(features.right_wrist_lift, None);
        assert!(features.left_wrist_lift.is_some());
        assert_eq!(outcome.detection, Detection::Partial);
        assert!(outcome.event.is_none());
    }

    fn with_legs(t: f64, left_knee_y: f32) -> PoseFrame {
        arms_down(t)
            .with(LandmarkId::LeftHip, Landmark::new(0.58, 0.60, 0.0))
            .with(LandmarkId::RightHip, Landmark::new(0.42, 0.60, 0.0))
            .with(LandmarkId::LeftKnee, Landmark::new(0.57, left_knee_y, 0.0))
            .with(LandmarkId::RightKnee, Landmark::new(0.43, 0.75, 0.0))
    }

    #[test]
    fn test_smoothing_feeds_knee_velocity() {
        let dt = 1.0 / 30.0;
        let mut raw = ControlSession::default();
        let mut smoothed = ControlSession::new(EngineConfig {
            smoothing: Some(SmoothingConfig::default()),
            ..EngineConfig::default()
        })
        .unwrap();

        for session in [&mut raw, &mut smoothed] {
            session.tick(Some(&with_legs(0.0, 0.75)), 0.0);
        }
        let raw_velocity = raw
            .tick(Some(&with_legs(dt, 0.50)), dt)
            .features
            .and_then(|f| f.knee_velocity_left)
            .unwrap_or_default();
        let smooth_velocity = smoothed
            .tick(Some(&with_legs(dt, 0.50)), dt)
            .features
            .and_then(|f| f.knee_velocity_left)
            .unwrap_or_default();

        assert!((raw_velocity - 0.25).abs() < 1e-5);
        assert!(smooth_velocity > 0.0 && smooth_velocity < raw_velocity, "v = {}", smooth_velocity);
    }

    #[test]
    fn test_smoothing_restarts_after_dropout() {
        let dt = 1.0 / 30.0;
        let mut session = ControlSession::new(EngineConfig {
            smoothing: Some(SmoothingConfig::default()),
            ..EngineConfig::default()
        })
        .unwrap();
        session.tick(Some(&with_legs(0.0, 0.75)), 0.0);
        session.tick(Some(&with_legs(dt, 0.74)), dt);

        let mut dropped = with_legs(2.0 * dt, 0.75);
        dropped.remove(LandmarkId::LeftKnee);
        let outcome = session.tick(Some(&dropped), 2.0 * dt);
        assert_eq!(outcome.features.and_then(|f| f.knee_velocity_left), None);

        // back at a new height: first sample passes through, velocity starts over
        let features = session
            .tick(Some(&with_legs(3.0 * dt, 0.50)), 3.0 * dt)
            .features
            .unwrap();
        assert_eq!(features.knee_velocity_left, Some(0.0));
        let raise = features.knee_raise_left.unwrap_or_default();
        assert!((raise - 0.10).abs() < 1e-4, "raise = {}", raise);
    }
}
