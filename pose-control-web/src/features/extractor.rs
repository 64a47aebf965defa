//! Per-frame feature extraction
//!
//! `FeatureExtractor::extract` is a pure function of the current frame and
//! the explicit state returned by the previous call. Nothing is remembered
//! anywhere else.

use serde::{Deserialize, Serialize};

use super::angles::{angle_delta, orientation_angle, tilt_angle};
use super::velocity::VerticalHistory;
use crate::pose::{LandmarkId, PoseFrame};

/// Which side of the body faces the camera
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
}

/// Derived per-frame scalars.
///
/// Every field is `None` when a landmark it needs is missing, which
/// disables the rules that read it for this frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FeatureSnapshot {
    /// Frame timestamp in seconds
    pub timestamp: f64,
    pub facing: Option<Facing>,
    /// Lean of the facing-side hip -> shoulder segment (degrees)
    pub tilt_angle: Option<f32>,
    /// Absolute shoulder-line angle (degrees)
    pub orientation_angle: Option<f32>,
    /// Change in `orientation_angle` since last frame, in (-180, 180]
    pub orientation_delta: Option<f32>,

    /// right_shoulder.y - right_wrist.y (positive = wrist above shoulder)
    pub right_wrist_lift: Option<f32>,
    /// left_shoulder.y - left_wrist.y
    pub left_wrist_lift: Option<f32>,
    /// right_shoulder.x - right_wrist.x (positive = wrist out to image left)
    pub right_wrist_reach: Option<f32>,
    /// left_wrist.x - left_shoulder.x (positive = wrist out to image right)
    pub left_wrist_reach: Option<f32>,

    /// hip.y - knee.y
    pub knee_raise_left: Option<f32>,
    pub knee_raise_right: Option<f32>,
    pub knee_velocity_left: Option<f32>,
    pub knee_velocity_right: Option<f32>,

    /// knee.y - min(ankle.y, heel.y) (positive = foot above knee)
    pub ankle_height_left: Option<f32>,
    pub ankle_height_right: Option<f32>,
    pub ankle_velocity_left: Option<f32>,
    pub ankle_velocity_right: Option<f32>,
}

/// What the extractor carries from one frame to the next
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractorState {
    history: VerticalHistory,
    previous_orientation: Option<f32>,
    frames: u64,
}

impl ExtractorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// No frame has been extracted yet
    pub fn is_fresh(&self) -> bool {
        self.frames == 0
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Turns one `PoseFrame` into a `FeatureSnapshot`.
///
/// Every landmark present in the frame is trusted; visibility gating
/// happens before the frame gets here.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn extract(&self, frame: &PoseFrame, prior: &ExtractorState) -> (FeatureSnapshot, ExtractorState) {
        let get = |id: LandmarkId| frame.get(id);

        let left_shoulder = get(LandmarkId::LeftShoulder);
        let right_shoulder = get(LandmarkId::RightShoulder);
        let left_hip = get(LandmarkId::LeftHip);
        let right_hip = get(LandmarkId::RightHip);

        let facing = match (left_shoulder, right_shoulder) {
            (Some(ls), Some(rs)) => Some(if rs.z < ls.z { Facing::Right } else { Facing::Left }),
            _ => None,
        };

        let tilt = facing.and_then(|side| -> Option<f32> {
            let (hip, shoulder) = match side {
                Facing::Right => (right_hip, right_shoulder),
                Facing::Left => (left_hip, left_shoulder),
            };
            Some(tilt_angle(&hip?, &shoulder?))
        });

        let orientation = match (left_shoulder, right_shoulder) {
            (Some(ls), Some(rs)) => Some(orientation_angle(&ls, &rs)),
            _ => None,
        };
        let orientation_delta = match (orientation, prior.previous_orientation) {
            (Some(current), Some(previous)) => Some(angle_delta(current, previous)),
            _ => None,
        };

        let lift = |shoulder: LandmarkId, wrist: LandmarkId| -> Option<f32> {
            Some(get(shoulder)?.y - get(wrist)?.y)
        };
        let knee_raise = |hip: LandmarkId, knee: LandmarkId| -> Option<f32> {
            Some(get(hip)?.y - get(knee)?.y)
        };
        let ankle_height = |knee: LandmarkId, ankle: LandmarkId, heel: LandmarkId| -> Option<f32> {
            let knee_y = get(knee)?.y;
            let foot_y = match (get(ankle), get(heel)) {
                (Some(a), Some(h)) => a.y.min(h.y),
                (Some(a), None) => a.y,
                (None, Some(h)) => h.y,
                (None, None) => return None,
            };
            Some(knee_y - foot_y)
        };
        let foot_velocity = |ankle: LandmarkId, heel: LandmarkId| {
            prior
                .history
                .velocity(ankle, frame)
                .or_else(|| prior.history.velocity(heel, frame))
        };

        let snapshot = FeatureSnapshot {
            timestamp: frame.timestamp,
            facing,
            tilt_angle: tilt,
            orientation_angle: orientation,
            orientation_delta,
            right_wrist_lift: lift(LandmarkId::RightShoulder, LandmarkId::RightWrist),
            left_wrist_lift: lift(LandmarkId::LeftShoulder, LandmarkId::LeftWrist),
            right_wrist_reach: right_shoulder
                .zip(get(LandmarkId::RightWrist))
                .map(|(s, w)| s.x - w.x),
            left_wrist_reach: left_shoulder
                .zip(get(LandmarkId::LeftWrist))
                .map(|(s, w)| w.x - s.x),
            knee_raise_left: knee_raise(LandmarkId::LeftHip, LandmarkId::LeftKnee),
            knee_raise_right: knee_raise(LandmarkId::RightHip, LandmarkId::RightKnee),
            knee_velocity_left: prior.history.velocity(LandmarkId::LeftKnee, frame),
            knee_velocity_right: prior.history.velocity(LandmarkId::RightKnee, frame),
            ankle_height_left: ankle_height(LandmarkId::LeftKnee, LandmarkId::LeftAnkle, LandmarkId::LeftHeel),
            ankle_height_right: ankle_height(LandmarkId::RightKnee, LandmarkId::RightAnkle, LandmarkId::RightHeel),
            ankle_velocity_left: foot_velocity(LandmarkId::LeftAnkle, LandmarkId::LeftHeel),
            ankle_velocity_right: foot_velocity(LandmarkId::RightAnkle, LandmarkId::RightHeel),
        };

        let next = ExtractorState {
            history: prior.history.advanced(frame),
            previous_orientation: orientation,
            frames: prior.frames + 1,
        };

        (snapshot, next)
    }
}
