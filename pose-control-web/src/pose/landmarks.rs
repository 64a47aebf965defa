//! Landmark vocabulary and per-frame storage
//!
//! MediaPipe Pose emits 33 landmarks; the control rules only read the
//! 13 listed in `LandmarkId`. Anything else is dropped when a frame is built.

use serde::{Deserialize, Serialize};

// ============================================================================
// LANDMARK VOCABULARY
// ============================================================================

/// Number of landmarks produced by MediaPipe Pose
pub const MEDIAPIPE_LANDMARK_COUNT: usize = 33;

/// Landmarks the feature extractor understands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LandmarkId {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftWrist,
    RightWrist,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
}

impl LandmarkId {
    pub const COUNT: usize = 13;

    pub const ALL: [LandmarkId; Self::COUNT] = [
        LandmarkId::Nose,
        LandmarkId::LeftShoulder,
        LandmarkId::RightShoulder,
        LandmarkId::LeftHip,
        LandmarkId::RightHip,
        LandmarkId::LeftWrist,
        LandmarkId::RightWrist,
        LandmarkId::LeftKnee,
        LandmarkId::RightKnee,
        LandmarkId::LeftAnkle,
        LandmarkId::RightAnkle,
        LandmarkId::LeftHeel,
        LandmarkId::RightHeel,
    ];

    /// Index of this landmark in MediaPipe's 33-point output
    pub fn mediapipe_index(self) -> usize {
        match self {
            LandmarkId::Nose => 0,
            LandmarkId::LeftShoulder => 11,
            LandmarkId::RightShoulder => 12,
            LandmarkId::LeftWrist => 15,
            LandmarkId::RightWrist => 16,
            LandmarkId::LeftHip => 23,
            LandmarkId::RightHip => 24,
            LandmarkId::LeftKnee => 25,
            LandmarkId::RightKnee => 26,
            LandmarkId::LeftAnkle => 27,
            LandmarkId::RightAnkle => 28,
            LandmarkId::LeftHeel => 29,
            LandmarkId::RightHeel => 30,
        }
    }

    /// Dense slot used by fixed-size per-landmark arrays
    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            LandmarkId::Nose => "NOSE",
            LandmarkId::LeftShoulder => "LEFT_SHOULDER",
            LandmarkId::RightShoulder => "RIGHT_SHOULDER",
            LandmarkId::LeftHip => "LEFT_HIP",
            LandmarkId::RightHip => "RIGHT_HIP",
            LandmarkId::LeftWrist => "LEFT_WRIST",
            LandmarkId::RightWrist => "RIGHT_WRIST",
            LandmarkId::LeftKnee => "LEFT_KNEE",
            LandmarkId::RightKnee => "RIGHT_KNEE",
            LandmarkId::LeftAnkle => "LEFT_ANKLE",
            LandmarkId::RightAnkle => "RIGHT_ANKLE",
            LandmarkId::LeftHeel => "LEFT_HEEL",
            LandmarkId::RightHeel => "RIGHT_HEEL",
        }
    }
}

// ============================================================================
// LANDMARK DATA STRUCTURES
// ============================================================================

/// A single 3D landmark point (normalized coordinates)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,          // 0-1 normalized, grows rightward
    pub y: f32,          // 0-1 normalized, grows downward
    pub z: f32,          // Relative depth, more negative = closer to camera
    pub visibility: f32, // 0-1 detector confidence
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, visibility: 1.0 }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// One timestamped set of body landmarks.
///
/// Landmarks the detector did not report are `None`; rules that need them
/// are skipped for the frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Capture time in seconds
    pub timestamp: f64,
    landmarks: [Option<Landmark>; LandmarkId::COUNT],
}

impl PoseFrame {
    /// Empty frame (no landmarks detected yet)
    pub fn new(timestamp: f64) -> Self {
        Self {
            timestamp,
            landmarks: [None; LandmarkId::COUNT],
        }
    }

    /// Build from MediaPipe's full 33-point output
    pub fn from_mediapipe(timestamp: f64, points: &[Landmark; MEDIAPIPE_LANDMARK_COUNT]) -> Self {
        let mut frame = Self::new(timestamp);
        for id in LandmarkId::ALL {
            let point = points[id.mediapipe_index()];
            if point.is_finite() {
                frame.set(id, point);
            }
        }
        frame
    }

    pub fn with(mut self, id: LandmarkId, landmark: Landmark) -> Self {
        self.set(id, landmark);
        self
    }

    pub fn set(&mut self, id: LandmarkId, landmark: Landmark) {
        self.landmarks[id.slot()] = Some(landmark);
    }

    pub fn remove(&mut self, id: LandmarkId) {
        self.landmarks[id.slot()] = None;
    }

    pub fn get(&self, id: LandmarkId) -> Option<Landmark> {
        self.landmarks[id.slot()]
    }

    /// Vocabulary landmarks absent from this frame
    pub fn missing(&self) -> impl Iterator<Item = LandmarkId> + '_ {
        LandmarkId::ALL
            .iter()
            .copied()
            .filter(move |id| self.get(*id).is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.landmarks.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.iter().all(Option::is_none)
    }

    /// Copy of the frame with low-confidence landmarks removed
    pub fn gated(&self, min_visibility: f32) -> PoseFrame {
        let mut gated = self.clone();
        for slot in gated.landmarks.iter_mut() {
            if matches!(slot, Some(lm) if lm.visibility < min_visibility) {
                *slot = None;
            }
        }
        gated
    }
}
