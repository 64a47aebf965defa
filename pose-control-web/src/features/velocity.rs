//! Vertical velocity from one-frame finite differences
//!
//! Velocity is in normalized units per frame, positive = moving up the image.
//! A joint with no previous sample has velocity 0.

use crate::pose::{LandmarkId, PoseFrame};

/// Joints whose previous y-coordinate is remembered between frames
pub const TRACKED_JOINTS: [LandmarkId; 8] = [
    LandmarkId::LeftWrist,
    LandmarkId::RightWrist,
    LandmarkId::LeftKnee,
    LandmarkId::RightKnee,
    LandmarkId::LeftAnkle,
    LandmarkId::RightAnkle,
    LandmarkId::LeftHeel,
    LandmarkId::RightHeel,
];

/// `previous - current`, or 0 without a previous sample
pub fn vertical_velocity(previous_y: Option<f32>, current_y: f32) -> f32 {
    match previous_y {
        Some(prev) => prev - current_y,
        None => 0.0,
    }
}

/// Previous-frame y-coordinates of the tracked joints
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VerticalHistory {
    previous_y: [Option<f32>; LandmarkId::COUNT],
}

impl VerticalHistory {
    pub fn previous(&self, id: LandmarkId) -> Option<f32> {
        self.previous_y[id.slot()]
    }

    /// Velocity of `id` in `frame`, or `None` if the joint is missing
    pub fn velocity(&self, id: LandmarkId, frame: &PoseFrame) -> Option<f32> {
        frame
            .get(id)
            .map(|lm| vertical_velocity(self.previous(id), lm.y))
    }

    /// History for the next frame.
    ///
    /// A joint missing from `frame` forgets its sample, so it restarts at
    /// zero velocity when it reappears.
    pub fn advanced(&self, frame: &PoseFrame) -> VerticalHistory {
        let mut next = VerticalHistory::default();
        for id in TRACKED_JOINTS {
            next.previous_y[id.slot()] = frame.get(id).map(|lm| lm.y);
        }
        next
    }

    pub fn is_empty(&self) -> bool {
        self.previous_y.iter().all(Option::is_none)
    }
}
