//! Pose module - landmark vocabulary, frames and optional smoothing
//!
//! Re-exports only. All logic in submodules.

mod landmarks;
mod smoothing;

pub use landmarks::{Landmark, LandmarkId, PoseFrame, MEDIAPIPE_LANDMARK_COUNT};
pub use smoothing::{LandmarkSmoother, SmoothingConfig};
