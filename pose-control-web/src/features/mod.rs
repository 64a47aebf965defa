//! Features module - angles, velocities and the per-frame extractor
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod extractor;
mod velocity;

pub use angles::{angle_delta, normalize_angle_delta, orientation_angle, tilt_angle};
pub use extractor::{ExtractorState, Facing, FeatureExtractor, FeatureSnapshot};
pub use velocity::{vertical_velocity, VerticalHistory, TRACKED_JOINTS};
