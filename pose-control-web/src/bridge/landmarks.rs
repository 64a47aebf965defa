//! Landmark decoding for the JS bridge
//!
//! JavaScript hands over MediaPipe's 33 pose landmarks as one flat
//! Float32Array. Only the vocabulary subset is kept.

use crate::error::FrameError;
use crate::pose::{Landmark, PoseFrame, MEDIAPIPE_LANDMARK_COUNT};

/// x, y, z
pub const XYZ_LEN: usize = MEDIAPIPE_LANDMARK_COUNT * 3;
/// x, y, z, visibility
pub const XYZV_LEN: usize = MEDIAPIPE_LANDMARK_COUNT * 4;

/// Decode a flat landmark array.
///
/// - empty: no person detected, `Ok(None)`
/// - 99 values: x/y/z per landmark, visibility 1.0
/// - 132 values: x/y/z/visibility per landmark
///
/// Non-finite points are dropped (treated as missing).
pub fn decode_landmarks(data: &[f32], timestamp: f64) -> Result<Option<PoseFrame>, FrameError> {
    if !timestamp.is_finite() {
        return Err(FrameError::NonFiniteTimestamp(timestamp));
    }

    let stride = match data.len() {
        0 => return Ok(None),
        XYZ_LEN => 3,
        XYZV_LEN => 4,
        other => return Err(FrameError::BadLength(other)),
    };

    let mut points = [Landmark::default(); MEDIAPIPE_LANDMARK_COUNT];
    for (point, chunk) in points.iter_mut().zip(data.chunks_exact(stride)) {
        *point = Landmark {
            x: chunk[0],
            y: chunk[1],
            z: chunk[2],
            visibility: if stride == 4 { chunk[3] } else { 1.0 },
        };
    }

    Ok(Some(PoseFrame::from_mediapipe(timestamp, &points)))
}
