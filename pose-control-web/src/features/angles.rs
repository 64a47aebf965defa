//! Body angles from landmark pairs
//!
//! All angles are in degrees. Image y grows downward, so "up" is negative y.

use crate::pose::Landmark;

/// Torso lean from vertical, measured hip -> shoulder
///
/// - 0° = standing straight
/// - positive = shoulder right of hip in the image
/// - negative = shoulder left of hip
pub fn tilt_angle(hip: &Landmark, shoulder: &Landmark) -> f32 {
    let dx = shoulder.x - hip.x;
    let dy = shoulder.y - hip.y;
    dx.atan2(-dy).to_degrees()
}

/// Direction of the shoulder line, left -> right shoulder.
///
/// Only meaningful as a frame-to-frame difference.
pub fn orientation_angle(left_shoulder: &Landmark, right_shoulder: &Landmark) -> f32 {
    let dx = right_shoulder.x - left_shoulder.x;
    let dy = right_shoulder.y - left_shoulder.y;
    dy.atan2(dx).to_degrees()
}

/// Wrap an angle difference into (-180, 180]
pub fn normalize_angle_delta(delta: f32) -> f32 {
    let wrapped = delta % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed change from `previous` to `current`, taking the short way round
pub fn angle_delta(current: f32, previous: f32) -> f32 {
    normalize_angle_delta(current - previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y, 0.0)
    }

    #[test]
    fn test_upright_has_zero_tilt() {
        let angle = tilt_angle(&point(0.5, 0.6), &point(0.5, 0.3));
        assert!(angle.abs() < 1e-4);
    }

    #[test]
    fn test_tilt_sign_follows_shoulder_side() {
        let right = tilt_angle(&point(0.5, 0.6), &point(0.6, 0.3));
        let left = tilt_angle(&point(0.5, 0.6), &point(0.4, 0.3));
        assert!(right > 0.0);
        assert!(left < 0.0);
        assert!((right + left).abs() < 1e-4);
        // atan(0.1 / 0.3) ≈ 18.43°
        assert!((right - 18.435).abs() < 0.01);
    }

    #[test]
    fn test_level_shoulders_point_along_x() {
        let angle = orientation_angle(&point(0.4, 0.3), &point(0.6, 0.3));
        assert!(angle.abs() < 1e-4);

        let flipped = orientation_angle(&point(0.6, 0.3), &point(0.4, 0.3));
        assert!((flipped - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_delta_wraps_across_boundary() {
        assert!((angle_delta(-179.0, 179.0) - 2.0).abs() < 1e-4);
        assert!((angle_delta(179.0, -179.0) + 2.0).abs() < 1e-4);
        assert!((angle_delta(-175.0, 30.0) - 155.0).abs() < 1e-4);
        assert!((angle_delta(30.0, 10.0) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_delta_range_is_half_open() {
        assert_eq!(normalize_angle_delta(-180.0), 180.0);
        assert_eq!(normalize_angle_delta(180.0), 180.0);
        assert_eq!(normalize_angle_delta(360.0), 0.0);
        for step in -72..=72 {
            let d = normalize_angle_delta(step as f32 * 5.0);
            assert!(d > -180.0 && d <= 180.0, "{} -> {}", step * 5, d);
        }
    }
}
