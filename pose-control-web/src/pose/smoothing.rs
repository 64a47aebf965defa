//! One Euro smoothing for landmark coordinates
//!
//! Smooth when a joint is still (kills detector jitter around thresholds),
//! responsive when it moves fast (a kick still crosses its threshold on time).
//! Off unless `EngineConfig::smoothing` is set.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use super::landmarks::{Landmark, LandmarkId, PoseFrame};

/// Tuning for the One Euro filter
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Minimum cutoff frequency (Hz) - lower = smoother at rest
    pub min_cutoff: f32,
    /// Speed coefficient - higher = less lag during fast motion
    pub beta: f32,
    /// Derivative cutoff frequency (Hz)
    pub d_cutoff: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            min_cutoff: 1.0,
            beta: 0.15,
            d_cutoff: 1.0,
        }
    }
}

/// Adaptive low-pass filter for one scalar signal.
///
/// Same filter the skeleton smoothing has always used (Casiez et al.,
/// "1€ Filter", CHI 2012), moved here unchanged and driven by frame time.
#[derive(Clone, Debug)]
struct OneEuroFilter {
    config: SmoothingConfig,
    x_prev: f32,
    dx_prev: f32,
    t_prev: f64,
    initialized: bool,
}

impl OneEuroFilter {
    fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            x_prev: 0.0,
            dx_prev: 0.0,
            t_prev: 0.0,
            initialized: false,
        }
    }

    fn alpha(t_e: f32, cutoff: f32) -> f32 {
        let r = 2.0 * PI * cutoff * t_e;
        r / (r + 1.0)
    }

    /// Filter a sample taken at `t` seconds
    fn filter(&mut self, t: f64, x: f32) -> f32 {
        if !self.initialized {
            self.x_prev = x;
            self.t_prev = t;
            self.initialized = true;
            return x;
        }

        let t_e = (t - self.t_prev) as f32;
        if t_e <= 0.0 {
            return self.x_prev;
        }

        let a_d = Self::alpha(t_e, self.config.d_cutoff);
        let dx = (x - self.x_prev) / t_e;
        let dx_hat = a_d * dx + (1.0 - a_d) * self.dx_prev;

        let cutoff = self.config.min_cutoff + self.config.beta * dx_hat.abs();
        let a = Self::alpha(t_e, cutoff);
        let x_hat = a * x + (1.0 - a) * self.x_prev;

        self.x_prev = x_hat;
        self.dx_prev = dx_hat;
        self.t_prev = t;

        x_hat
    }
}

/// x/y/z filters for one landmark
#[derive(Clone, Debug)]
struct PointFilter {
    x: OneEuroFilter,
    y: OneEuroFilter,
    z: OneEuroFilter,
}

impl PointFilter {
    fn new(config: SmoothingConfig) -> Self {
        Self {
            x: OneEuroFilter::new(config),
            y: OneEuroFilter::new(config),
            z: OneEuroFilter::new(config),
        }
    }

    fn filter(&mut self, t: f64, lm: Landmark) -> Landmark {
        Landmark {
            x: self.x.filter(t, lm.x),
            y: self.y.filter(t, lm.y),
            z: self.z.filter(t, lm.z),
            visibility: lm.visibility,
        }
    }
}

/// Per-landmark smoothing state for one session.
///
/// A landmark that drops out restarts its filter when it comes back, so a
/// stale position never bleeds into the new track.
#[derive(Clone, Debug)]
pub struct LandmarkSmoother {
    config: SmoothingConfig,
    filters: [Option<PointFilter>; LandmarkId::COUNT],
}

impl LandmarkSmoother {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            filters: std::array::from_fn(|_| None),
        }
    }

    /// Smoothed copy of `frame`
    pub fn apply(&mut self, frame: &PoseFrame) -> PoseFrame {
        let mut out = PoseFrame::new(frame.timestamp);
        for id in LandmarkId::ALL {
            let slot = &mut self.filters[id.slot()];
            match frame.get(id) {
                Some(lm) => {
                    let config = self.config;
                    let filter = slot.get_or_insert_with(|| PointFilter::new(config));
                    out.set(id, filter.filter(frame.timestamp, lm));
                }
                None => *slot = None,
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knee_frame(t: f64, y: f32) -> PoseFrame {
        PoseFrame::new(t).with(LandmarkId::LeftKnee, Landmark::new(0.5, y, 0.0))
    }

    #[test]
    fn test_first_sample_passes_through() {
        let mut smoother = LandmarkSmoother::new(SmoothingConfig::default());
        let out = smoother.apply(&knee_frame(0.0, 0.7));
        assert_eq!(out.get(LandmarkId::LeftKnee).map(|lm| lm.y), Some(0.7));
    }

    #[test]
    fn test_jitter_is_damped() {
        let mut smoother = LandmarkSmoother::new(SmoothingConfig::default());
        smoother.apply(&knee_frame(0.0, 0.70));
        let out = smoother.apply(&knee_frame(1.0 / 30.0, 0.72));
        let y = out.get(LandmarkId::LeftKnee).map(|lm| lm.y).unwrap_or_default();
        assert!(y > 0.70 && y < 0.72, "smoothed y = {}", y);
    }

    #[test]
    fn test_dropout_restarts_filter() {
        let mut smoother = LandmarkSmoother::new(SmoothingConfig::default());
        smoother.apply(&knee_frame(0.0, 0.70));
        smoother.apply(&PoseFrame::new(0.033));
        let out = smoother.apply(&knee_frame(0.066, 0.40));
        assert_eq!(out.get(LandmarkId::LeftKnee).map(|lm| lm.y), Some(0.40));
    }
}
