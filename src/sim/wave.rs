//! Smoothed random centerline
//!
//! The cave's vertical midpoint eases toward a target that is re-rolled on a
//! fixed interval. Easing uses a critically damped spring, so velocity is
//! carried across target changes and the path stays C1-continuous.

use serde::{Deserialize, Serialize};

use super::dice::Dice;
use crate::settings::WorldSettings;

/// Fraction of the wave range a single target change may move
pub const TARGET_STEP_FRACTION: f32 = 0.4;

/// One step of a critically damped spring toward `target`.
///
/// Returns the new value; `velocity` is updated in place. The result never
/// overshoots `target`.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    // Pade-style approximation of exp(-x)
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Snap instead of passing the target
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

/// Centerline generator state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathWave {
    current: f32,
    velocity: f32,
    target: f32,
    target_timer: f32,
    min_y: f32,
    max_y: f32,
    smoothing: f32,
    change_interval: f32,
}

impl PathWave {
    /// Start centered at 0 (clamped into range), at rest
    pub fn new(settings: &WorldSettings) -> Self {
        let start = 0.0_f32.clamp(settings.min_wave_y, settings.max_wave_y);
        Self {
            current: start,
            velocity: 0.0,
            target: start,
            target_timer: 0.0,
            min_y: settings.min_wave_y,
            max_y: settings.max_wave_y,
            smoothing: settings.wave_smoothing,
            change_interval: settings.target_change_interval,
        }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Largest change in centerline a single step of `dt` can produce
    pub fn max_step(&self, dt: f32) -> f32 {
        let x = 2.0 / self.smoothing * dt;
        (self.max_y - self.min_y) * (x + x * x)
    }

    /// Advance by `dt` seconds and return the new centerline
    pub fn advance(&mut self, dt: f32, dice: &mut impl Dice) -> f32 {
        self.target_timer += dt;
        if self.target_timer >= self.change_interval {
            self.target_timer = 0.0;
            let reach = (self.max_y - self.min_y) * TARGET_STEP_FRACTION;
            self.target = (self.current + dice.range_f32(-reach, reach)).clamp(self.min_y, self.max_y);
        }

        if dt > 0.0 {
            self.current = smooth_damp(self.current, self.target, &mut self.velocity, self.smoothing, dt)
                .clamp(self.min_y, self.max_y);
        }
        self.current
    }
}
