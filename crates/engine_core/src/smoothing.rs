//! Frame-rate independent smoothing helpers.

use glam::Vec3;

/// Fraction of the remaining gap closed in `dt` seconds at `rate` (1/s).
pub fn blend_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Move `current` toward `target` by exponential smoothing.
pub fn exp_approach(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current + (target - current) * blend_factor(rate, dt)
}

/// Critically damped spring toward `target`.
///
/// `velocity` carries the spring state between frames. `smooth_time` is the
/// approximate time to reach the target. The result never passes the target.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Overshoot guard
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}
