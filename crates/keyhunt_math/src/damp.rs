//! Critically damped smoothing

use glam::Vec3;

/// Move `current` toward `target` with a critically damped spring
///
/// `velocity` carries the spring state between calls and must be owned by the
/// caller for as long as it keeps following the same target. `smooth_time`
/// is roughly the time needed to reach the target; it is floored at 1e-4.
///
/// Uses the polynomial approximation of `exp(-omega * dt)` from Game
/// Programming Gems 4 (ch. 1.10). The result never passes the target.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let output = target + (change + temp) * decay;

    // Clamp instead of overshooting
    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec3::ZERO;
        return target;
    }

    output
}
