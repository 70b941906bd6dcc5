//! Orientation helpers
//!
//! Axis convention: local +Z is forward, +X is right, +Y is up.

use glam::{Mat3, Quat, Vec3};

/// Build the orientation whose forward axis points along `forward`
///
/// `up` only steers the roll; it does not need to be perpendicular to
/// `forward`. Returns `None` when `forward` is zero or parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return None;
    }

    let right = up.cross(forward);
    if right.length_squared() < 1e-8 {
        return None;
    }
    let right = right.normalize();
    let up = forward.cross(right);

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize())
}

/// Spherical interpolation with `t` clamped to [0, 1]
#[inline]
pub fn slerp_clamped(from: Quat, to: Quat, t: f32) -> Quat {
    from.slerp(to, t.clamp(0.0, 1.0)).normalize()
}
