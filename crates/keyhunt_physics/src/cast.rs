//! Swept-sphere queries
//!
//! A sphere of radius `r` moving from `origin` along a unit direction is
//! tested against each collider shape. Shapes the sphere already overlaps at
//! the start of the sweep are ignored, so a probe that starts inside a wall
//! does not report a hit at distance zero.

use crate::body::BodyKey;
use crate::shapes::{Aabb, Collider, Sphere};
use keyhunt_math::{Plane, Vec3};

/// Identity of the collider a sphere cast hit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColliderRef {
    /// Index into the world's static collider list
    Static(usize),
    /// A rigid body
    Body(BodyKey),
}

/// Hit against a single shape
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastHit {
    /// Distance travelled by the sphere center before contact
    pub distance: f32,
    /// Contact point on the surface of the hit shape
    pub point: Vec3,
    /// Surface normal at the contact, facing the incoming sphere
    pub normal: Vec3,
}

/// Closest hit of a world-level sphere cast
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereCastHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub collider: ColliderRef,
}

/// Sweep a sphere against one collider
///
/// `direction` must be normalized. Returns `None` when the sphere misses,
/// when the contact lies beyond `max_distance`, or when the sphere starts
/// out overlapping the shape.
pub fn sweep_sphere(
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
    collider: &Collider,
) -> Option<CastHit> {
    let hit = match collider {
        Collider::Plane(plane) => sweep_vs_plane(origin, radius, direction, plane),
        Collider::Sphere(sphere) => sweep_vs_sphere(origin, radius, direction, sphere),
        Collider::Aabb(aabb) => sweep_vs_aabb(origin, radius, direction, aabb),
    }?;

    (hit.distance <= max_distance).then_some(hit)
}

fn sweep_vs_plane(origin: Vec3, radius: f32, direction: Vec3, plane: &Plane) -> Option<CastHit> {
    let start = plane.signed_distance(origin);
    let denom = plane.normal.dot(direction);
    if start < radius || denom >= 0.0 {
        return None;
    }

    let distance = (start - radius) / -denom;
    let center = origin + direction * distance;
    Some(CastHit {
        distance,
        point: center - plane.normal * radius,
        normal: plane.normal,
    })
}

fn sweep_vs_sphere(origin: Vec3, radius: f32, direction: Vec3, sphere: &Sphere) -> Option<CastHit> {
    // Ray against the target sphere grown by the probe radius
    let combined = radius + sphere.radius;
    let m = origin - sphere.center;
    let b = m.dot(direction);
    let c = m.length_squared() - combined * combined;
    if c < 0.0 || b > 0.0 {
        return None;
    }

    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let distance = -b - disc.sqrt();
    let center = origin + direction * distance;
    let normal = (center - sphere.center).normalize_or_zero();
    Some(CastHit {
        distance,
        point: sphere.center + normal * sphere.radius,
        normal,
    })
}

fn sweep_vs_aabb(origin: Vec3, radius: f32, direction: Vec3, aabb: &Aabb) -> Option<CastHit> {
    // Slab test against the box expanded by the probe radius. Corners are
    // treated as square rather than rounded.
    let expanded = aabb.expanded(radius);
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let (lo, hi) = (expanded.min[axis], expanded.max[axis]);

        if d.abs() < 1e-8 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (t0, t1) = {
            let a = (lo - o) * inv;
            let b = (hi - o) * inv;
            if a < b {
                (a, b)
            } else {
                (b, a)
            }
        };

        if t0 > t_enter {
            t_enter = t0;
            normal = Vec3::ZERO;
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 {
        return None;
    }

    let center = origin + direction * t_enter;
    Some(CastHit {
        distance: t_enter,
        point: aabb.closest_point(center),
        normal,
    })
}
