//! Collision shapes
//!
//! These are lightweight primitives used for collision detection and
//! sweeps. Planes come from `keyhunt_math` since the player also uses them
//! for cursor projection.

use keyhunt_math::{Plane, Vec3};
use serde::{Deserialize, Serialize};

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere at the given center with the given radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// An axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Get the closest point inside or on the AABB to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Grow the box by `amount` on every side
    pub fn expanded(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    /// Translate the AABB by a delta
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

/// Collision shape attached to a body, static collider or trigger
///
/// Shapes store absolute world positions; moving a body translates its collider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Sphere(Sphere),
    Aabb(Aabb),
    /// Infinite plane; only meaningful for static colliders
    Plane(Plane),
}

impl Collider {
    /// Center of the shape (for planes, the point closest to the origin)
    pub fn center(&self) -> Vec3 {
        match self {
            Collider::Sphere(s) => s.center,
            Collider::Aabb(b) => b.center(),
            Collider::Plane(p) => p.normal * p.distance,
        }
    }

    /// Return a copy moved by `delta`
    pub fn translated(&self, delta: Vec3) -> Self {
        match self {
            Collider::Sphere(s) => Collider::Sphere(Sphere::new(s.center + delta, s.radius)),
            Collider::Aabb(b) => Collider::Aabb(b.translated(delta)),
            Collider::Plane(p) => {
                Collider::Plane(Plane::new(p.normal, p.distance + p.normal.dot(delta)))
            }
        }
    }

    /// Radius of the sphere used when sweeping this shape through the world
    ///
    /// Boxes sweep as their bounding sphere.
    pub fn sweep_radius(&self) -> f32 {
        match self {
            Collider::Sphere(s) => s.radius,
            Collider::Aabb(b) => b.half_extents().length(),
            Collider::Plane(_) => 0.0,
        }
    }
}
