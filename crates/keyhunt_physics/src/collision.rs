//! Collision detection and layer filtering
//!
//! Provides overlap tests between spheres, AABBs and planes, plus the
//! layer/mask system used by bodies, triggers and sphere casts.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::shapes::{Aabb, Collider, Sphere};
use keyhunt_math::{Plane, Vec3};

bitflags! {
    /// Collision layers for filtering which objects can collide
    ///
    /// Each layer is a bit in a 32-bit mask. Objects can belong to multiple layers
    /// and can define which layers they collide with via a collision mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most objects
        const DEFAULT = 1 << 0;
        /// Player character layer
        const PLAYER = 1 << 1;
        /// Static world geometry (floors, props)
        const STATIC = 1 << 2;
        /// Walls that block the follow camera
        const WALL = 1 << 3;
        /// Trigger zones (detect but don't push)
        const TRIGGER = 1 << 4;
        /// Collectible items
        const PICKUP = 1 << 5;
        /// All layers (collide with everything)
        const ALL = 0xFFFFFFFF;
    }
}

impl CollisionLayer {
    /// Build a mask from flag names such as `["WALL", "STATIC"]`
    ///
    /// Unknown names are skipped and logged.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        names.iter().fold(CollisionLayer::empty(), |mask, name| {
            match CollisionLayer::from_name(name.as_ref()) {
                Some(layer) => mask | layer,
                None => {
                    log::warn!("Unknown collision layer '{}'", name.as_ref());
                    mask
                }
            }
        })
    }
}

/// Collision filter determining what an object collides with
///
/// Two objects A and B collide if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    /// Which layer(s) this object belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this object can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Players collide with everything except other players and triggers.
    pub fn player() -> Self {
        Self {
            layer: CollisionLayer::PLAYER,
            mask: CollisionLayer::ALL & !CollisionLayer::PLAYER & !CollisionLayer::TRIGGER,
        }
    }

    /// Static world geometry is detected by everything.
    pub fn static_world() -> Self {
        Self {
            layer: CollisionLayer::STATIC,
            mask: CollisionLayer::ALL,
        }
    }

    /// Walls block movement and camera probes.
    pub fn wall() -> Self {
        Self {
            layer: CollisionLayer::WALL | CollisionLayer::STATIC,
            mask: CollisionLayer::ALL,
        }
    }

    /// Collectibles sit on the pickup layer and never block the player.
    pub fn pickup() -> Self {
        Self {
            layer: CollisionLayer::PICKUP,
            mask: CollisionLayer::ALL & !CollisionLayer::PLAYER,
        }
    }
}

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point of contact (on the surface of the second shape)
    pub point: Vec3,
    /// Normal pointing from the second shape toward the first
    pub normal: Vec3,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Check if this represents an actual collision (positive penetration)
    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }
}

/// Test sphere vs plane collision
///
/// The contact normal is the plane normal.
pub fn sphere_vs_plane(sphere: &Sphere, plane: &Plane) -> Option<Contact> {
    let penetration = sphere.radius - plane.signed_distance(sphere.center);

    if penetration > 0.0 {
        let point = sphere.center - plane.normal * sphere.radius;
        Some(Contact::new(point, plane.normal, penetration))
    } else {
        None
    }
}

/// Test sphere vs AABB collision
///
/// The contact normal points from the AABB toward the sphere.
pub fn sphere_vs_aabb(sphere: &Sphere, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.closest_point(sphere.center);
    let delta = sphere.center - closest;
    let dist_squared = delta.length_squared();

    if dist_squared >= sphere.radius * sphere.radius {
        return None;
    }

    let dist = dist_squared.sqrt();
    if dist > 0.0001 {
        return Some(Contact::new(closest, delta / dist, sphere.radius - dist));
    }

    // Center is inside the box: escape along the axis with the least depth
    let to_min = sphere.center - aabb.min;
    let to_max = aabb.max - sphere.center;
    let candidates = [
        (to_min.x, -Vec3::X),
        (to_max.x, Vec3::X),
        (to_min.y, -Vec3::Y),
        (to_max.y, Vec3::Y),
        (to_min.z, -Vec3::Z),
        (to_max.z, Vec3::Z),
    ];
    let (depth, normal) = candidates
        .into_iter()
        .fold((f32::INFINITY, Vec3::Y), |best, c| if c.0 < best.0 { c } else { best });

    Some(Contact::new(closest, normal, depth + sphere.radius))
}

/// Test sphere vs sphere collision
///
/// The contact normal points from `b` toward `a`.
pub fn sphere_vs_sphere(a: &Sphere, b: &Sphere) -> Option<Contact> {
    let delta = a.center - b.center;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;

    if dist_sq >= min_dist * min_dist {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0001 { delta / dist } else { Vec3::Y };
    let point = b.center + normal * b.radius;
    Some(Contact::new(point, normal, min_dist - dist))
}

/// Test AABB vs AABB collision
///
/// The contact normal points from `b` toward `a` along the axis of least overlap.
pub fn aabb_vs_aabb(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if a.max.cmplt(b.min).any() || a.min.cmpgt(b.max).any() {
        return None;
    }

    let overlap = (a.max.min(b.max) - a.min.max(b.min)).max(Vec3::ZERO);
    let offset = a.center() - b.center();
    let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };

    let (penetration, normal) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (overlap.x, Vec3::X * sign(offset.x))
    } else if overlap.y <= overlap.z {
        (overlap.y, Vec3::Y * sign(offset.y))
    } else {
        (overlap.z, Vec3::Z * sign(offset.z))
    };

    let point = (a.min.max(b.min) + a.max.min(b.max)) * 0.5;
    Some(Contact::new(point, normal, penetration))
}

/// Contact for `a` penetrating `b`, normal pointing from `b` toward `a`
///
/// Returns `None` for pairs without a meaningful contact (plane vs plane).
pub fn collider_contact(a: &Collider, b: &Collider) -> Option<Contact> {
    let flip = |mut c: Contact| {
        c.normal = -c.normal;
        c
    };

    match (a, b) {
        (Collider::Sphere(s), Collider::Plane(p)) => sphere_vs_plane(s, p),
        (Collider::Sphere(s), Collider::Aabb(b)) => sphere_vs_aabb(s, b),
        (Collider::Sphere(sa), Collider::Sphere(sb)) => sphere_vs_sphere(sa, sb),
        (Collider::Aabb(b), Collider::Sphere(s)) => sphere_vs_aabb(s, b).map(flip),
        (Collider::Aabb(ba), Collider::Aabb(bb)) => aabb_vs_aabb(ba, bb),
        (Collider::Aabb(b), Collider::Plane(p)) => {
            // Deepest corner against the plane
            let half = b.half_extents();
            let corner = b.center() - half * p.normal.signum();
            let dist = p.signed_distance(corner);
            (dist < 0.0).then(|| Contact::new(corner, p.normal, -dist))
        }
        (Collider::Plane(p), Collider::Sphere(s)) => sphere_vs_plane(s, p).map(flip),
        (Collider::Plane(_), _) => None,
    }
}

/// Whether two colliders overlap
pub fn colliders_overlap(a: &Collider, b: &Collider) -> bool {
    collider_contact(a, b).is_some_and(|c| c.is_colliding())
}
