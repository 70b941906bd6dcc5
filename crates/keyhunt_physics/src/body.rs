//! Rigid bodies and static colliders

use crate::collision::CollisionFilter;
use crate::shapes::{Aabb, Collider, Sphere};
use keyhunt_math::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Generational: once a body is removed, stale keys resolve to `None`
    /// even if the slot gets reused.
    pub struct BodyKey;
}

/// How the simulation treats a body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Integrated every step and pushed out of static geometry
    #[default]
    Dynamic,
    /// Moves only through `move_position`; no gravity, no integration
    Kinematic,
    /// Never moves; blocks other bodies
    Static,
}

/// A rigid body with position, velocity and collision shape
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Position in world coordinates
    pub position: Vec3,
    /// Velocity (units per second)
    pub velocity: Vec3,
    pub body_type: BodyType,
    /// Whether gravity applies (only meaningful for dynamic bodies)
    pub affected_by_gravity: bool,
    /// The collision shape for this body (stores absolute world position)
    pub collider: Collider,
    /// Layer membership and collision mask
    pub filter: CollisionFilter,
}

impl RigidBody {
    /// Create a dynamic body with a sphere collider
    pub fn new_sphere(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            body_type: BodyType::Dynamic,
            affected_by_gravity: true,
            collider: Collider::Sphere(Sphere::new(position, radius)),
            filter: CollisionFilter::default(),
        }
    }

    /// Create a dynamic body with an AABB collider
    pub fn new_aabb(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            body_type: BodyType::Dynamic,
            affected_by_gravity: true,
            collider: Collider::Aabb(Aabb::from_center_half_extents(position, half_extents)),
            filter: CollisionFilter::default(),
        }
    }

    /// Kinematic sphere, the shape the player controller drives
    pub fn new_kinematic_sphere(position: Vec3, radius: f32) -> Self {
        Self::new_sphere(position, radius).with_body_type(BodyType::Kinematic)
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the body type; non-dynamic bodies ignore gravity
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        if body_type != BodyType::Dynamic {
            self.affected_by_gravity = false;
        }
        self
    }

    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn is_kinematic(&self) -> bool {
        self.body_type == BodyType::Kinematic
    }

    /// Update the position and sync the collider
    pub fn set_position(&mut self, position: Vec3) {
        let delta = position - self.position;
        self.position = position;
        self.collider = self.collider.translated(delta);
    }

    /// Apply a positional correction (e.g., from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec3) {
        self.position += correction;
        self.collider = self.collider.translated(correction);
    }
}

/// Immovable world geometry (floors, walls, props)
#[derive(Clone, Debug)]
pub struct StaticCollider {
    pub collider: Collider,
    pub filter: CollisionFilter,
}

impl StaticCollider {
    pub fn new(collider: Collider, filter: CollisionFilter) -> Self {
        Self { collider, filter }
    }

    /// Infinite floor at height `y`
    pub fn floor(y: f32) -> Self {
        Self::new(
            Collider::Plane(keyhunt_math::Plane::floor(y)),
            CollisionFilter::static_world(),
        )
    }

    /// Box-shaped wall that blocks both movement and camera probes
    pub fn wall(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(
            Collider::Aabb(Aabb::from_center_half_extents(center, half_extents)),
            CollisionFilter::wall(),
        )
    }
}
