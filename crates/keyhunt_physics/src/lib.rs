//! Physics for keyhunt
//!
//! This crate provides the physics services the gameplay controllers call into:
//! - Collision shapes (spheres, AABBs, planes) and layer filtering
//! - Sphere casts against a layer mask
//! - Collision-aware kinematic movement (`move_position`)
//! - Trigger volumes that report enter/exit overlap events
//! - A fixed-step integrator for dynamic bodies with gravity

pub mod body;
pub mod cast;
pub mod collision;
pub mod shapes;
pub mod trigger;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, BodyType, RigidBody, StaticCollider};
pub use cast::{sweep_sphere, CastHit, ColliderRef, SphereCastHit};
pub use collision::{
    aabb_vs_aabb, collider_contact, colliders_overlap, sphere_vs_aabb, sphere_vs_plane,
    sphere_vs_sphere, CollisionFilter, CollisionLayer, Contact,
};
pub use shapes::{Aabb, Collider, Sphere};
pub use trigger::{TriggerEvent, TriggerKey, TriggerPhase, TriggerVolume};
pub use world::{PhysicsConfig, PhysicsWorld};
