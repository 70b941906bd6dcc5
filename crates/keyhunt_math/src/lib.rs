//! Math library for keyhunt
//!
//! Vector and quaternion types come from [`glam`]; this crate adds the
//! handful of game-side helpers the controllers lean on.
//!
//! ## Core Types
//!
//! - [`Vec3`], [`Quat`], [`Vec2`] - re-exported from glam
//! - [`Ray`] - origin + normalized direction
//! - [`Plane`] - infinite plane with ray intersection
//!
//! ## Helpers
//!
//! - [`smooth_damp`] - critically damped spring toward a target
//! - [`look_rotation`] - orientation facing a direction (+Z forward, +Y up)
//! - [`slerp_clamped`] - spherical interpolation with the factor clamped to [0, 1]

mod damp;
mod plane;
mod ray;
mod rotation;

pub use glam::{Mat3, Quat, Vec2, Vec3};

pub use damp::smooth_damp;
pub use plane::Plane;
pub use ray::Ray;
pub use rotation::{look_rotation, slerp_clamped};

/// Squared length below which a direction is treated as degenerate
pub const DIRECTION_EPSILON_SQ: f32 = 1e-4;
