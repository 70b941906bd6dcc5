//! Proximity trigger volumes
//!
//! A trigger never blocks movement. The physics world tracks which bodies
//! overlap each trigger and reports the changes as enter/exit events.

use crate::body::BodyKey;
use crate::collision::CollisionLayer;
use crate::shapes::{Collider, Sphere};
use keyhunt_math::Vec3;
use slotmap::new_key_type;

new_key_type! {
    /// Key to a trigger volume in the physics world
    pub struct TriggerKey;
}

/// A non-solid volume that detects bodies on the given layers
#[derive(Clone, Debug)]
pub struct TriggerVolume {
    pub collider: Collider,
    /// Layers of the bodies this trigger reports
    pub detects: CollisionLayer,
    /// Gameplay tag of the object owning the trigger (e.g. "Key")
    pub tag: String,
}

impl TriggerVolume {
    pub fn new(collider: Collider, detects: CollisionLayer, tag: impl Into<String>) -> Self {
        Self {
            collider,
            detects,
            tag: tag.into(),
        }
    }

    /// Spherical trigger that reports the player
    pub fn sphere(center: Vec3, radius: f32, tag: impl Into<String>) -> Self {
        Self::new(
            Collider::Sphere(Sphere::new(center, radius)),
            CollisionLayer::PLAYER,
            tag,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerPhase {
    Enter,
    Exit,
}

/// Overlap change between a body and a trigger during one physics step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerEvent {
    pub phase: TriggerPhase,
    pub body: BodyKey,
    pub trigger: TriggerKey,
}
