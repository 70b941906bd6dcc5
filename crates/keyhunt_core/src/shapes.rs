//! Serializable collider templates
//!
//! Templates describe shapes in **local space** (centered on the entity).
//! The entity transform places them in the world when a scene is
//! instantiated.

use keyhunt_math::{Plane, Vec3};
use keyhunt_physics::{
    Aabb, BodyType, Collider, CollisionFilter, CollisionLayer, RigidBody, Sphere, StaticCollider,
    TriggerVolume,
};
use serde::{Deserialize, Serialize};

/// Serializable shape template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeTemplate {
    Sphere {
        radius: f32,
    },
    /// Axis-aligned box
    Box {
        half_extents: Vec3,
    },
    /// Infinite plane through the entity position
    Plane {
        normal: Vec3,
    },
}

impl ShapeTemplate {
    pub fn sphere(radius: f32) -> Self {
        ShapeTemplate::Sphere { radius }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        ShapeTemplate::Box { half_extents }
    }

    /// Upward-facing ground plane
    pub fn ground() -> Self {
        ShapeTemplate::Plane { normal: Vec3::Y }
    }

    /// Build the world-space collider for an entity at `position`
    pub fn to_collider(&self, position: Vec3) -> Collider {
        match self {
            ShapeTemplate::Sphere { radius } => Collider::Sphere(Sphere::new(position, *radius)),
            ShapeTemplate::Box { half_extents } => {
                Collider::Aabb(Aabb::from_center_half_extents(position, *half_extents))
            }
            ShapeTemplate::Plane { normal } => {
                Collider::Plane(Plane::from_normal_and_point(*normal, position))
            }
        }
    }
}

/// Physics representation of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicsTemplate {
    /// Immovable geometry with no link back to the entity
    Static {
        shape: ShapeTemplate,
        filter: CollisionFilter,
    },
    /// A rigid body that keeps the entity transform in sync
    Body {
        shape: ShapeTemplate,
        body_type: BodyType,
        filter: CollisionFilter,
    },
}

impl PhysicsTemplate {
    pub fn static_collider(&self, position: Vec3) -> Option<StaticCollider> {
        match self {
            PhysicsTemplate::Static { shape, filter } => {
                Some(StaticCollider::new(shape.to_collider(position), *filter))
            }
            PhysicsTemplate::Body { .. } => None,
        }
    }

    pub fn rigid_body(&self, position: Vec3) -> Option<RigidBody> {
        match self {
            PhysicsTemplate::Body {
                shape,
                body_type,
                filter,
            } => {
                let mut body = match shape {
                    ShapeTemplate::Box { half_extents } => RigidBody::new_aabb(position, *half_extents),
                    ShapeTemplate::Sphere { radius } => RigidBody::new_sphere(position, *radius),
                    ShapeTemplate::Plane { .. } => {
                        log::warn!("Plane shapes cannot be rigid bodies; use a static collider");
                        return None;
                    }
                };
                body = body.with_body_type(*body_type).with_filter(*filter);
                Some(body)
            }
            PhysicsTemplate::Static { .. } => None,
        }
    }
}

/// Proximity trigger attached to an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerTemplate {
    pub shape: ShapeTemplate,
    /// Layers the trigger reports
    pub detects: CollisionLayer,
    /// Tag reported to behaviours on contact
    pub tag: String,
}

impl TriggerTemplate {
    pub fn new(shape: ShapeTemplate, detects: CollisionLayer, tag: impl Into<String>) -> Self {
        Self {
            shape,
            detects,
            tag: tag.into(),
        }
    }

    pub fn to_volume(&self, position: Vec3) -> TriggerVolume {
        TriggerVolume::new(self.shape.to_collider(position), self.detects, self.tag.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_collider_is_centered_on_entity() {
        let collider = ShapeTemplate::cuboid(Vec3::ONE).to_collider(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(collider.center(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_ground_plane_passes_through_position() {
        match ShapeTemplate::ground().to_collider(Vec3::new(5.0, -1.0, 3.0)) {
            Collider::Plane(p) => assert_eq!(p.distance, -1.0),
            other => panic!("Expected Plane, got {:?}", other),
        }
    }

    #[test]
    fn test_physics_template_kinds() {
        let wall = PhysicsTemplate::Static {
            shape: ShapeTemplate::cuboid(Vec3::ONE),
            filter: CollisionFilter::wall(),
        };
        assert!(wall.static_collider(Vec3::ZERO).is_some());
        assert!(wall.rigid_body(Vec3::ZERO).is_none());

        let player = PhysicsTemplate::Body {
            shape: ShapeTemplate::sphere(0.5),
            body_type: BodyType::Kinematic,
            filter: CollisionFilter::player(),
        };
        let body = player.rigid_body(Vec3::Y).unwrap();
        assert!(body.is_kinematic());
        assert_eq!(body.position, Vec3::Y);
    }

    #[test]
    fn test_plane_body_is_rejected() {
        let template = PhysicsTemplate::Body {
            shape: ShapeTemplate::ground(),
            body_type: BodyType::Static,
            filter: CollisionFilter::static_world(),
        };
        assert!(template.rigid_body(Vec3::ZERO).is_none());
    }

    #[test]
    fn test_trigger_template() {
        let trigger = TriggerTemplate::new(ShapeTemplate::sphere(1.0), CollisionLayer::PLAYER, "Key");
        let volume = trigger.to_volume(Vec3::new(0.0, 0.5, 4.0));
        assert_eq!(volume.tag, "Key");
        assert_eq!(volume.collider.center(), Vec3::new(0.0, 0.5, 4.0));
    }
}
