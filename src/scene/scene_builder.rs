//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building scene templates with physics and UI.

use keyhunt_core::{
    BodyType, CollisionFilter, CollisionLayer, EntityTemplate, Material, PhysicsTemplate, Scene,
    ShapeTemplate, Transform, TriggerTemplate, UiLabel, Vec3, MAIN_CAMERA_TAG,
};

/// Tag of the entity the player controller drives
pub const PLAYER_TAG: &str = "Player";

/// Builder for constructing scene templates
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new("Level")
///     .with_gravity(-9.81)
///     .add_floor(0.0)
///     .add_player(Vec3::new(0.0, 0.5, 0.0), 0.5)
///     .add_pickup(Vec3::new(0.0, 0.5, 4.0), 0.75, "Key")
///     .build();
/// ```
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scene: Scene::new(name),
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.scene = self.scene.with_gravity(gravity);
        self
    }

    /// Add a floor plane at the given Y position
    pub fn add_floor(mut self, y: f32) -> Self {
        self.scene.add_entity(
            EntityTemplate::new(Transform::from_position(Vec3::new(0.0, y, 0.0)), Material::GRAY)
                .with_name("floor")
                .with_tag("static")
                .with_physics(PhysicsTemplate::Static {
                    shape: ShapeTemplate::ground(),
                    filter: CollisionFilter::static_world(),
                }),
        );
        self
    }

    /// Add a box wall that blocks both the player and the follow camera
    pub fn add_wall(mut self, name: &str, center: Vec3, half_extents: Vec3) -> Self {
        self.scene.add_entity(
            EntityTemplate::new(Transform::from_position(center), Material::GRAY)
                .with_name(name)
                .with_tag("wall")
                .with_physics(PhysicsTemplate::Static {
                    shape: ShapeTemplate::cuboid(half_extents),
                    filter: CollisionFilter::wall(),
                }),
        );
        self
    }

    /// Add the player at the given position with the given collision radius
    ///
    /// The player is a kinematic body (no gravity, moved by its controller).
    pub fn add_player(mut self, position: Vec3, radius: f32) -> Self {
        self.scene.add_entity(
            EntityTemplate::new(Transform::from_position(position), Material::WHITE)
                .with_name("player")
                .with_tag(PLAYER_TAG)
                .with_physics(PhysicsTemplate::Body {
                    shape: ShapeTemplate::sphere(radius),
                    body_type: BodyType::Kinematic,
                    filter: CollisionFilter::player(),
                }),
        );
        self.scene = self.scene.with_player_spawn(position);
        self
    }

    /// Add a collectible with a proximity trigger reporting `tag`
    pub fn add_pickup(mut self, position: Vec3, trigger_radius: f32, tag: &str) -> Self {
        self.scene.add_entity(
            EntityTemplate::new(Transform::from_position(position), Material::GOLD)
                .with_name(tag.to_lowercase())
                .with_tag(tag)
                .with_trigger(TriggerTemplate::new(
                    ShapeTemplate::sphere(trigger_radius),
                    CollisionLayer::PLAYER,
                    tag,
                )),
        );
        self
    }

    /// Add the main camera at `position`, looking at `look_at`
    pub fn add_camera(mut self, position: Vec3, look_at: Vec3) -> Self {
        let mut transform = Transform::from_position(position);
        transform.look_at(look_at);
        self.scene.add_entity(
            EntityTemplate::new(transform, Material::WHITE)
                .with_name("camera")
                .with_tag(MAIN_CAMERA_TAG),
        );
        self
    }

    pub fn add_label(mut self, name: &str, text: &str, visible: bool) -> Self {
        self.scene.add_label(UiLabel::new(name, text, visible));
        self
    }

    /// Add a custom entity to the scene
    pub fn add_entity(mut self, entity: EntityTemplate) -> Self {
        self.scene.add_entity(entity);
        self
    }

    pub fn build(self) -> Scene {
        self.scene
    }
}
