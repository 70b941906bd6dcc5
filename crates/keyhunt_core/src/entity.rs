//! Entity and Material types
//!
//! An Entity is an object in the world with a transform, a material and
//! optional links into the physics world.

use std::collections::HashSet;

use crate::shapes::{PhysicsTemplate, TriggerTemplate};
use crate::Transform;
use keyhunt_math::Vec3;
use keyhunt_physics::{BodyKey, TriggerKey};
use serde::{Deserialize, Serialize};

/// A simple material with just a base color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color as RGBA (each component 0.0-1.0)
    pub base_color: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Material {
    /// Create a new material with the given RGBA color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            base_color: [r, g, b, a],
        }
    }

    /// Create a new opaque material with the given RGB color
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const WHITE: Self = Self { base_color: [1.0, 1.0, 1.0, 1.0] };
    pub const GRAY: Self = Self { base_color: [0.5, 0.5, 0.5, 1.0] };
    pub const RED: Self = Self { base_color: [1.0, 0.0, 0.0, 1.0] };
    pub const GREEN: Self = Self { base_color: [0.0, 1.0, 0.0, 1.0] };
    pub const BLUE: Self = Self { base_color: [0.0, 0.0, 1.0, 1.0] };
    pub const GOLD: Self = Self { base_color: [1.0, 0.84, 0.0, 1.0] };
}

/// An object in the world
///
/// Each entity has:
/// - An optional name (for lookup by name)
/// - Tags (`Player`, `MainCamera`, `Key`, ...)
/// - A transform and a material
/// - Optional physics body and trigger keys (link to PhysicsWorld)
#[derive(Clone, Debug)]
pub struct Entity {
    pub name: Option<String>,
    pub tags: HashSet<String>,
    pub transform: Transform,
    pub material: Material,
    pub physics_body: Option<BodyKey>,
    pub trigger: Option<TriggerKey>,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity {
    pub fn new() -> Self {
        Self::with_transform(Transform::identity(), Material::default())
    }

    /// Create a new entity with transform and material
    pub fn with_transform(transform: Transform, material: Material) -> Self {
        Self {
            name: None,
            tags: HashSet::new(),
            transform,
            material,
            physics_body: None,
            trigger: None,
        }
    }

    /// Create an entity at a position with the default material
    pub fn at(position: Vec3) -> Self {
        Self::with_transform(Transform::from_position(position), Material::default())
    }

    /// Set the name of this entity (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a tag to this entity
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn with_physics_body(mut self, key: BodyKey) -> Self {
        self.physics_body = Some(key);
        self
    }

    pub fn with_trigger(mut self, key: TriggerKey) -> Self {
        self.trigger = Some(key);
        self
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }
}

/// A serializable entity template
///
/// Unlike Entity, it carries physics descriptions instead of live keys,
/// which are created when the template is instantiated into a world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub transform: Transform,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub physics: Option<PhysicsTemplate>,
    #[serde(default)]
    pub trigger: Option<TriggerTemplate>,
}

impl EntityTemplate {
    pub fn new(transform: Transform, material: Material) -> Self {
        Self {
            name: None,
            tags: Vec::new(),
            transform,
            material,
            physics: None,
            trigger: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_physics(mut self, physics: PhysicsTemplate) -> Self {
        self.physics = Some(physics);
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerTemplate) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Convert this template to an Entity (physics links are attached by the world)
    pub fn to_entity(&self) -> Entity {
        let mut entity = Entity::with_transform(self.transform, self.material);
        if let Some(ref name) = self.name {
            entity = entity.with_name(name.clone());
        }
        for tag in &self.tags {
            entity = entity.with_tag(tag.clone());
        }
        entity
    }
}
