//! Scene serialization and runtime scenes
//!
//! A [`Scene`] is a RON template: entity templates, UI labels and physics
//! settings. An [`ActiveScene`] is a live instance with its own world, UI
//! layer, behaviours and scheduler.

use std::fs;
use std::io;
use std::path::Path;

use keyhunt_math::Vec3;
use keyhunt_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::behaviour::{Behaviour, BehaviourSlot};
use crate::entity::EntityTemplate;
use crate::scene_transition::Scheduler;
use crate::ui::{UiLabel, UiLayer};
use crate::world::{EntityKey, World};

/// Tag marking the entity the main camera is bound to
pub const MAIN_CAMERA_TAG: &str = "MainCamera";

/// A serializable scene containing entity templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub entities: Vec<EntityTemplate>,
    #[serde(default)]
    pub ui_labels: Vec<UiLabel>,
    /// Gravity for physics (negative = downward)
    #[serde(default)]
    pub gravity: Option<f32>,
    #[serde(default)]
    pub player_spawn: Option<Vec3>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
            ui_labels: Vec::new(),
            gravity: None,
            player_spawn: None,
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path)?;
        let scene = ron::from_str(&contents)?;
        Ok(scene)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn add_entity(&mut self, entity: EntityTemplate) {
        self.entities.push(entity);
    }

    pub fn add_label(&mut self, label: UiLabel) {
        self.ui_labels.push(label);
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn with_player_spawn(mut self, spawn: Vec3) -> Self {
        self.player_spawn = Some(spawn);
        self
    }
}

/// Error type for scene operations
#[derive(Debug, Error)]
pub enum SceneError {
    /// File not found, permission denied, etc.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Invalid RON syntax or shape
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    /// Requested scene has neither a template nor a registered instance
    #[error("Scene not loaded: {0}")]
    NotLoaded(String),
    #[error("No active scene")]
    NoActiveScene,
}

/// A runtime scene
pub struct ActiveScene {
    pub name: String,
    pub player_spawn: Option<Vec3>,
    /// The live world with entities and physics
    pub world: World,
    pub ui: UiLayer,
    pub behaviours: Vec<BehaviourSlot>,
    pub scheduler: Scheduler,
}

impl ActiveScene {
    /// Instantiate a scene template
    ///
    /// `physics_config` overrides the template's gravity when given. The
    /// entity tagged `MainCamera` becomes the world's main camera.
    pub fn from_template(template: &Scene, physics_config: Option<PhysicsConfig>) -> Self {
        let config = physics_config
            .or_else(|| template.gravity.map(PhysicsConfig::new))
            .unwrap_or_default();
        let mut world = World::new().with_physics(config);

        for entity_template in &template.entities {
            world.instantiate(entity_template);
        }
        let camera = world.find_by_tag(MAIN_CAMERA_TAG);
        world.set_main_camera(camera);

        let mut ui = UiLayer::new();
        for label in &template.ui_labels {
            ui.add_label(label.clone());
        }

        Self {
            name: template.name.clone(),
            player_spawn: template.player_spawn,
            world,
            ui,
            behaviours: Vec::new(),
            scheduler: Scheduler::new(),
        }
    }

    /// Create a new empty active scene with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player_spawn: None,
            world: World::new(),
            ui: UiLayer::new(),
            behaviours: Vec::new(),
            scheduler: Scheduler::new(),
        }
    }

    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.world = self.world.with_physics(config);
        self
    }

    /// Attach a behaviour to an entity
    pub fn add_behaviour(&mut self, owner: EntityKey, behaviour: Box<dyn Behaviour>) {
        self.behaviours.push(BehaviourSlot::new(owner, behaviour));
    }

    /// First behaviour of type `T`
    pub fn behaviour<T: Behaviour + 'static>(&self) -> Option<&T> {
        self.behaviours.iter().find_map(|slot| slot.get::<T>())
    }

    pub fn behaviour_count(&self) -> usize {
        self.behaviours.len()
    }

    /// Drop behaviours whose owning entity no longer exists
    pub fn prune_behaviours(&mut self) {
        let world = &self.world;
        self.behaviours.retain(|slot| world.contains(slot.owner));
    }
}
