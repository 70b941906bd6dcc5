//! Scene management with scene stack support
//!
//! The SceneManager:
//! - Loads scene templates from RON files (or takes them programmatically)
//! - Instantiates runtime scenes from templates, running a setup hook on each
//! - Keeps a stack of active scenes (top = current, below = under overlays)
//! - Performs single and additive loads, immediately or when a scheduled
//!   load comes due
//!
//! # Example
//! ```ignore
//! let mut manager = SceneManager::new().with_physics(PhysicsConfig::new(-9.81));
//! manager.load_scene("scenes/level.ron")?;
//! manager.set_scene_setup(|scene| attach_behaviours(scene));
//! manager.load("Level", LoadMode::Single)?;
//! ```

use std::collections::HashMap;

use keyhunt_physics::PhysicsConfig;

use crate::scene::{ActiveScene, Scene, SceneError};
use crate::scene_transition::{LoadMode, PendingSceneLoad};
use crate::World;

/// Hook run on every freshly instantiated scene (e.g. to attach behaviours)
pub type SceneSetup = Box<dyn FnMut(&mut ActiveScene)>;

/// Manages multiple scenes with a stack for overlays
pub struct SceneManager {
    /// Loaded scene templates
    templates: HashMap<String, Scene>,
    /// Instantiated runtime scenes
    scenes: HashMap<String, ActiveScene>,
    /// Stack of active scene names (top = current)
    active_stack: Vec<String>,
    /// Physics config for new scenes, overriding template gravity
    default_physics: Option<PhysicsConfig>,
    setup: Option<SceneSetup>,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneManager {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            scenes: HashMap::new(),
            active_stack: Vec::new(),
            default_physics: None,
            setup: None,
        }
    }

    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.default_physics = Some(config);
        self
    }

    /// Install the hook run on every scene instantiated from a template
    pub fn set_scene_setup(&mut self, setup: impl FnMut(&mut ActiveScene) + 'static) {
        self.setup = Some(Box::new(setup));
    }

    // --- Templates ---

    /// Load a scene template from a RON file, returning the scene name
    pub fn load_scene(&mut self, path: &str) -> Result<String, SceneError> {
        let scene = Scene::load(path)?;
        let name = scene.name.clone();
        log::debug!("Loaded scene template '{}' from {}", name, path);
        self.templates.insert(name.clone(), scene);
        Ok(name)
    }

    pub fn get_template(&self, name: &str) -> Option<&Scene> {
        self.templates.get(name)
    }

    /// Register a template directly (without loading from file)
    pub fn register_template(&mut self, template: Scene) {
        self.templates.insert(template.name.clone(), template);
    }

    // --- Runtime scenes ---

    /// Register an already built scene (bypassing templates)
    pub fn register_active_scene(&mut self, name: &str, scene: ActiveScene) {
        self.scenes.insert(name.to_string(), scene);
    }

    /// Instantiate a fresh runtime scene from a template
    ///
    /// Replaces any earlier instance of the same name. Does not touch the stack.
    pub fn instantiate(&mut self, template_name: &str) -> Result<(), SceneError> {
        let template = self
            .templates
            .get(template_name)
            .ok_or_else(|| SceneError::NotLoaded(template_name.to_string()))?;

        let mut active = ActiveScene::from_template(template, self.default_physics.clone());
        if let Some(setup) = self.setup.as_mut() {
            setup(&mut active);
        }
        self.scenes.insert(template_name.to_string(), active);
        Ok(())
    }

    // --- Scene stack ---

    /// Push an instantiated or registered scene onto the stack
    pub fn push_scene(&mut self, name: &str) -> Result<(), SceneError> {
        if !self.scenes.contains_key(name) {
            return Err(SceneError::NotLoaded(name.to_string()));
        }
        self.active_stack.push(name.to_string());
        Ok(())
    }

    /// Load a scene by name
    ///
    /// Scenes with a template are instantiated fresh; otherwise a registered
    /// scene of that name is reused. `Single` unloads every scene on the stack
    /// first (template-backed ones are dropped from storage), `Additive`
    /// pushes the scene as an overlay.
    pub fn load(&mut self, name: &str, mode: LoadMode) -> Result<(), SceneError> {
        if self.templates.contains_key(name) {
            self.instantiate(name)?;
        } else if !self.scenes.contains_key(name) {
            log::warn!("Cannot load scene '{}': not loaded", name);
            return Err(SceneError::NotLoaded(name.to_string()));
        }

        if mode == LoadMode::Single {
            for old in std::mem::take(&mut self.active_stack) {
                if old != name && self.templates.contains_key(&old) {
                    self.scenes.remove(&old);
                }
            }
        }
        self.active_stack.push(name.to_string());

        log::info!("Scene '{}' loaded ({:?})", name, mode);
        Ok(())
    }

    /// Perform scene loads that came due, in order
    ///
    /// Stops at the first failure.
    pub fn apply_loads(&mut self, loads: Vec<PendingSceneLoad>) -> Result<(), SceneError> {
        for load in loads {
            self.load(load.to_scene(), load.mode())?;
        }
        Ok(())
    }

    // --- Active scene access ---

    pub fn active_scene(&self) -> Option<&ActiveScene> {
        self.active_stack.last().and_then(|name| self.scenes.get(name))
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut ActiveScene> {
        let name = self.active_stack.last()?;
        self.scenes.get_mut(name)
    }

    pub fn active_world(&self) -> Option<&World> {
        self.active_scene().map(|scene| &scene.world)
    }

    pub fn active_world_mut(&mut self) -> Option<&mut World> {
        self.active_scene_mut().map(|scene| &mut scene.world)
    }

    pub fn get_scene(&self, name: &str) -> Option<&ActiveScene> {
        self.scenes.get(name)
    }

    pub fn active_scene_name(&self) -> Option<&str> {
        self.active_stack.last().map(|s| s.as_str())
    }

    pub fn stack_depth(&self) -> usize {
        self.active_stack.len()
    }

    pub fn is_scene_active(&self, name: &str) -> bool {
        self.active_stack.iter().any(|s| s == name)
    }
}
