//! Core types for keyhunt
//!
//! This crate provides the headless host the gameplay behaviours run in:
//!
//! - [`Transform`] - Position, rotation, and scale
//! - [`Entity`] / [`Material`] - Objects in the world and their look
//! - [`World`] / [`EntityKey`] - Entity container linked to the physics world
//! - [`Projection`] - Main camera projection and `screen_point_to_ray`
//! - [`UiLayer`] - Named text labels
//! - [`Behaviour`] - Per-entity callbacks driven by the [`GameLoop`]
//! - [`Scheduler`] - One-shot delayed scene loads
//! - [`Scene`] / [`SceneManager`] - RON scene templates and the scene stack

mod behaviour;
mod camera;
mod entity;
mod game_loop;
mod scene;
mod scene_manager;
mod scene_transition;
mod shapes;
mod transform;
mod ui;
mod world;

pub use behaviour::{Behaviour, BehaviourContext, BehaviourSlot, FrameTime};
pub use camera::Projection;
pub use entity::{Entity, EntityTemplate, Material};
pub use game_loop::{FrameStats, GameLoop, DEFAULT_FIXED_TIMESTEP, DEFAULT_MAX_SUBSTEPS};
pub use scene::{ActiveScene, Scene, SceneError, MAIN_CAMERA_TAG};
pub use scene_manager::{SceneManager, SceneSetup};
pub use scene_transition::{LoadMode, PendingSceneLoad, Scheduler};
pub use shapes::{PhysicsTemplate, ShapeTemplate, TriggerTemplate};
pub use transform::Transform;
pub use ui::{UiKey, UiLabel, UiLayer};
pub use world::{EntityKey, TriggerContact, World};

// Re-export commonly used types so behaviours only need this crate
pub use keyhunt_input::{InputState, KeyCode};
pub use keyhunt_math::{Quat, Ray, Vec2, Vec3};
pub use keyhunt_physics::{
    BodyKey, BodyType, CollisionFilter, CollisionLayer, PhysicsConfig, PhysicsWorld, RigidBody,
    StaticCollider, TriggerVolume,
};
