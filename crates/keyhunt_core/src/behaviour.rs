//! Per-entity scripted behaviour
//!
//! A [`Behaviour`] is attached to an entity and receives callbacks from the
//! [`GameLoop`](crate::GameLoop). Every callback gets a [`BehaviourContext`]
//! with mutable access to the scene it lives in.

use std::any::Any;

use crate::scene_transition::Scheduler;
use crate::ui::UiLayer;
use crate::world::{EntityKey, TriggerContact, World};
use keyhunt_input::InputState;

/// Timing of the current callback
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Display frame delta in seconds
    pub delta: f32,
    /// The constant physics timestep
    pub fixed_delta: f32,
}

/// Everything a behaviour may touch during a callback
pub struct BehaviourContext<'a> {
    /// Entity the behaviour is attached to
    pub owner: EntityKey,
    pub world: &'a mut World,
    pub ui: &'a mut UiLayer,
    pub input: &'a InputState,
    pub time: FrameTime,
    pub scheduler: &'a mut Scheduler,
}

/// Callbacks invoked by the game loop
///
/// All methods default to doing nothing. Order within a frame:
/// `on_fixed_tick` (zero or more times, each followed by a physics step and
/// trigger callbacks), then `on_frame`, then `on_late_frame`.
pub trait Behaviour {
    /// Once per display frame
    fn on_frame(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    /// Once per display frame, after every behaviour's `on_frame`
    fn on_late_frame(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    /// Once per fixed physics step, before the step runs
    fn on_fixed_tick(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    /// The owner's body started overlapping a trigger
    fn on_trigger_enter(&mut self, _ctx: &mut BehaviourContext<'_>, _contact: &TriggerContact) {}

    /// The owner's body stopped overlapping a trigger
    fn on_trigger_exit(&mut self, _ctx: &mut BehaviourContext<'_>, _contact: &TriggerContact) {}

    /// For inspecting concrete behaviour state from outside the loop
    fn as_any(&self) -> &dyn Any;
}

/// A behaviour bound to its owning entity
pub struct BehaviourSlot {
    pub owner: EntityKey,
    pub behaviour: Box<dyn Behaviour>,
}

impl BehaviourSlot {
    pub fn new(owner: EntityKey, behaviour: Box<dyn Behaviour>) -> Self {
        Self { owner, behaviour }
    }

    /// Downcast to a concrete behaviour type
    pub fn get<T: Behaviour + 'static>(&self) -> Option<&T> {
        self.behaviour.as_any().downcast_ref::<T>()
    }
}
