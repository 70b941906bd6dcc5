//! Frame driver
//!
//! Each call to [`GameLoop::run_frame`] advances the active scene by one
//! display frame:
//!
//! 1. Whole fixed steps from the accumulator (at most `max_substeps`):
//!    `on_fixed_tick` → physics step → trigger callbacks → transform sync
//! 2. `on_frame`
//! 3. `on_late_frame`
//! 4. Scheduler timers; due scene loads go to the [`SceneManager`]
//!
//! Timers scheduled during a frame only start counting on the next frame.

use keyhunt_input::InputState;
use keyhunt_physics::TriggerPhase;

use crate::behaviour::{Behaviour, BehaviourContext, FrameTime};
use crate::scene::{ActiveScene, SceneError};
use crate::scene_manager::SceneManager;

/// Default physics timestep (50 Hz)
pub const DEFAULT_FIXED_TIMESTEP: f32 = 0.02;
/// Default cap on fixed steps per frame
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// What happened during one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub fixed_steps: u32,
    pub trigger_events: usize,
    pub scene_loads: usize,
}

/// Fixed-step accumulator and callback dispatcher
#[derive(Debug)]
pub struct GameLoop {
    fixed_timestep: f32,
    max_substeps: u32,
    accumulator: f32,
    frame_count: u64,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_TIMESTEP, DEFAULT_MAX_SUBSTEPS)
    }
}

impl GameLoop {
    /// Non-positive timesteps fall back to the default; at least one substep runs
    pub fn new(fixed_timestep: f32, max_substeps: u32) -> Self {
        let fixed_timestep = if fixed_timestep > 0.0 && fixed_timestep.is_finite() {
            fixed_timestep
        } else {
            log::warn!(
                "Invalid fixed timestep {}, using {}",
                fixed_timestep,
                DEFAULT_FIXED_TIMESTEP
            );
            DEFAULT_FIXED_TIMESTEP
        };

        Self {
            fixed_timestep,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            frame_count: 0,
        }
    }

    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run one display frame of `dt` seconds on the active scene
    ///
    /// Clears the input's per-frame edges when done. Fails only when a due
    /// scene load names an unknown scene.
    pub fn run_frame(
        &mut self,
        scenes: &mut SceneManager,
        input: &mut InputState,
        dt: f32,
    ) -> Result<FrameStats, SceneError> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.frame_count += 1;

        let Some(scene) = scenes.active_scene_mut() else {
            input.end_frame();
            return Ok(FrameStats::default());
        };

        let time = FrameTime {
            delta: dt,
            fixed_delta: self.fixed_timestep,
        };
        let mut stats = FrameStats::default();
        let armed = scene.scheduler.pending_count();

        self.accumulator += dt;
        while self.accumulator >= self.fixed_timestep && stats.fixed_steps < self.max_substeps {
            dispatch(scene, input, time, |b, ctx| b.on_fixed_tick(ctx));
            scene.world.physics_mut().step(self.fixed_timestep);
            stats.trigger_events += dispatch_triggers(scene, input, time);
            scene.world.sync_from_physics();

            self.accumulator -= self.fixed_timestep;
            stats.fixed_steps += 1;
        }
        if self.accumulator >= self.fixed_timestep {
            log::debug!(
                "Frame {} hit the substep cap, dropping {:.3}s of simulation",
                self.frame_count,
                self.accumulator
            );
            self.accumulator %= self.fixed_timestep;
        }

        dispatch(scene, input, time, |b, ctx| b.on_frame(ctx));
        dispatch(scene, input, time, |b, ctx| b.on_late_frame(ctx));
        scene.prune_behaviours();

        let due = scene.scheduler.advance_oldest(armed, dt);
        input.end_frame();

        stats.scene_loads = due.len();
        scenes.apply_loads(due)?;
        Ok(stats)
    }
}

/// Invoke `f` on every behaviour whose owner still exists
fn dispatch(
    scene: &mut ActiveScene,
    input: &InputState,
    time: FrameTime,
    mut f: impl FnMut(&mut dyn Behaviour, &mut BehaviourContext<'_>),
) {
    let ActiveScene {
        world,
        ui,
        behaviours,
        scheduler,
        ..
    } = scene;

    for slot in behaviours.iter_mut() {
        if !world.contains(slot.owner) {
            continue;
        }
        let mut ctx = BehaviourContext {
            owner: slot.owner,
            world: &mut *world,
            ui: &mut *ui,
            input,
            time,
            scheduler: &mut *scheduler,
        };
        f(slot.behaviour.as_mut(), &mut ctx);
    }
}

/// Deliver drained trigger events to the behaviours on the moving entity
fn dispatch_triggers(scene: &mut ActiveScene, input: &InputState, time: FrameTime) -> usize {
    let events = scene.world.physics_mut().drain_trigger_events();
    let count = events.len();

    for event in events {
        let Some((mover, contact)) = scene.world.resolve_trigger(&event) else {
            continue;
        };
        dispatch(scene, input, time, |b, ctx| {
            if ctx.owner != mover {
                return;
            }
            match event.phase {
                TriggerPhase::Enter => b.on_trigger_enter(ctx, &contact),
                TriggerPhase::Exit => b.on_trigger_exit(ctx, &contact),
            }
        });
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ActiveScene;
    use crate::scene_transition::LoadMode;
    use crate::world::TriggerContact;
    use crate::Entity;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    /// Records callback names into a shared log
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Behaviour for Recorder {
        fn on_frame(&mut self, _ctx: &mut BehaviourContext<'_>) {
            self.log.borrow_mut().push("frame".into());
        }

        fn on_late_frame(&mut self, _ctx: &mut BehaviourContext<'_>) {
            self.log.borrow_mut().push("late".into());
        }

        fn on_fixed_tick(&mut self, _ctx: &mut BehaviourContext<'_>) {
            self.log.borrow_mut().push("fixed".into());
        }

        fn on_trigger_enter(&mut self, _ctx: &mut BehaviourContext<'_>, contact: &TriggerContact) {
            self.log.borrow_mut().push(format!("enter:{}", contact.tag));
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Schedules a load on its first frame
    struct LoadOnce {
        scheduled: bool,
    }

    impl Behaviour for LoadOnce {
        fn on_frame(&mut self, ctx: &mut BehaviourContext<'_>) {
            if !self.scheduled {
                ctx.scheduler
                    .schedule_scene_load("Next", Duration::from_millis(100), LoadMode::Single);
                self.scheduled = true;
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn manager_with(scene: ActiveScene) -> SceneManager {
        let mut manager = SceneManager::new();
        manager.register_active_scene("main", scene);
        manager.push_scene("main").unwrap();
        manager
    }

    #[test]
    fn test_callback_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = ActiveScene::new("main");
        let owner = scene.world.add_entity(Entity::new());
        scene.add_behaviour(owner, Box::new(Recorder { log: Rc::clone(&log) }));
        let mut manager = manager_with(scene);

        let mut game_loop = GameLoop::new(0.02, 8);
        let mut input = InputState::new();
        let stats = game_loop.run_frame(&mut manager, &mut input, 0.05).unwrap();

        assert_eq!(stats.fixed_steps, 2);
        assert_eq!(*log.borrow(), vec!["fixed", "fixed", "frame", "late"]);
    }

    #[test]
    fn test_accumulator_carries_over() {
        let mut manager = manager_with(ActiveScene::new("main"));
        let mut game_loop = GameLoop::new(0.02, 8);
        let mut input = InputState::new();

        let first = game_loop.run_frame(&mut manager, &mut input, 0.015).unwrap();
        let second = game_loop.run_frame(&mut manager, &mut input, 0.015).unwrap();
        assert_eq!(first.fixed_steps, 0);
        assert_eq!(second.fixed_steps, 1);
    }

    #[test]
    fn test_substep_cap() {
        let mut manager = manager_with(ActiveScene::new("main"));
        let mut game_loop = GameLoop::new(0.02, 3);
        let mut input = InputState::new();

        let stats = game_loop.run_frame(&mut manager, &mut input, 1.0).unwrap();
        assert_eq!(stats.fixed_steps, 3);

        // The backlog was dropped, so a tiny frame runs no catch-up steps
        let stats = game_loop.run_frame(&mut manager, &mut input, 0.001).unwrap();
        assert!(stats.fixed_steps <= 1);
    }

    #[test]
    fn test_no_active_scene_is_noop() {
        let mut manager = SceneManager::new();
        let mut game_loop = GameLoop::default();
        let mut input = InputState::new();
        let stats = game_loop.run_frame(&mut manager, &mut input, 0.016).unwrap();
        assert_eq!(stats, FrameStats::default());
    }

    #[test]
    fn test_invalid_timestep_falls_back() {
        let game_loop = GameLoop::new(0.0, 0);
        assert_eq!(game_loop.fixed_timestep(), DEFAULT_FIXED_TIMESTEP);
    }

    #[test]
    fn test_scheduled_load_applied_after_delay() {
        let mut scene = ActiveScene::new("main");
        let owner = scene.world.add_entity(Entity::new());
        scene.add_behaviour(owner, Box::new(LoadOnce { scheduled: false }));
        let mut manager = manager_with(scene);
        manager.register_active_scene("Next", ActiveScene::new("Next"));

        let mut game_loop = GameLoop::default();
        let mut input = InputState::new();

        let mut loads = 0;
        for _ in 0..3 {
            loads += game_loop.run_frame(&mut manager, &mut input, 0.02).unwrap().scene_loads;
        }
        assert_eq!(loads, 0);
        assert_eq!(manager.active_scene_name(), Some("main"));

        for _ in 0..5 {
            loads += game_loop.run_frame(&mut manager, &mut input, 0.02).unwrap().scene_loads;
        }
        assert_eq!(loads, 1);
        assert_eq!(manager.active_scene_name(), Some("Next"));
    }

    #[test]
    fn test_load_delay_counts_from_next_frame() {
        let mut scene = ActiveScene::new("main");
        let owner = scene.world.add_entity(Entity::new());
        scene.add_behaviour(owner, Box::new(LoadOnce { scheduled: false }));
        let mut manager = manager_with(scene);
        manager.register_active_scene("Next", ActiveScene::new("Next"));

        // 1/32 s frames are exact in Duration; 0.1 s is 3.2 frames
        let dt = 1.0 / 32.0;
        let mut game_loop = GameLoop::new(dt, 8);
        let mut input = InputState::new();

        // Frame 1 schedules; frames 2..=4 add 3/32 s < 0.1 s
        for _ in 0..4 {
            game_loop.run_frame(&mut manager, &mut input, dt).unwrap();
        }
        assert_eq!(manager.active_scene_name(), Some("main"));

        // Frame 5 brings it to 4/32 s
        let stats = game_loop.run_frame(&mut manager, &mut input, dt).unwrap();
        assert_eq!(stats.scene_loads, 1);
        assert_eq!(manager.active_scene_name(), Some("Next"));
    }

    #[test]
    fn test_input_edges_cleared_each_frame() {
        use keyhunt_input::{ElementState, KeyCode};

        let mut manager = manager_with(ActiveScene::new("main"));
        let mut game_loop = GameLoop::default();
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);

        game_loop.run_frame(&mut manager, &mut input, 0.016).unwrap();
        assert!(!input.key_down(KeyCode::Space));
        assert!(input.key_held(KeyCode::Space));
    }
}
