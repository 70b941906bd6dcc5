//! Headless simulation system
//!
//! Drives the game loop without a window:
//! - Scripted input events applied at the start of their frame
//! - Frame delta capped the same way a windowed loop would cap it
//! - Runs until a named scene becomes active or a frame budget runs out

use keyhunt_core::{FrameStats, GameLoop, InputState, KeyCode, SceneError, SceneManager, Vec2};
use keyhunt_input::ElementState;

/// Longest frame delta fed to the game loop
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// One input change
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptedAction {
    Press(KeyCode),
    Release(KeyCode),
    /// Pointer position in viewport pixels (top-left origin)
    MoveCursor(Vec2),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedInput {
    pub frame: u64,
    pub action: ScriptedAction,
}

/// Input events keyed by frame number
#[derive(Clone, Debug, Default)]
pub struct InputScript {
    events: Vec<ScriptedInput>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(self, frame: u64, key: KeyCode) -> Self {
        self.with(frame, ScriptedAction::Press(key))
    }

    pub fn release(self, frame: u64, key: KeyCode) -> Self {
        self.with(frame, ScriptedAction::Release(key))
    }

    /// Press on `frame`, release on the next one
    pub fn tap(self, frame: u64, key: KeyCode) -> Self {
        self.press(frame, key).release(frame + 1, key)
    }

    pub fn move_cursor(self, frame: u64, position: Vec2) -> Self {
        self.with(frame, ScriptedAction::MoveCursor(position))
    }

    fn with(mut self, frame: u64, action: ScriptedAction) -> Self {
        // Stable: events on the same frame keep their insertion order
        let index = self.events.partition_point(|e| e.frame <= frame);
        self.events.insert(index, ScriptedInput { frame, action });
        self
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Feed every event scheduled for `frame` into `input`
    pub fn apply(&self, frame: u64, input: &mut InputState) -> usize {
        let start = self.events.partition_point(|e| e.frame < frame);
        let mut applied = 0;
        for event in self.events[start..].iter().take_while(|e| e.frame == frame) {
            match event.action {
                ScriptedAction::Press(key) => {
                    input.process_keyboard(key, ElementState::Pressed);
                }
                ScriptedAction::Release(key) => {
                    input.process_keyboard(key, ElementState::Released);
                }
                ScriptedAction::MoveCursor(position) => {
                    input.process_cursor_moved(position.x as f64, position.y as f64);
                }
            }
            applied += 1;
        }
        applied
    }
}

/// Totals over a simulation run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationReport {
    pub frames: u64,
    /// Whether the stop scene became active
    pub reached: bool,
    pub fixed_steps: u64,
    pub trigger_events: u64,
    pub scene_loads: u64,
}

/// Manages the headless game simulation
pub struct SimulationSystem {
    game_loop: GameLoop,
    input: InputState,
    script: InputScript,
    frame_delta: f32,
}

impl SimulationSystem {
    pub fn new(game_loop: GameLoop, script: InputScript, frame_delta: f32) -> Self {
        Self {
            game_loop,
            input: InputState::new(),
            script,
            frame_delta: frame_delta.clamp(0.0, MAX_FRAME_DELTA),
        }
    }

    /// Number of frames run so far
    pub fn frame(&self) -> u64 {
        self.game_loop.frame_count()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Run one frame: apply this frame's scripted input, then the game loop
    pub fn update(&mut self, scenes: &mut SceneManager) -> Result<FrameStats, SceneError> {
        self.script.apply(self.frame(), &mut self.input);
        self.game_loop.run_frame(scenes, &mut self.input, self.frame_delta)
    }

    /// Run until `stop_scene` is active or `max_frames` frames have run
    pub fn run_until(
        &mut self,
        scenes: &mut SceneManager,
        stop_scene: &str,
        max_frames: u64,
    ) -> Result<SimulationReport, SceneError> {
        let mut report = SimulationReport::default();

        while report.frames < max_frames {
            if scenes.active_scene_name() == Some(stop_scene) {
                report.reached = true;
                break;
            }
            let stats = self.update(scenes)?;
            report.frames += 1;
            report.fixed_steps += u64::from(stats.fixed_steps);
            report.trigger_events += stats.trigger_events as u64;
            report.scene_loads += stats.scene_loads as u64;
        }
        if !report.reached {
            report.reached = scenes.active_scene_name() == Some(stop_scene);
        }

        log::debug!("Simulation ran {} frames", report.frames);
        Ok(report)
    }
}

/// Walk to the key, stop inside its trigger, and collect it
///
/// Frame numbers assume a 0.02s frame at the default speed and layout.
pub fn demo_script(viewport: Vec2) -> InputScript {
    InputScript::new()
        .move_cursor(0, viewport * 0.5)
        .press(0, KeyCode::KeyW)
        .release(75, KeyCode::KeyW)
        .tap(80, KeyCode::Space)
}
