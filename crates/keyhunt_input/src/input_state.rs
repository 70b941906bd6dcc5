//! Per-frame input state
//!
//! Default bindings:
//! - W/S or Up/Down: `Vertical` axis
//! - D/A or Right/Left: `Horizontal` axis
//!
//! Keys report three things: whether they are held, whether they went down
//! this frame, and whether they went up this frame. The edge sets are cleared
//! by [`InputState::end_frame`].

use std::collections::{HashMap, HashSet};

use keyhunt_math::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Name of the left/right axis
pub const HORIZONTAL: &str = "Horizontal";
/// Name of the forward/back axis
pub const VERTICAL: &str = "Vertical";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown input axis '{0}'")]
    UnknownAxis(String),
}

/// Keys driving one axis toward +1 and -1
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub positive: Vec<KeyCode>,
    pub negative: Vec<KeyCode>,
}

impl AxisBinding {
    pub fn new(positive: Vec<KeyCode>, negative: Vec<KeyCode>) -> Self {
        Self { positive, negative }
    }
}

/// Keyboard and pointer state for the current frame
#[derive(Clone, Debug)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,
    /// Pointer position in pixels, origin at the top-left of the viewport
    cursor: Vec2,
    axes: HashMap<String, AxisBinding>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    /// Input state with the default WASD/arrow axis bindings
    pub fn new() -> Self {
        let mut state = Self::without_bindings();
        state.bind_axis(
            HORIZONTAL,
            AxisBinding::new(
                vec![KeyCode::KeyD, KeyCode::ArrowRight],
                vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            ),
        );
        state.bind_axis(
            VERTICAL,
            AxisBinding::new(
                vec![KeyCode::KeyW, KeyCode::ArrowUp],
                vec![KeyCode::KeyS, KeyCode::ArrowDown],
            ),
        );
        state
    }

    pub fn without_bindings() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
            cursor: Vec2::ZERO,
            axes: HashMap::new(),
        }
    }

    /// Bind (or rebind) a named axis
    pub fn bind_axis(&mut self, name: impl Into<String>, binding: AxisBinding) {
        self.axes.insert(name.into(), binding);
    }

    /// Process keyboard input
    ///
    /// Returns true if the key changed state. OS key repeat (a press while
    /// already held) is not a new press.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => {
                if self.held.insert(key) {
                    self.pressed.insert(key);
                    true
                } else {
                    false
                }
            }
            ElementState::Released => {
                if self.held.remove(&key) {
                    self.released.insert(key);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Process pointer movement (window pixel coordinates)
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = Vec2::new(x as f32, y as f32);
    }

    pub fn cursor_position(&self) -> Vec2 {
        self.cursor
    }

    /// True only during the frame the key went down
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// True only during the frame the key went up
    pub fn key_up(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Unsmoothed axis value in {-1, 0, 1}
    pub fn try_axis_raw(&self, name: &str) -> Result<f32, InputError> {
        let binding = self
            .axes
            .get(name)
            .ok_or_else(|| InputError::UnknownAxis(name.to_string()))?;

        let positive = binding.positive.iter().any(|k| self.held.contains(k));
        let negative = binding.negative.iter().any(|k| self.held.contains(k));
        Ok((positive as i32 - negative as i32) as f32)
    }

    /// Unsmoothed axis value; unknown axes read as 0
    pub fn axis_raw(&self, name: &str) -> f32 {
        self.try_axis_raw(name).unwrap_or(0.0)
    }

    /// Clear the per-frame edge sets. Call once at the end of every frame.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    /// Release every held key (e.g. on focus loss)
    pub fn release_all(&mut self) {
        self.released.extend(self.held.drain());
    }
}
