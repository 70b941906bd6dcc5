//! Input handling for keyhunt
//!
//! Tracks held keys, keys pressed or released during the current frame,
//! the pointer position and named axes built from key pairs.

mod input_state;

pub use input_state::{AxisBinding, InputError, InputState, HORIZONTAL, VERTICAL};

// Re-export the winit types callers feed in, so they don't need a direct dependency
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
