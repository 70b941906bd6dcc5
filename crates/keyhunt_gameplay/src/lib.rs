//! Gameplay behaviours for keyhunt
//!
//! - [`FollowCamera`] - smooth third-person follow with wall avoidance
//! - [`PlayerController`] - cursor facing, movement, and the key pickup

mod follow_camera;
mod player_controller;

pub use follow_camera::{FollowCamera, FollowCameraSettings, MAX_SMOOTH_TIME, MIN_SMOOTH_TIME};
pub use player_controller::{InteractionState, PlayerController, PlayerSettings};
