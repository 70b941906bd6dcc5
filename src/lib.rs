//! Keyhunt - find the key, press SPACE, win
//!
//! The application layer on top of the workspace crates: configuration,
//! scene construction with behaviour wiring, and the headless simulation
//! driver used by the binary.

pub mod config;
pub mod scene;
pub mod systems;
