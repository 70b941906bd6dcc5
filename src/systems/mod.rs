//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod simulation;

pub use simulation::{
    demo_script, InputScript, ScriptedAction, ScriptedInput, SimulationReport, SimulationSystem,
    MAX_FRAME_DELTA,
};
