//! Keyhunt - headless demo
//!
//! Builds the level from the configuration and plays it with a scripted
//! input timeline until the win scene loads.

use keyhunt::config::AppConfig;
use keyhunt::scene::build_scene_manager;
use keyhunt::systems::{demo_script, SimulationSystem};
use keyhunt_core::GameLoop;

/// Frames to run before giving up on reaching the win scene
const MAX_FRAMES: u64 = 3000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config first so its log level can seed the logger
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting {}", config.window.title);

    let mut scenes = build_scene_manager(&config)?;
    log::info!(
        "Loaded scene '{}' with {} entities",
        scenes.active_scene_name().unwrap_or("<none>"),
        scenes.active_world().map(|w| w.entity_count()).unwrap_or(0)
    );

    let game_loop = GameLoop::new(config.physics.fixed_timestep, config.physics.max_substeps);
    let script = demo_script(config.projection().viewport);
    let mut simulation = SimulationSystem::new(game_loop, script, config.physics.fixed_timestep);

    let report = simulation.run_until(&mut scenes, &config.player.win_scene, MAX_FRAMES)?;
    if report.reached {
        log::info!(
            "Reached '{}' after {} frames ({} trigger events)",
            config.player.win_scene,
            report.frames,
            report.trigger_events
        );
    } else {
        log::warn!(
            "'{}' not reached within {} frames",
            config.player.win_scene,
            report.frames
        );
    }

    if let Some(scene) = scenes.active_scene() {
        for label in scene.ui.visible_labels() {
            log::info!("[{}] {}", label.name, label.text);
        }
    }
    Ok(())
}
