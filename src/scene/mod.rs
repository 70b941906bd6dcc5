//! Scene construction and behaviour wiring
//!
//! The level and win scenes are built in code from the configuration unless
//! `scene.path` points at a RON level. Every scene the manager instantiates
//! runs [`attach_behaviours`], which binds the player controller and the
//! follow camera by tag.

mod scene_builder;

pub use scene_builder::{SceneBuilder, PLAYER_TAG};

use keyhunt_core::{ActiveScene, LoadMode, Scene, SceneError, SceneManager, Vec3};
use keyhunt_gameplay::{FollowCamera, PlayerController};

use crate::config::AppConfig;

/// Name of the built-in level
pub const LEVEL_SCENE: &str = "Level";
/// UI label that shows the pickup prompt
pub const PROMPT_LABEL: &str = "prompt";
/// UI label shown once the key is collected
pub const WIN_BANNER_LABEL: &str = "win_banner";

/// Radius of the key's pickup trigger
const KEY_TRIGGER_RADIUS: f32 = 0.75;

/// The playable level: an arena with a key ahead of the player and a low
/// wall behind the player's starting position.
pub fn level_scene(config: &AppConfig) -> Scene {
    let spawn = config.scene.player_spawn();
    let half_size = 10.0;
    let wall_height = 1.5;

    SceneBuilder::new(LEVEL_SCENE)
        .with_gravity(config.physics.gravity)
        .add_floor(spawn.y - config.player.radius)
        .add_wall(
            "north_wall",
            Vec3::new(0.0, wall_height, half_size),
            Vec3::new(half_size, wall_height, 0.5),
        )
        .add_wall(
            "south_wall",
            Vec3::new(0.0, wall_height, -half_size),
            Vec3::new(half_size, wall_height, 0.5),
        )
        .add_wall(
            "east_wall",
            Vec3::new(half_size, wall_height, 0.0),
            Vec3::new(0.5, wall_height, half_size),
        )
        .add_wall(
            "west_wall",
            Vec3::new(-half_size, wall_height, 0.0),
            Vec3::new(0.5, wall_height, half_size),
        )
        .add_wall(
            "back_wall",
            spawn + Vec3::new(0.0, 1.0, -4.0),
            Vec3::new(3.0, 1.5, 0.25),
        )
        .add_player(spawn, config.player.radius)
        .add_pickup(spawn + Vec3::new(0.0, 0.0, 4.0), KEY_TRIGGER_RADIUS, &config.player.pickup_tag)
        .add_camera(
            spawn + config.camera.offset(),
            spawn + Vec3::Y * config.camera.look_height,
        )
        .add_label(PROMPT_LABEL, "", true)
        .add_label(WIN_BANNER_LABEL, "You win!", false)
        .build()
}

/// The scene shown after winning
pub fn win_scene(config: &AppConfig) -> Scene {
    SceneBuilder::new(config.player.win_scene.clone())
        .add_camera(Vec3::new(0.0, 2.0, -5.0), Vec3::ZERO)
        .add_label("win_text", "You collected the key!", true)
        .build()
}

/// Scene setup hook binding behaviours by tag
///
/// Every scene gets the configured camera projection. The entity tagged
/// [`PLAYER_TAG`] gets a [`PlayerController`] and the main camera a
/// [`FollowCamera`] targeting it; scenes without a player get neither. The
/// scene's `player_spawn` places the player before anything runs.
pub fn attach_behaviours(config: &AppConfig) -> impl FnMut(&mut ActiveScene) + 'static {
    let follow = config.camera.to_follow_settings();
    let player = config.player.to_player_settings();
    let projection = config.projection();

    move |scene: &mut ActiveScene| {
        scene.world.projection = projection;

        let Some(player_key) = scene.world.find_by_tag(PLAYER_TAG) else {
            log::debug!("Scene '{}' has no player; no behaviours attached", scene.name);
            return;
        };

        if let Some(spawn) = scene.player_spawn {
            scene.world.teleport_entity(player_key, spawn);
        }

        let controller = PlayerController::new(player.clone())
            .with_prompt(scene.ui.find(PROMPT_LABEL))
            .with_win_banner(scene.ui.find(WIN_BANNER_LABEL));
        scene.add_behaviour(player_key, Box::new(controller));

        match scene.world.main_camera() {
            Some(camera) => {
                let camera_follow = FollowCamera::with_settings(Some(player_key), follow.clone());
                scene.add_behaviour(camera, Box::new(camera_follow));
            }
            None => log::warn!("Scene '{}' has a player but no main camera", scene.name),
        }
    }
}

/// Build the scene manager and enter the level
pub fn build_scene_manager(config: &AppConfig) -> Result<SceneManager, SceneError> {
    let mut scenes = SceneManager::new().with_physics(config.physics.to_physics_config());
    scenes.set_scene_setup(attach_behaviours(config));

    let level = match &config.scene.path {
        Some(path) => scenes.load_scene(path)?,
        None => {
            scenes.register_template(level_scene(config));
            LEVEL_SCENE.to_string()
        }
    };
    scenes.register_template(win_scene(config));

    scenes.load(&level, LoadMode::Single)?;
    Ok(scenes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyhunt_core::Projection;

    fn active(config: &AppConfig) -> SceneManager {
        build_scene_manager(config).unwrap()
    }

    #[test]
    fn test_level_starts_active() {
        let scenes = active(&AppConfig::default());
        assert_eq!(scenes.active_scene_name(), Some(LEVEL_SCENE));
        assert!(scenes.get_template("WinScene").is_some());
    }

    #[test]
    fn test_behaviours_attached() {
        let scenes = active(&AppConfig::default());
        let scene = scenes.active_scene().unwrap();

        assert_eq!(scene.behaviour_count(), 2);
        let follow = scene.behaviour::<FollowCamera>().unwrap();
        assert_eq!(follow.target(), scene.world.find_by_tag(PLAYER_TAG));
        assert!(scene.behaviour::<PlayerController>().is_some());
    }

    #[test]
    fn test_win_scene_has_no_behaviours() {
        let mut scenes = active(&AppConfig::default());
        scenes.load("WinScene", LoadMode::Single).unwrap();

        let scene = scenes.active_scene().unwrap();
        assert_eq!(scene.behaviour_count(), 0);
        assert!(scene.ui.find("win_text").is_some());
        // The level was unloaded
        assert!(scenes.get_scene(LEVEL_SCENE).is_none());
    }

    #[test]
    fn test_level_layout() {
        let config = AppConfig::default();
        let scene = level_scene(&config);
        let active = ActiveScene::from_template(&scene, None);
        let world = &active.world;

        let player = world.find_by_tag(PLAYER_TAG).unwrap();
        assert_eq!(
            world.get_entity(player).unwrap().transform.position,
            Vec3::new(0.0, 0.5, 0.0)
        );
        assert!(world.find_by_tag("Key").is_some());
        assert!(world.main_camera().is_some());
        assert_eq!(world.physics().trigger_count(), 1);
        // floor + four arena walls + back wall
        assert_eq!(world.physics().static_colliders().len(), 6);
        assert!(active.ui.find(PROMPT_LABEL).is_some());
        assert!(active.ui.find(WIN_BANNER_LABEL).is_some());
    }

    #[test]
    fn test_configured_projection_applied() {
        let mut config = AppConfig::default();
        config.window.width = 800;
        config.window.height = 600;
        config.camera.fov = 75.0;

        let scenes = active(&config);
        let world = scenes.active_world().unwrap();
        assert_eq!(world.projection, config.projection());
        assert_ne!(world.projection, Projection::default());
    }

    #[test]
    fn test_missing_ron_level_is_an_error() {
        let mut config = AppConfig::default();
        config.scene.path = Some("scenes/does_not_exist.ron".to_string());
        assert!(matches!(build_scene_manager(&config), Err(SceneError::Io(_))));
    }
}
