//! End-to-end tests of the key pickup through the scripted simulation

use keyhunt::config::AppConfig;
use keyhunt::scene::{
    build_scene_manager, level_scene, LEVEL_SCENE, PLAYER_TAG, PROMPT_LABEL, WIN_BANNER_LABEL,
};
use keyhunt::systems::{demo_script, InputScript, SimulationSystem};
use keyhunt_core::{GameLoop, KeyCode, Material, SceneManager, Vec2};
use keyhunt_gameplay::{FollowCamera, InteractionState, PlayerController};

const FRAME: f32 = 0.02;

fn setup() -> (AppConfig, SceneManager) {
    let config = AppConfig::default();
    let scenes = build_scene_manager(&config).unwrap();
    (config, scenes)
}

fn simulation(script: InputScript) -> SimulationSystem {
    SimulationSystem::new(GameLoop::new(FRAME, 8), script, FRAME)
}

fn run_frames(sim: &mut SimulationSystem, scenes: &mut SceneManager, frames: u64) {
    for _ in 0..frames {
        sim.update(scenes).unwrap();
    }
}

fn player_state(scenes: &SceneManager) -> InteractionState {
    scenes
        .active_scene()
        .and_then(|s| s.behaviour::<PlayerController>())
        .map(|p| p.state())
        .unwrap()
}

#[test]
fn test_demo_reaches_win_scene() {
    let (config, mut scenes) = setup();
    let mut sim = simulation(demo_script(config.projection().viewport));

    let report = sim.run_until(&mut scenes, "WinScene", 600).unwrap();

    assert!(report.reached);
    assert_eq!(scenes.active_scene_name(), Some("WinScene"));
    assert_eq!(scenes.stack_depth(), 1);
    assert_eq!(report.scene_loads, 1);
    assert!(report.trigger_events >= 1);
    assert!(scenes.get_scene(LEVEL_SCENE).is_none());
}

#[test]
fn test_walk_collect_and_wait() {
    let (config, mut scenes) = setup();
    let mut sim = simulation(demo_script(config.projection().viewport));

    // Walking ends at frame 75, inside the key's trigger
    run_frames(&mut sim, &mut scenes, 78);
    assert_eq!(player_state(&scenes), InteractionState::ItemInRange);
    {
        let scene = scenes.active_scene().unwrap();
        let key = scene.world.find_by_tag("Key").unwrap();
        assert_eq!(scene.world.get_entity(key).unwrap().material, Material::BLUE);

        let prompt = scene.ui.get(scene.ui.find(PROMPT_LABEL).unwrap()).unwrap();
        assert_eq!(prompt.text, config.player.prompt_text);

        let player = scene.world.find_by_tag(PLAYER_TAG).unwrap();
        let position = scene.world.get_entity(player).unwrap().transform.position;
        assert!((position.z - 3.0).abs() < 0.05, "player at {:?}", position);
        assert!(position.x.abs() < 0.01);
    }

    // Space on frame 80 collects the key
    run_frames(&mut sim, &mut scenes, 3);
    assert_eq!(player_state(&scenes), InteractionState::GameWon);
    {
        let scene = scenes.active_scene().unwrap();
        assert!(scene.world.find_by_tag("Key").is_none());
        let banner = scene.ui.get(scene.ui.find(WIN_BANNER_LABEL).unwrap()).unwrap();
        assert!(banner.visible);
        assert_eq!(scene.scheduler.pending_count(), 1);
    }

    // Not before the one second delay
    run_frames(&mut sim, &mut scenes, 40);
    assert_eq!(scenes.active_scene_name(), Some(LEVEL_SCENE));

    // Shortly after it
    run_frames(&mut sim, &mut scenes, 20);
    assert_eq!(scenes.active_scene_name(), Some("WinScene"));
}

#[test]
fn test_win_scene_waits_full_delay_after_collecting() {
    let (config, mut scenes) = setup();
    let mut sim = simulation(demo_script(config.projection().viewport));

    while player_state(&scenes) != InteractionState::GameWon {
        assert!(sim.frame() < 200, "key never collected");
        sim.update(&mut scenes).unwrap();
    }
    let collected = sim.frame();

    while scenes.active_scene_name() != Some("WinScene") {
        assert!(sim.frame() < collected + 200, "win scene never loaded");
        sim.update(&mut scenes).unwrap();
    }
    let loaded = sim.frame();

    // The frame that collects adds no time; each later frame adds FRAME
    let delay_frames = (config.player.win_delay / FRAME).round() as u64;
    let waited = loaded - collected;
    assert!(waited >= delay_frames, "loaded after {} frames", waited);
    assert!(waited <= delay_frames + 1, "loaded after {} frames", waited);
}

#[test]
fn test_leaving_trigger_restores_key() {
    let (_config, mut scenes) = setup();
    let script = InputScript::new()
        .move_cursor(0, Vec2::new(640.0, 360.0))
        .press(0, KeyCode::KeyW)
        .release(75, KeyCode::KeyW)
        .press(80, KeyCode::KeyS)
        .release(140, KeyCode::KeyS);
    let mut sim = simulation(script);

    run_frames(&mut sim, &mut scenes, 78);
    assert_eq!(player_state(&scenes), InteractionState::ItemInRange);

    run_frames(&mut sim, &mut scenes, 70);
    assert_eq!(player_state(&scenes), InteractionState::NoItemInRange);

    let scene = scenes.active_scene().unwrap();
    let key = scene.world.find_by_tag("Key").unwrap();
    assert_eq!(scene.world.get_entity(key).unwrap().material, Material::GOLD);
    let prompt = scene.ui.get(scene.ui.find(PROMPT_LABEL).unwrap()).unwrap();
    assert_eq!(prompt.text, "");
}

#[test]
fn test_space_out_of_range_does_nothing() {
    let (_config, mut scenes) = setup();
    let mut sim = simulation(InputScript::new().tap(5, KeyCode::Space));

    run_frames(&mut sim, &mut scenes, 120);

    assert_eq!(scenes.active_scene_name(), Some(LEVEL_SCENE));
    assert_eq!(player_state(&scenes), InteractionState::NoItemInRange);
    let scene = scenes.active_scene().unwrap();
    assert!(scene.world.find_by_tag("Key").is_some());
    assert_eq!(scene.scheduler.pending_count(), 0);
}

#[test]
fn test_camera_follows_player() {
    let (config, mut scenes) = setup();
    let mut sim = simulation(demo_script(config.projection().viewport));

    // Walking stops at frame 75; give the camera time to settle
    run_frames(&mut sim, &mut scenes, 100);

    let scene = scenes.active_scene().unwrap();
    let world = &scene.world;
    let player = world
        .get_entity(world.find_by_tag(PLAYER_TAG).unwrap())
        .unwrap()
        .transform;
    let camera = world.get_entity(world.main_camera().unwrap()).unwrap().transform;

    // Settled behind and above the stationary player
    let expected = player.position + player.transform_direction(config.camera.offset());
    assert!((camera.position - expected).length() < 0.05);
    assert!(scene.behaviour::<FollowCamera>().is_some());
}

#[test]
fn test_back_wall_pulls_camera_in() {
    let (config, mut scenes) = setup();
    let mut sim = simulation(InputScript::new().move_cursor(0, config.projection().viewport * 0.5));

    run_frames(&mut sim, &mut scenes, 60);

    let scene = scenes.active_scene().unwrap();
    let world = &scene.world;
    let camera = world.get_entity(world.main_camera().unwrap()).unwrap().transform;
    let unobstructed = config.scene.player_spawn() + config.camera.offset();

    // The wall's near face is at z = -3.75
    assert!(camera.position.z > -3.75);
    assert!((camera.position - unobstructed).length() > 1.0);
}

#[test]
fn test_level_round_trips_through_ron() {
    let config = AppConfig::default();
    let path = std::env::temp_dir().join(format!("keyhunt_level_{}.ron", std::process::id()));
    level_scene(&config).save(&path).unwrap();

    let mut ron_config = config.clone();
    ron_config.scene.path = Some(path.to_string_lossy().into_owned());
    let scenes = build_scene_manager(&ron_config);
    std::fs::remove_file(&path).ok();

    let scenes = scenes.unwrap();
    assert_eq!(scenes.active_scene_name(), Some(LEVEL_SCENE));
    assert_eq!(scenes.active_scene().unwrap().behaviour_count(), 2);
}
