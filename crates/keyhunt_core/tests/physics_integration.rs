//! Integration tests for the scene-physics-loop pipeline
//!
//! These tests verify:
//! 1. Scene templates create the right physics bodies, colliders and triggers
//! 2. The game loop steps physics and syncs entity transforms
//! 3. Trigger enter/exit events reach behaviours on the moving entity
//! 4. Collision-aware movement stops at walls

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use keyhunt_core::{
    ActiveScene, Behaviour, BehaviourContext, BodyType, CollisionFilter, CollisionLayer,
    EntityTemplate, GameLoop, InputState, Material, PhysicsTemplate, Scene, SceneManager,
    ShapeTemplate, Transform, TriggerContact, TriggerTemplate, Vec3,
};

/// Walks its owner along +Z at a constant speed and records trigger contacts
struct Walker {
    speed: f32,
    contacts: Rc<RefCell<Vec<String>>>,
}

impl Behaviour for Walker {
    fn on_fixed_tick(&mut self, ctx: &mut BehaviourContext<'_>) {
        let Some(entity) = ctx.world.get_entity(ctx.owner) else {
            return;
        };
        let target = entity.transform.position + Vec3::Z * self.speed * ctx.time.fixed_delta;
        ctx.world.move_entity(ctx.owner, target);
    }

    fn on_trigger_enter(&mut self, _ctx: &mut BehaviourContext<'_>, contact: &TriggerContact) {
        self.contacts.borrow_mut().push(format!("enter:{}", contact.tag));
    }

    fn on_trigger_exit(&mut self, _ctx: &mut BehaviourContext<'_>, contact: &TriggerContact) {
        self.contacts.borrow_mut().push(format!("exit:{}", contact.tag));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn floor() -> EntityTemplate {
    EntityTemplate::new(Transform::identity(), Material::GRAY)
        .with_name("floor")
        .with_physics(PhysicsTemplate::Static {
            shape: ShapeTemplate::ground(),
            filter: CollisionFilter::static_world(),
        })
}

fn player(position: Vec3) -> EntityTemplate {
    EntityTemplate::new(Transform::from_position(position), Material::WHITE)
        .with_name("player")
        .with_tag("Player")
        .with_physics(PhysicsTemplate::Body {
            shape: ShapeTemplate::sphere(0.5),
            body_type: BodyType::Kinematic,
            filter: CollisionFilter::player(),
        })
}

fn key_item(position: Vec3) -> EntityTemplate {
    EntityTemplate::new(Transform::from_position(position), Material::GOLD)
        .with_name("key")
        .with_tag("Key")
        .with_trigger(TriggerTemplate::new(
            ShapeTemplate::sphere(0.5),
            CollisionLayer::PLAYER,
            "Key",
        ))
}

fn wall(position: Vec3) -> EntityTemplate {
    EntityTemplate::new(Transform::from_position(position), Material::GRAY)
        .with_name("wall")
        .with_physics(PhysicsTemplate::Static {
            shape: ShapeTemplate::cuboid(Vec3::new(5.0, 2.0, 0.5)),
            filter: CollisionFilter::wall(),
        })
}

/// Load `scene` with a walker on the player, returning the manager and contact log
fn run_walker(scene: Scene, speed: f32) -> (SceneManager, Rc<RefCell<Vec<String>>>) {
    let contacts = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&contacts);

    let mut manager = SceneManager::new();
    manager.register_template(scene);
    manager.set_scene_setup(move |active: &mut ActiveScene| {
        if let Some(player) = active.world.find_by_tag("Player") {
            active.add_behaviour(
                player,
                Box::new(Walker {
                    speed,
                    contacts: Rc::clone(&log),
                }),
            );
        }
    });
    manager
        .load("Test", keyhunt_core::LoadMode::Single)
        .expect("scene should load");
    (manager, contacts)
}

#[test]
fn test_template_creates_physics_objects() {
    let mut scene = Scene::new("Test");
    scene.add_entity(floor());
    scene.add_entity(player(Vec3::new(0.0, 0.5, 0.0)));
    scene.add_entity(key_item(Vec3::new(0.0, 0.5, 3.0)));

    let active = ActiveScene::from_template(&scene, None);
    let physics = active.world.physics();

    assert_eq!(physics.static_colliders().len(), 1);
    assert_eq!(physics.body_count(), 1);
    assert_eq!(physics.trigger_count(), 1);

    let player_key = active.world.find_by_tag("Player").expect("player exists");
    let body_key = active.world.get_entity(player_key).unwrap().physics_body.unwrap();
    assert!(physics.get_body(body_key).unwrap().is_kinematic());
    assert_eq!(active.world.body_owner(body_key), Some(player_key));
}

#[test]
fn test_dynamic_body_falls_to_floor_through_loop() {
    let mut scene = Scene::new("Test").with_gravity(-9.81);
    scene.add_entity(floor());
    scene.add_entity(
        EntityTemplate::new(Transform::from_position(Vec3::new(0.0, 3.0, 0.0)), Material::RED)
            .with_name("ball")
            .with_physics(PhysicsTemplate::Body {
                shape: ShapeTemplate::sphere(0.5),
                body_type: BodyType::Dynamic,
                filter: CollisionFilter::default(),
            }),
    );

    let mut manager = SceneManager::new();
    manager.register_template(scene);
    manager.load("Test", keyhunt_core::LoadMode::Single).unwrap();

    let mut game_loop = GameLoop::default();
    let mut input = InputState::new();
    for _ in 0..120 {
        game_loop.run_frame(&mut manager, &mut input, 1.0 / 60.0).unwrap();
    }

    let world = manager.active_world().unwrap();
    let ball = world.get_entity(world.find_by_name("ball").unwrap()).unwrap();
    assert!(
        (ball.transform.position.y - 0.5).abs() < 0.01,
        "ball should rest on the floor, y = {}",
        ball.transform.position.y
    );
}

#[test]
fn test_trigger_enter_and_exit_reach_behaviour() {
    let mut scene = Scene::new("Test");
    scene.add_entity(floor());
    scene.add_entity(player(Vec3::new(0.0, 0.5, 0.0)));
    scene.add_entity(key_item(Vec3::new(0.0, 0.5, 2.0)));

    let (mut manager, contacts) = run_walker(scene, 2.0);
    let mut game_loop = GameLoop::default();
    let mut input = InputState::new();

    // 3 seconds at 2 units/s carries the player from z=0 through the key at z=2
    for _ in 0..150 {
        game_loop.run_frame(&mut manager, &mut input, 0.02).unwrap();
    }

    assert_eq!(*contacts.borrow(), vec!["enter:Key", "exit:Key"]);
}

#[test]
fn test_wall_stops_walker() {
    let mut scene = Scene::new("Test");
    scene.add_entity(floor());
    scene.add_entity(player(Vec3::new(0.0, 0.5, 0.0)));
    // Near face of the wall at z = 2.5
    scene.add_entity(wall(Vec3::new(0.0, 1.0, 3.0)));

    let (mut manager, _) = run_walker(scene, 2.0);
    let mut game_loop = GameLoop::default();
    let mut input = InputState::new();
    for _ in 0..100 {
        game_loop.run_frame(&mut manager, &mut input, 0.02).unwrap();
    }

    let world = manager.active_world().unwrap();
    let player = world.get_entity(world.find_by_tag("Player").unwrap()).unwrap();
    let z = player.transform.position.z;
    assert!(z < 2.0 && z > 1.9, "player should stop in front of the wall, z = {}", z);
}
