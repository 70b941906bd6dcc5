//! Third-person follow camera
//!
//! Each frame, after everything else has moved, the camera:
//!
//! 1. places a desired point at `offset` in the target's local frame
//! 2. pulls that point in front of any wall between it and the target
//! 3. springs toward it with [`smooth_damp`]
//! 4. looks at a point `look_height` above the target
//!
//! Only the position is smoothed. The look direction snaps every frame.

use keyhunt_core::{Behaviour, BehaviourContext, CollisionLayer, EntityKey, Transform, World};
use keyhunt_math::{smooth_damp, Vec3};
use std::any::Any;

/// Lower bound of the smoothing time
pub const MIN_SMOOTH_TIME: f32 = 0.01;
/// Upper bound of the smoothing time
pub const MAX_SMOOTH_TIME: f32 = 1.0;

/// Tunables for [`FollowCamera`]
#[derive(Clone, Debug, PartialEq)]
pub struct FollowCameraSettings {
    /// Camera position relative to the target, in the target's local axes
    pub offset: Vec3,
    /// Approximate time to catch up with the desired position, in seconds
    pub smooth_time: f32,
    /// Radius of the wall probe
    pub probe_radius: f32,
    /// Gap kept between the camera and a wall
    pub collision_buffer: f32,
    /// Layers that count as walls
    pub wall_mask: CollisionLayer,
    /// Height above the target origin the camera looks at
    pub look_height: f32,
}

impl Default for FollowCameraSettings {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 3.0, -6.0),
            smooth_time: 0.05,
            probe_radius: 0.3,
            collision_buffer: 0.2,
            wall_mask: CollisionLayer::WALL,
            look_height: 1.5,
        }
    }
}

/// Follows a target entity from behind
#[derive(Clone, Debug)]
pub struct FollowCamera {
    target: Option<EntityKey>,
    settings: FollowCameraSettings,
    velocity: Vec3,
}

impl FollowCamera {
    pub fn new(target: Option<EntityKey>) -> Self {
        Self::with_settings(target, FollowCameraSettings::default())
    }

    /// Create a camera with custom tunables; `smooth_time` is clamped
    pub fn with_settings(target: Option<EntityKey>, mut settings: FollowCameraSettings) -> Self {
        settings.smooth_time = settings.smooth_time.clamp(MIN_SMOOTH_TIME, MAX_SMOOTH_TIME);
        Self {
            target,
            settings,
            velocity: Vec3::ZERO,
        }
    }

    pub fn target(&self) -> Option<EntityKey> {
        self.target
    }

    /// Rebind the camera. The smoothing velocity is kept.
    pub fn set_target(&mut self, target: Option<EntityKey>) {
        self.target = target;
    }

    pub fn settings(&self) -> &FollowCameraSettings {
        &self.settings
    }

    pub fn smooth_time(&self) -> f32 {
        self.settings.smooth_time
    }

    pub fn set_smooth_time(&mut self, smooth_time: f32) {
        self.settings.smooth_time = smooth_time.clamp(MIN_SMOOTH_TIME, MAX_SMOOTH_TIME);
    }

    /// Current smoothing velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Where the camera wants to be for a target at `target`
    ///
    /// Walls on `wall_mask` between the target and the offset point pull the
    /// result to `collision_buffer` short of the hit point.
    pub fn desired_position(&self, world: &World, target: &Transform) -> Vec3 {
        let desired = target.position + target.transform_direction(self.settings.offset);

        let to_desired = desired - target.position;
        let distance = to_desired.length();
        let direction = to_desired.normalize_or_zero();
        if direction == Vec3::ZERO {
            return desired;
        }

        match world.physics().sphere_cast(
            target.position,
            self.settings.probe_radius,
            direction,
            distance,
            self.settings.wall_mask,
        ) {
            Some(hit) => hit.point - direction * self.settings.collision_buffer,
            None => desired,
        }
    }
}

impl Behaviour for FollowCamera {
    fn on_late_frame(&mut self, ctx: &mut BehaviourContext<'_>) {
        let Some(target) = self
            .target
            .and_then(|key| ctx.world.get_entity(key))
            .map(|entity| entity.transform)
        else {
            return;
        };

        let desired = self.desired_position(ctx.world, &target);
        let look_point = target.position + Vec3::Y * self.settings.look_height;

        let Some(camera) = ctx.world.get_entity_mut(ctx.owner) else {
            return;
        };
        let mut transform = camera.transform;
        transform.position = smooth_damp(
            transform.position,
            desired,
            &mut self.velocity,
            self.settings.smooth_time,
            ctx.time.delta,
        );
        transform.look_at(look_point);
        camera.set_transform(transform);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyhunt_core::{
        Entity, FrameTime, InputState, Quat, Scheduler, StaticCollider, UiLayer,
    };
    use keyhunt_physics::{Aabb, Collider, CollisionFilter};

    const EPSILON: f32 = 0.0001;
    const DT: f32 = 1.0 / 60.0;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    struct Harness {
        world: World,
        ui: UiLayer,
        input: InputState,
        scheduler: Scheduler,
        camera: EntityKey,
        target: EntityKey,
    }

    impl Harness {
        fn new(camera_start: Vec3) -> Self {
            let mut world = World::new();
            let target = world.add_entity(Entity::at(Vec3::ZERO).with_name("player"));
            let camera = world.add_entity(Entity::at(camera_start).with_name("camera"));
            Self {
                world,
                ui: UiLayer::new(),
                input: InputState::new(),
                scheduler: Scheduler::new(),
                camera,
                target,
            }
        }

        fn late_frame(&mut self, follow: &mut FollowCamera, delta: f32) {
            let mut ctx = BehaviourContext {
                owner: self.camera,
                world: &mut self.world,
                ui: &mut self.ui,
                input: &self.input,
                time: FrameTime {
                    delta,
                    fixed_delta: 0.02,
                },
                scheduler: &mut self.scheduler,
            };
            follow.on_late_frame(&mut ctx);
        }

        fn camera_position(&self) -> Vec3 {
            self.world.get_entity(self.camera).unwrap().transform.position
        }

        fn add_wall(&mut self, center: Vec3, half_extents: Vec3, filter: CollisionFilter) {
            self.world.physics_mut().add_static_collider(StaticCollider::new(
                Collider::Aabb(Aabb::from_center_half_extents(center, half_extents)),
                filter,
            ));
        }
    }

    #[test]
    fn test_default_settings() {
        let camera = FollowCamera::new(None);
        let settings = camera.settings();
        assert_eq!(settings.offset, Vec3::new(0.0, 3.0, -6.0));
        assert_eq!(settings.smooth_time, 0.05);
        assert_eq!(settings.probe_radius, 0.3);
        assert_eq!(settings.collision_buffer, 0.2);
        assert_eq!(settings.look_height, 1.5);
        assert_eq!(settings.wall_mask, CollisionLayer::WALL);
    }

    #[test]
    fn test_smooth_time_is_clamped() {
        let mut camera = FollowCamera::with_settings(
            None,
            FollowCameraSettings {
                smooth_time: 5.0,
                ..Default::default()
            },
        );
        assert_eq!(camera.smooth_time(), MAX_SMOOTH_TIME);

        camera.set_smooth_time(0.0);
        assert_eq!(camera.smooth_time(), MIN_SMOOTH_TIME);

        camera.set_smooth_time(0.3);
        assert_eq!(camera.smooth_time(), 0.3);
    }

    #[test]
    fn test_desired_without_obstruction() {
        let harness = Harness::new(Vec3::ZERO);
        let camera = FollowCamera::new(Some(harness.target));

        let desired = camera.desired_position(&harness.world, &Transform::identity());
        assert!(vec_approx_eq(desired, Vec3::new(0.0, 3.0, -6.0)));
    }

    #[test]
    fn test_desired_follows_target_rotation() {
        let harness = Harness::new(Vec3::ZERO);
        let camera = FollowCamera::new(Some(harness.target));

        // Target turned to face +X: "behind" is now -X
        let target = Transform::from_position_rotation(
            Vec3::new(1.0, 0.0, 2.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let desired = camera.desired_position(&harness.world, &target);
        assert!(vec_approx_eq(desired, Vec3::new(-5.0, 3.0, 2.0)));
    }

    #[test]
    fn test_desired_stops_short_of_wall() {
        let mut harness = Harness::new(Vec3::ZERO);
        // Front face at z = -2
        harness.add_wall(
            Vec3::new(0.0, 0.0, -2.5),
            Vec3::new(5.0, 5.0, 0.5),
            CollisionFilter::wall(),
        );
        let camera = FollowCamera::with_settings(
            Some(harness.target),
            FollowCameraSettings {
                offset: Vec3::new(0.0, 0.0, -6.0),
                ..Default::default()
            },
        );

        let desired = camera.desired_position(&harness.world, &Transform::identity());
        assert!(vec_approx_eq(desired, Vec3::new(0.0, 0.0, -1.8)));
    }

    #[test]
    fn test_desired_is_buffer_before_hit_point() {
        let mut harness = Harness::new(Vec3::ZERO);
        harness.add_wall(
            Vec3::new(0.0, 0.0, -2.5),
            Vec3::new(5.0, 5.0, 0.5),
            CollisionFilter::wall(),
        );
        let camera = FollowCamera::new(Some(harness.target));
        let settings = camera.settings().clone();

        let direction = settings.offset.normalize();
        let hit = harness
            .world
            .physics()
            .sphere_cast(
                Vec3::ZERO,
                settings.probe_radius,
                direction,
                settings.offset.length(),
                settings.wall_mask,
            )
            .expect("wall should block the offset");

        let desired = camera.desired_position(&harness.world, &Transform::identity());
        assert!(vec_approx_eq(desired, hit.point - direction * settings.collision_buffer));
        assert!(desired.z > -2.0);
    }

    #[test]
    fn test_non_wall_layers_do_not_block() {
        let mut harness = Harness::new(Vec3::ZERO);
        harness.add_wall(
            Vec3::new(0.0, 0.0, -2.5),
            Vec3::new(5.0, 5.0, 0.5),
            CollisionFilter::static_world(),
        );
        let camera = FollowCamera::new(Some(harness.target));

        let desired = camera.desired_position(&harness.world, &Transform::identity());
        assert!(vec_approx_eq(desired, Vec3::new(0.0, 3.0, -6.0)));
    }

    #[test]
    fn test_wall_beyond_offset_is_ignored() {
        let mut harness = Harness::new(Vec3::ZERO);
        harness.add_wall(
            Vec3::new(0.0, 0.0, -12.0),
            Vec3::new(5.0, 5.0, 0.5),
            CollisionFilter::wall(),
        );
        let camera = FollowCamera::new(Some(harness.target));

        let desired = camera.desired_position(&harness.world, &Transform::identity());
        assert!(vec_approx_eq(desired, Vec3::new(0.0, 3.0, -6.0)));
    }

    #[test]
    fn test_zero_offset_does_not_cast() {
        let harness = Harness::new(Vec3::ZERO);
        let camera = FollowCamera::with_settings(
            Some(harness.target),
            FollowCameraSettings {
                offset: Vec3::ZERO,
                ..Default::default()
            },
        );

        let target = Transform::from_position(Vec3::new(2.0, 0.0, 0.0));
        let desired = camera.desired_position(&harness.world, &target);
        assert!(vec_approx_eq(desired, Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut harness = Harness::new(Vec3::new(0.0, 3.0, -20.0));
        let mut camera = FollowCamera::new(Some(harness.target));

        let mut previous = harness.camera_position().z;
        for _ in 0..120 {
            harness.late_frame(&mut camera, DT);
            let z = harness.camera_position().z;
            assert!(z >= previous - EPSILON, "camera moved away from the target");
            assert!(z <= -6.0 + EPSILON, "camera overshot the desired position");
            previous = z;
        }

        assert!(vec_approx_eq(harness.camera_position(), Vec3::new(0.0, 3.0, -6.0)));
    }

    #[test]
    fn test_looks_at_point_above_target() {
        let mut harness = Harness::new(Vec3::new(0.0, 3.0, -6.0));
        let mut camera = FollowCamera::new(Some(harness.target));

        harness.late_frame(&mut camera, DT);

        let transform = harness.world.get_entity(harness.camera).unwrap().transform;
        let expected = (Vec3::new(0.0, 1.5, 0.0) - transform.position).normalize();
        assert!(vec_approx_eq(transform.forward(), expected));
    }

    #[test]
    fn test_velocity_persists_between_frames() {
        let mut harness = Harness::new(Vec3::new(0.0, 3.0, -20.0));
        let mut camera = FollowCamera::new(Some(harness.target));

        harness.late_frame(&mut camera, DT);
        assert!(camera.velocity().z > 0.0);
    }

    #[test]
    fn test_no_target_is_noop() {
        let start = Vec3::new(4.0, 5.0, 6.0);
        let mut harness = Harness::new(start);
        let mut camera = FollowCamera::new(None);
        let rotation = harness.world.get_entity(harness.camera).unwrap().transform.rotation;

        harness.late_frame(&mut camera, DT);
        assert_eq!(harness.camera_position(), start);
        assert_eq!(harness.world.get_entity(harness.camera).unwrap().transform.rotation, rotation);
        assert_eq!(camera.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_despawned_target_is_noop() {
        let start = Vec3::new(4.0, 5.0, 6.0);
        let mut harness = Harness::new(start);
        let mut camera = FollowCamera::new(Some(harness.target));

        harness.world.despawn(harness.target);
        harness.late_frame(&mut camera, DT);
        assert_eq!(harness.camera_position(), start);
    }
}
