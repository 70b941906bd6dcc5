//! Physics world and simulation

use std::collections::BTreeSet;

use crate::body::{BodyKey, BodyType, RigidBody, StaticCollider};
use crate::cast::{sweep_sphere, ColliderRef, SphereCastHit};
use crate::collision::{collider_contact, colliders_overlap, CollisionFilter, CollisionLayer};
use crate::trigger::{TriggerEvent, TriggerKey, TriggerPhase, TriggerVolume};
use keyhunt_math::Vec3;
use slotmap::SlotMap;

/// Gap kept between a moved body and the surface it stopped against
const SKIN: f32 = 0.01;
/// Collide-and-slide passes per `move_position` call
const MAX_SLIDE_ITERATIONS: usize = 3;

/// Configuration for the physics simulation
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity acceleration (applied to Y-axis, negative = down)
    pub gravity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { gravity: -9.81 }
    }
}

impl PhysicsConfig {
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }
}

/// The physics world containing bodies, static geometry and triggers
pub struct PhysicsWorld {
    bodies: SlotMap<BodyKey, RigidBody>,
    static_colliders: Vec<StaticCollider>,
    triggers: SlotMap<TriggerKey, TriggerVolume>,
    /// Trigger/body pairs overlapping as of the last step
    overlaps: BTreeSet<(TriggerKey, BodyKey)>,
    /// Events produced by steps and not yet drained
    events: Vec<TriggerEvent>,
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            static_colliders: Vec::new(),
            triggers: SlotMap::with_key(),
            overlaps: BTreeSet::new(),
            events: Vec::new(),
            config,
        }
    }

    /// Add a static collider, returning its index
    pub fn add_static_collider(&mut self, collider: StaticCollider) -> usize {
        self.static_colliders.push(collider);
        self.static_colliders.len() - 1
    }

    pub fn static_colliders(&self) -> &[StaticCollider] {
        &self.static_colliders
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body
    ///
    /// Overlaps involving the body are forgotten without producing exit events.
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        self.overlaps.retain(|&(_, body)| body != key);
        self.bodies.remove(key)
    }

    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    pub fn add_trigger(&mut self, trigger: TriggerVolume) -> TriggerKey {
        self.triggers.insert(trigger)
    }

    /// Remove a trigger volume
    ///
    /// Bodies inside it do not receive an exit event.
    pub fn remove_trigger(&mut self, key: TriggerKey) -> Option<TriggerVolume> {
        self.overlaps.retain(|&(trigger, _)| trigger != key);
        self.triggers.remove(key)
    }

    pub fn get_trigger(&self, key: TriggerKey) -> Option<&TriggerVolume> {
        self.triggers.get(key)
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Whether a body currently overlaps a trigger (as of the last step)
    pub fn is_overlapping(&self, trigger: TriggerKey, body: BodyKey) -> bool {
        self.overlaps.contains(&(trigger, body))
    }

    /// Sweep a sphere and return the closest hit on the layers in `mask`
    ///
    /// Triggers never block a cast. Shapes the sphere already overlaps at
    /// `origin` are skipped.
    pub fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: CollisionLayer,
    ) -> Option<SphereCastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let statics = self
            .static_colliders
            .iter()
            .enumerate()
            .filter(|(_, s)| s.filter.layer.intersects(mask))
            .map(|(i, s)| (ColliderRef::Static(i), &s.collider));
        let bodies = self
            .bodies
            .iter()
            .filter(|(_, b)| b.filter.layer.intersects(mask))
            .map(|(k, b)| (ColliderRef::Body(k), &b.collider));

        let hit = statics
            .chain(bodies)
            .filter_map(|(collider, shape)| {
                sweep_sphere(origin, radius, direction, max_distance, shape).map(|hit| {
                    SphereCastHit {
                        point: hit.point,
                        normal: hit.normal,
                        distance: hit.distance,
                        collider,
                    }
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance));

        if let Some(hit) = &hit {
            log::debug!(
                "Sphere cast hit {:?} at distance {:.3}",
                hit.collider,
                hit.distance
            );
        }
        hit
    }

    /// Move a body toward `target`, stopping at or sliding along solid geometry
    ///
    /// Solid geometry is every static collider and every other body whose
    /// filter collides with the moving body. Returns the resulting position,
    /// or `None` if the key is stale.
    pub fn move_position(&mut self, key: BodyKey, target: Vec3) -> Option<Vec3> {
        let body = self.bodies.get(key)?;
        let radius = body.collider.sweep_radius();
        let filter = body.filter;
        let mut position = body.position;
        let mut remaining = target - position;

        for _ in 0..MAX_SLIDE_ITERATIONS {
            let distance = remaining.length();
            if distance < 1e-6 {
                break;
            }
            let direction = remaining / distance;

            match self.closest_blocking_hit(key, &filter, position, radius, direction, distance + SKIN)
            {
                None => {
                    position += remaining;
                    break;
                }
                Some(hit) => {
                    let travel = (hit.distance - SKIN).clamp(0.0, distance);
                    position += direction * travel;
                    let leftover = remaining - direction * travel;
                    remaining = leftover - hit.normal * leftover.dot(hit.normal);
                }
            }
        }

        let body = self.bodies.get_mut(key)?;
        body.set_position(position);
        Some(position)
    }

    fn closest_blocking_hit(
        &self,
        mover: BodyKey,
        filter: &CollisionFilter,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<SphereCastHit> {
        let statics = self
            .static_colliders
            .iter()
            .enumerate()
            .filter(|(_, s)| filter.collides_with(&s.filter))
            .map(|(i, s)| (ColliderRef::Static(i), &s.collider));
        let bodies = self
            .bodies
            .iter()
            .filter(|&(k, b)| k != mover && filter.collides_with(&b.filter))
            .map(|(k, b)| (ColliderRef::Body(k), &b.collider));

        statics
            .chain(bodies)
            .filter_map(|(collider, shape)| {
                sweep_sphere(origin, radius, direction, max_distance, shape).map(|hit| {
                    SphereCastHit {
                        point: hit.point,
                        normal: hit.normal,
                        distance: hit.distance,
                        collider,
                    }
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// 1. Gravity and velocity integration for dynamic bodies
    /// 2. Push dynamic bodies out of static geometry
    /// 3. Trigger overlap detection (queues enter/exit events)
    pub fn step(&mut self, dt: f32) {
        for (_key, body) in &mut self.bodies {
            if body.body_type != BodyType::Dynamic {
                continue;
            }

            if body.affected_by_gravity {
                body.velocity.y += self.config.gravity * dt;
            }

            let displacement = body.velocity * dt;
            body.apply_correction(displacement);
        }

        self.resolve_static_collisions();
        self.update_triggers();
    }

    fn resolve_static_collisions(&mut self) {
        for (_key, body) in &mut self.bodies {
            if body.body_type != BodyType::Dynamic {
                continue;
            }

            for static_col in &self.static_colliders {
                if !body.filter.collides_with(&static_col.filter) {
                    continue;
                }

                let Some(contact) = collider_contact(&body.collider, &static_col.collider) else {
                    continue;
                };
                if !contact.is_colliding() {
                    continue;
                }

                body.apply_correction(contact.normal * contact.penetration);

                // Cancel velocity into the surface
                let into = body.velocity.dot(contact.normal);
                if into < 0.0 {
                    body.velocity -= contact.normal * into;
                }
            }
        }
    }

    fn update_triggers(&mut self) {
        let mut current = BTreeSet::new();
        for (trigger_key, trigger) in &self.triggers {
            for (body_key, body) in &self.bodies {
                if body.filter.layer.intersects(trigger.detects)
                    && colliders_overlap(&body.collider, &trigger.collider)
                {
                    current.insert((trigger_key, body_key));
                }
            }
        }

        for &(trigger, body) in self.overlaps.difference(&current) {
            log::debug!("Trigger exit: {:?} left {:?}", body, trigger);
            self.events.push(TriggerEvent {
                phase: TriggerPhase::Exit,
                body,
                trigger,
            });
        }
        for &(trigger, body) in current.difference(&self.overlaps) {
            log::debug!("Trigger enter: {:?} entered {:?}", body, trigger);
            self.events.push(TriggerEvent {
                phase: TriggerPhase::Enter,
                body,
                trigger,
            });
        }

        self.overlaps = current;
    }

    /// Take all trigger events queued since the last drain, oldest first
    pub fn drain_trigger_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
