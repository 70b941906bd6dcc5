//! World container for entities
//!
//! The World owns the entities, the physics simulation they are linked to,
//! and the main camera binding.

use crate::camera::Projection;
use crate::entity::EntityTemplate;
use crate::Entity;
use keyhunt_math::{Ray, Vec2, Vec3};
use keyhunt_physics::{
    BodyKey, PhysicsConfig, PhysicsWorld, RigidBody, TriggerEvent, TriggerKey, TriggerVolume,
};
use slotmap::{new_key_type, SecondaryMap, SlotMap};

new_key_type! {
    /// Key to an entity in the world
    ///
    /// Generational: a despawned entity's key never resolves to a
    /// different entity that later reuses the slot.
    pub struct EntityKey;
}

/// The other side of a trigger overlap, as seen by the entity that moved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerContact {
    /// Entity owning the trigger volume
    pub entity: EntityKey,
    /// The trigger's tag (e.g. "Key")
    pub tag: String,
}

/// The game world containing all entities
pub struct World {
    entities: SlotMap<EntityKey, Entity>,
    physics: PhysicsWorld,
    body_owners: SecondaryMap<BodyKey, EntityKey>,
    trigger_owners: SecondaryMap<TriggerKey, EntityKey>,
    main_camera: Option<EntityKey>,
    /// Projection used by the main camera
    pub projection: Projection,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world with default physics
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            physics: PhysicsWorld::new(),
            body_owners: SecondaryMap::new(),
            trigger_owners: SecondaryMap::new(),
            main_camera: None,
            projection: Projection::default(),
        }
    }

    /// Replace the physics configuration (call before adding bodies)
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.physics.config = config;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    // --- Entities ---

    /// Add an entity to the world, returning its key
    ///
    /// Physics keys already set on the entity are registered as owned by it.
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        let body = entity.physics_body;
        let trigger = entity.trigger;
        let key = self.entities.insert(entity);

        if let Some(body) = body {
            self.body_owners.insert(body, key);
        }
        if let Some(trigger) = trigger {
            self.trigger_owners.insert(trigger, key);
        }
        key
    }

    /// Add an entity together with a new rigid body
    pub fn spawn_with_body(&mut self, entity: Entity, body: RigidBody) -> EntityKey {
        let body_key = self.physics.add_body(body);
        self.add_entity(entity.with_physics_body(body_key))
    }

    /// Give an existing entity a trigger volume, replacing any previous one
    pub fn attach_trigger(&mut self, key: EntityKey, trigger: TriggerVolume) -> Option<TriggerKey> {
        if !self.entities.contains_key(key) {
            return None;
        }

        let trigger_key = self.physics.add_trigger(trigger);
        self.trigger_owners.insert(trigger_key, key);
        let entity = self.entities.get_mut(key)?;
        if let Some(old) = entity.trigger.replace(trigger_key) {
            self.physics.remove_trigger(old);
            self.trigger_owners.remove(old);
        }
        Some(trigger_key)
    }

    /// Create an entity from a template, including its physics representation
    pub fn instantiate(&mut self, template: &EntityTemplate) -> EntityKey {
        let position = template.transform.position;
        let entity = template.to_entity();

        let key = match &template.physics {
            Some(physics) => {
                if let Some(collider) = physics.static_collider(position) {
                    self.physics.add_static_collider(collider);
                }
                match physics.rigid_body(position) {
                    Some(body) => self.spawn_with_body(entity, body),
                    None => self.add_entity(entity),
                }
            }
            None => self.add_entity(entity),
        };

        if let Some(trigger) = &template.trigger {
            self.attach_trigger(key, trigger.to_volume(position));
        }
        key
    }

    pub fn get_entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn get_entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    /// Remove an entity along with its physics body and trigger
    ///
    /// Overlaps involving the removed body or trigger end silently: no exit
    /// event is produced for them.
    pub fn despawn(&mut self, key: EntityKey) -> Option<Entity> {
        let entity = self.entities.remove(key)?;

        if let Some(body) = entity.physics_body {
            self.physics.remove_body(body);
            self.body_owners.remove(body);
        }
        if let Some(trigger) = entity.trigger {
            self.physics.remove_trigger(trigger);
            self.trigger_owners.remove(trigger);
        }
        if self.main_camera == Some(key) {
            self.main_camera = None;
        }
        Some(entity)
    }

    /// First entity with the given name
    pub fn find_by_name(&self, name: &str) -> Option<EntityKey> {
        self.entities
            .iter()
            .find(|(_, e)| e.name.as_deref() == Some(name))
            .map(|(k, _)| k)
    }

    /// First entity carrying the given tag
    pub fn find_by_tag(&self, tag: &str) -> Option<EntityKey> {
        self.iter_with_tag(tag).next()
    }

    /// Keys of every entity carrying the given tag
    pub fn iter_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = EntityKey> + 'a {
        self.entities
            .iter()
            .filter(move |(_, e)| e.has_tag(tag))
            .map(|(k, _)| k)
    }

    pub fn iter_with_keys(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // --- Main camera ---

    pub fn set_main_camera(&mut self, key: Option<EntityKey>) {
        self.main_camera = key.filter(|k| self.entities.contains_key(*k));
    }

    /// The main camera, if one is bound and still exists
    pub fn main_camera(&self) -> Option<EntityKey> {
        self.main_camera.filter(|k| self.entities.contains_key(*k))
    }

    /// Ray from the main camera through a pixel (top-left origin)
    pub fn screen_point_to_ray(&self, screen: Vec2) -> Option<Ray> {
        let camera = self.get_entity(self.main_camera()?)?;
        Some(self.projection.screen_point_to_ray(&camera.transform, screen))
    }

    // --- Physics links ---

    pub fn body_owner(&self, body: BodyKey) -> Option<EntityKey> {
        self.body_owners.get(body).copied()
    }

    pub fn trigger_owner(&self, trigger: TriggerKey) -> Option<EntityKey> {
        self.trigger_owners.get(trigger).copied()
    }

    /// Move an entity toward `target`
    ///
    /// Entities with a physics body move through `move_position` and stop or
    /// slide at solid geometry. Others are teleported. Returns the new position.
    pub fn move_entity(&mut self, key: EntityKey, target: Vec3) -> Option<Vec3> {
        let entity = self.entities.get_mut(key)?;
        let position = match entity.physics_body {
            Some(body) => self.physics.move_position(body, target)?,
            None => target,
        };
        entity.set_position(position);
        Some(position)
    }

    /// Place an entity (and its body) at `position` without collision checks
    pub fn teleport_entity(&mut self, key: EntityKey, position: Vec3) -> bool {
        let Some(entity) = self.entities.get_mut(key) else {
            return false;
        };
        if let Some(body) = entity.physics_body.and_then(|b| self.physics.get_body_mut(b)) {
            body.set_position(position);
        }
        entity.set_position(position);
        true
    }

    /// Resolve a physics trigger event into the entity that moved and what it touched
    pub fn resolve_trigger(&self, event: &TriggerEvent) -> Option<(EntityKey, TriggerContact)> {
        let mover = self.body_owner(event.body)?;
        let owner = self.trigger_owner(event.trigger)?;
        let tag = self.physics.get_trigger(event.trigger)?.tag.clone();
        Some((mover, TriggerContact { entity: owner, tag }))
    }

    /// Copy body positions back into entity transforms
    pub fn sync_from_physics(&mut self) {
        for (_key, entity) in &mut self.entities {
            let Some(body) = entity.physics_body.and_then(|b| self.physics.get_body(b)) else {
                continue;
            };
            entity.transform.position = body.position;
        }
    }

    /// Remove all entities and physics state
    pub fn clear(&mut self) {
        let config = self.physics.config.clone();
        self.entities.clear();
        self.physics = PhysicsWorld::with_config(config);
        self.body_owners.clear();
        self.trigger_owners.clear();
        self.main_camera = None;
    }
}
