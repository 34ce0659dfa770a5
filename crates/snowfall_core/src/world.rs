//! World container for entities
//!
//! The World manages all entities in the scene, together with the optional
//! physics simulation, the placed lights and the fog.

use std::collections::HashSet;

use slotmap::{new_key_type, SlotMap};
use snowfall_physics::{PhysicsConfig, PhysicsWorld};

use crate::fog::FogExp2;
use crate::light::LightRig;
use crate::Entity;

new_key_type! {
    /// Generational key to an entity in the world
    pub struct EntityKey;
}

/// The scene world containing all entities
///
/// The World is the central container for all scene objects.
/// It manages entities and integrates with physics simulation.
#[derive(Default)]
pub struct World {
    /// All entities in the world
    entities: SlotMap<EntityKey, Entity>,
    /// Optional physics simulation (None = no physics)
    physics_world: Option<PhysicsWorld>,
    lights: LightRig,
    fog: Option<FogExp2>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world with pre-allocated capacity for entities
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: SlotMap::with_capacity_and_key(capacity),
            ..Self::default()
        }
    }

    /// Enable physics for this world
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.physics_world = Some(PhysicsWorld::with_config(config));
        self
    }

    pub fn with_lights(mut self, lights: LightRig) -> Self {
        self.lights = lights;
        self
    }

    pub fn with_fog(mut self, fog: Option<FogExp2>) -> Self {
        self.fog = fog;
        self
    }

    /// Get the physics world (if enabled)
    pub fn physics(&self) -> Option<&PhysicsWorld> {
        self.physics_world.as_ref()
    }

    /// Get mutable physics world (if enabled)
    pub fn physics_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.physics_world.as_mut()
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightRig {
        &mut self.lights
    }

    pub fn fog(&self) -> Option<&FogExp2> {
        self.fog.as_ref()
    }

    pub fn set_fog(&mut self, fog: Option<FogExp2>) {
        self.fog = fog;
    }

    /// Add an entity to the world, returning its key
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        self.entities.insert(entity)
    }

    /// Remove an entity and the physics body linked to it
    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        let entity = self.entities.remove(key)?;
        if let (Some(body), Some(physics)) = (entity.physics_body, self.physics_world.as_mut()) {
            physics.remove_body(body);
        }
        Some(entity)
    }

    /// Get a reference to an entity by key
    pub fn get_entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Get a mutable reference to an entity by key
    pub fn get_entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Find the first entity with the given name
    pub fn get_by_name(&self, name: &str) -> Option<(EntityKey, &Entity)> {
        self.entities
            .iter()
            .find(|(_, e)| e.name.as_deref() == Some(name))
    }

    /// Keys of every entity carrying the tag
    pub fn get_by_tag(&self, tag: &str) -> Vec<EntityKey> {
        self.entities
            .iter()
            .filter(|(_, e)| e.has_tag(tag))
            .map(|(k, _)| k)
            .collect()
    }

    /// Get the number of entities
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of entities driven by a physics body
    pub fn physics_entity_count(&self) -> usize {
        self.entities.values().filter(|e| e.physics_body.is_some()).count()
    }

    /// Check if the world is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Update the world by stepping physics and syncing entity transforms
    ///
    /// This method:
    /// 1. Advances the physics simulation by `dt` in fixed sub-steps (if enabled)
    /// 2. Syncs position and rotation of entities from their physics bodies
    ///
    /// Returns the number of fixed steps taken.
    pub fn update(&mut self, dt: f32) -> u32 {
        let Some(physics) = self.physics_world.as_mut() else {
            return 0;
        };
        let steps = physics.step_simulation(dt);
        if steps == 0 {
            return 0;
        }

        for entity in self.entities.values_mut() {
            if let Some(body_key) = entity.physics_body {
                if let Some(body) = physics.get_body(body_key) {
                    if !body.is_static() {
                        entity.set_pose(body.position, body.rotation);
                    }
                }
            }
        }
        steps
    }

    /// Remove dynamic bodies below `y` together with their entities
    ///
    /// Returns how many entities were removed.
    pub fn despawn_below(&mut self, y: f32) -> usize {
        let Some(physics) = self.physics_world.as_mut() else {
            return 0;
        };
        let removed: HashSet<_> = physics.despawn_below(y).into_iter().collect();
        if removed.is_empty() {
            return 0;
        }

        let before = self.entities.len();
        self.entities
            .retain(|_, e| e.physics_body.map_or(true, |body| !removed.contains(&body)));
        let count = before - self.entities.len();
        log::debug!("Despawned {} entities below y = {}", count, y);
        count
    }

    /// Check if any entity needs re-uploading
    pub fn has_dirty_entities(&self) -> bool {
        self.entities.values().any(Entity::is_dirty)
    }

    /// Clear dirty flags on every entity
    pub fn clear_all_dirty(&mut self) {
        for entity in self.entities.values_mut() {
            entity.clear_dirty();
        }
    }

    /// Clear all entities from the world
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Iterate over all entities
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Iterate over all entities mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Iterate over keys and entities
    pub fn iter_with_keys(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }
}
