//! Periodic falling-object spawner

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use snowfall_math::{SeededRandom, Vec3};
use snowfall_physics::{PhysicsMaterial, RigidBody};

use crate::geometry::MeshData;
use crate::material::Material;
use crate::transform::Transform;
use crate::world::{EntityKey, World};
use crate::Entity;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSettings {
    pub enabled: bool,
    /// Seconds between spawns
    pub period: f32,
    /// No spawns while this many objects are alive
    pub max_objects: usize,
    /// Radius range above the 1-unit minimum
    pub object_size: f32,
    /// Collision skin added to each sphere's radius
    pub margin: f32,
    pub spawn_position: [f32; 3],
    /// Mass per unit of radius
    pub density: f32,
    /// Width and height segments of the sphere mesh
    pub segments: u32,
    pub material: PhysicsMaterial,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 3.0,
            max_objects: 30,
            object_size: 3.0,
            margin: 0.05,
            spawn_position: [0.0, 50.0, 0.0],
            density: 500.0,
            segments: 20,
            material: PhysicsMaterial::default(),
        }
    }
}

/// Spawns a random sphere every `period` seconds up to `max_objects`
#[derive(Clone, Debug)]
pub struct ObjectSpawner {
    pub settings: SpawnerSettings,
    time: f32,
    next_spawn: f32,
    spawned: u64,
}

impl ObjectSpawner {
    pub fn new(settings: SpawnerSettings) -> Self {
        Self {
            next_spawn: settings.period,
            settings,
            time: 0.0,
            spawned: 0,
        }
    }

    /// Check whether a spawn is due, then advance the clock by `dt`.
    ///
    /// A spawn is due once the clock has passed the next spawn time and fewer
    /// than `max_objects` are alive. The next spawn is then scheduled one
    /// period after the current time.
    pub fn tick(&mut self, dt: f32, live_objects: usize) -> bool {
        let due = live_objects < self.settings.max_objects && self.time > self.next_spawn;
        if due {
            self.next_spawn = self.time + self.settings.period;
        }
        self.time += dt.max(0.0);
        due
    }

    /// Seconds since the spawner started
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn next_spawn(&self) -> f32 {
        self.next_spawn
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Add a random sphere with a matching dynamic body.
    ///
    /// Returns `None` when the world has no physics.
    pub fn spawn(&mut self, world: &mut World, rng: &mut SeededRandom) -> Option<EntityKey> {
        let s = &self.settings;
        let radius = 1.0 + rng.next() * s.object_size;
        let color = rng.next_int(1 << 24);
        let position = Vec3::from_array(s.spawn_position);

        let body = RigidBody::new_sphere(position, radius + s.margin)
            .with_mass(radius * s.density)
            .with_material(s.material);
        let body_key = world.physics_mut()?.add_body(body);

        let mesh = Arc::new(MeshData::sphere(radius, s.segments, s.segments));
        let entity = Entity::with_transform(mesh, Transform::from_position(position), Material::phong(color))
            .with_name(format!("object_{}", self.spawned))
            .with_tag("dynamic")
            .with_physics_body(body_key);

        self.spawned += 1;
        log::debug!("Spawned sphere r={:.2} colour #{:06x}", radius, color);
        Some(world.add_entity(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowfall_physics::PhysicsConfig;

    #[test]
    fn test_first_spawn_after_one_period() {
        let mut spawner = ObjectSpawner::new(SpawnerSettings::default());
        let mut spawns = Vec::new();
        // 10 seconds at 0.5 s per frame
        for frame in 0..20 {
            if spawner.tick(0.5, 0) {
                spawns.push(frame);
            }
        }
        // t must pass 3.0 strictly (frame 7 at t = 3.5); the next is due after 6.5
        assert_eq!(spawns, vec![7, 14]);
    }

    #[test]
    fn test_no_spawn_at_capacity() {
        let mut spawner = ObjectSpawner::new(SpawnerSettings::default());
        for _ in 0..100 {
            assert!(!spawner.tick(0.5, 30));
        }
        // Capacity frees up: the overdue spawn happens at once
        assert!(spawner.tick(0.5, 29));
    }

    #[test]
    fn test_spawn_adds_entity_and_body() {
        let mut world = World::new().with_physics(PhysicsConfig::default());
        let mut spawner = ObjectSpawner::new(SpawnerSettings::default());
        let mut rng = SeededRandom::new(11);

        let key = spawner.spawn(&mut world, &mut rng).unwrap();
        let entity = world.get_entity(key).unwrap();
        assert!(entity.has_tag("dynamic"));
        assert_eq!(entity.name.as_deref(), Some("object_0"));
        assert_eq!(entity.transform.position, Vec3::new(0.0, 50.0, 0.0));

        let body = world.physics().unwrap().get_body(entity.physics_body.unwrap()).unwrap();
        let radius = body.radius() - 0.05;
        assert!((1.0..4.0).contains(&radius));
        assert!((body.mass - radius * 500.0).abs() < 1e-2);

        let (lo, hi) = entity.mesh.bounds().unwrap();
        assert!((hi.y - radius).abs() < 1e-3);
        assert!((lo.y + radius).abs() < 1e-3);
        assert_eq!(spawner.spawned(), 1);
    }

    #[test]
    fn test_spawn_without_physics() {
        let mut world = World::new();
        let mut spawner = ObjectSpawner::new(SpawnerSettings::default());
        assert!(spawner.spawn(&mut world, &mut SeededRandom::new(1)).is_none());
        assert!(world.is_empty());
    }
}
