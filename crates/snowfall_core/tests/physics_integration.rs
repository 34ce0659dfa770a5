//! Integration tests for the terrain and falling-object pipeline
//!
//! These tests drive the same pieces the demo wires together each frame:
//! 1. Terrain generation produces a static heightfield collider
//! 2. The spawner adds sphere entities with dynamic bodies
//! 3. `World::update` steps physics and syncs entity transforms
//! 4. Bodies that fall out of the world are despawned with their entities

use snowfall_core::{
    DirtyFlags, ObjectSpawner, PhysicsConfig, SeededRandom, SpawnerSettings, Terrain, TerrainConfig, Vec3, World,
};

const FRAME: f32 = 1.0 / 60.0;

fn world_with_terrain(terrain: &Terrain) -> World {
    let mut world = World::new().with_physics(PhysicsConfig::default());
    world
        .physics_mut()
        .expect("World should have physics")
        .add_static_collider(terrain.static_collider());
    world
}

fn flat_terrain() -> Terrain {
    let config = TerrainConfig {
        width: 3,
        depth: 3,
        ..TerrainConfig::default()
    };
    Terrain::from_heights(&config, vec![0.0; 9]).expect("3x3 terrain is valid")
}

// ==================== Spawning Tests ====================

/// Test that a spawned sphere gets a dynamic body at the spawn point
#[test]
fn test_spawned_sphere_has_dynamic_body() {
    let mut world = World::new().with_physics(PhysicsConfig::default());
    let mut spawner = ObjectSpawner::new(SpawnerSettings::default());
    let mut rng = SeededRandom::new(7);

    let key = spawner.spawn(&mut world, &mut rng).expect("physics is enabled");
    let entity = world.get_entity(key).unwrap();
    assert_eq!(entity.name.as_deref(), Some("object_0"));
    assert!(entity.has_tag("dynamic"));

    let body = world.physics().unwrap().get_body(entity.physics_body.unwrap()).unwrap();
    assert!(body.is_dynamic());
    assert_eq!(body.position, Vec3::new(0.0, 50.0, 0.0));

    // Collider carries the margin on top of the visual radius
    let (min, max) = entity.mesh.bounds().unwrap();
    let visual_radius = (max.y - min.y) / 2.0;
    assert!((body.radius() - visual_radius - 0.05).abs() < 1e-3);
    assert!((body.mass - visual_radius * 500.0).abs() < 0.5);
}

/// Test that the spawner never keeps more than `max_objects` alive
#[test]
fn test_spawner_respects_max_objects() {
    let terrain = flat_terrain();
    let mut world = world_with_terrain(&terrain);
    let mut spawner = ObjectSpawner::new(SpawnerSettings {
        period: 0.1,
        max_objects: 2,
        ..SpawnerSettings::default()
    });
    let mut rng = SeededRandom::new(3);

    for _ in 0..120 {
        if spawner.tick(FRAME, world.physics_entity_count()) {
            spawner.spawn(&mut world, &mut rng);
        }
        world.update(FRAME);
    }

    assert_eq!(world.physics_entity_count(), 2);
    assert_eq!(spawner.spawned(), 2);
}

// ==================== Simulation Tests ====================

/// Test that a falling sphere comes to rest on flat terrain
#[test]
fn test_sphere_settles_on_flat_terrain() {
    let terrain = flat_terrain();
    let mut world = world_with_terrain(&terrain);
    let mut spawner = ObjectSpawner::new(SpawnerSettings::default());
    let mut rng = SeededRandom::new(11);
    let key = spawner.spawn(&mut world, &mut rng).unwrap();

    for _ in 0..600 {
        world.update(FRAME);
    }

    let entity = world.get_entity(key).unwrap();
    let body = world.physics().unwrap().get_body(entity.physics_body.unwrap()).unwrap();
    let rest_height = body.radius() + terrain.heightfield.margin;
    assert!(
        (body.position.y - rest_height).abs() < 0.15,
        "y = {}, expected about {}",
        body.position.y,
        rest_height
    );
    assert!(body.velocity.length() < 2.0, "v = {:?}", body.velocity);
}

/// Test that spheres dropped on the generated terrain never end up inside it
#[test]
fn test_spheres_stay_above_generated_terrain() {
    let mut rng = SeededRandom::new(2024);
    let terrain = Terrain::generate(&TerrainConfig::default(), &mut rng).unwrap();
    let mut world = world_with_terrain(&terrain);
    let mut spawner = ObjectSpawner::new(SpawnerSettings::default());

    for _ in 0..600 {
        if spawner.tick(FRAME, world.physics_entity_count()) {
            spawner.spawn(&mut world, &mut rng);
        }
        world.update(FRAME);

        let physics = world.physics().unwrap();
        for (_, body) in physics.bodies() {
            if let Some(h) = terrain.heightfield.height_at(body.position.x, body.position.z) {
                assert!(
                    body.position.y > h - body.radius() * 0.5,
                    "centre {:?} sank below the surface at {}",
                    body.position,
                    h
                );
            }
        }
    }

    // Spawns fall due just after 3, 6 and 9 seconds
    assert_eq!(spawner.spawned(), 3);
}

/// Test that entity transforms follow their bodies and are marked dirty
#[test]
fn test_entity_transform_syncs_from_body() {
    let terrain = flat_terrain();
    let mut world = world_with_terrain(&terrain);
    let mut spawner = ObjectSpawner::new(SpawnerSettings::default());
    let key = spawner.spawn(&mut world, &mut SeededRandom::new(5)).unwrap();
    world.clear_all_dirty();

    assert!(world.update(FRAME * 3.0) >= 2);

    let entity = world.get_entity(key).unwrap();
    let body = world.physics().unwrap().get_body(entity.physics_body.unwrap()).unwrap();
    assert_eq!(entity.transform.position, body.position);
    assert_eq!(entity.transform.rotation, body.rotation);
    assert!(entity.transform.position.y < 50.0);
    assert!(entity.dirty_flags().contains(DirtyFlags::TRANSFORM));
}

// ==================== Despawn Tests ====================

/// Test that bodies falling past the kill height are removed with their entities
#[test]
fn test_fallen_objects_are_despawned() {
    let mut world = World::new().with_physics(PhysicsConfig::default());
    let mut spawner = ObjectSpawner::new(SpawnerSettings::default());
    spawner.spawn(&mut world, &mut SeededRandom::new(9)).unwrap();

    // No terrain: a 550 unit drop at 100 units/s^2 takes about 3.3 s
    for _ in 0..300 {
        world.update(FRAME);
    }
    assert_eq!(world.despawn_below(-500.0), 1);
    assert_eq!(world.entity_count(), 0);
    assert_eq!(world.physics().unwrap().body_count(), 0);

    // Nothing left to remove
    assert_eq!(world.despawn_below(-500.0), 0);
}
