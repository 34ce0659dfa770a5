//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for assembling the snow scene: lights, fog, a ground
//! plane, heightfield terrain, decorative meshes and the snow field.

use std::sync::Arc;

use snowfall_core::{
    AssetCache, Entity, FogExp2, GeometryKind, LightRig, LightSettings, Material, MeshBuilder, PhysicsConfig,
    SeededRandom, SnowField, SnowSettings, Terrain, TerrainConfig, Vec3, World,
};

use crate::config::{AppConfig, GroundConfig};

/// Everything the systems need from a built scene
pub struct Scene {
    pub world: World,
    pub snow: Option<SnowField>,
    pub terrain: Option<Terrain>,
}

/// Builder for constructing the scene
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new()
///     .with_physics(PhysicsConfig::default())
///     .with_fog(Some(FogExp2::new(0x444444, 0.0008)))
///     .add_terrain(&TerrainConfig::default(), &mut rng)
///     .with_snow(&SnowSettings::default(), &mut rng)
///     .build();
/// ```
pub struct SceneBuilder {
    world: World,
    snow: Option<SnowField>,
    terrain: Option<Terrain>,
}

impl SceneBuilder {
    /// Create a new scene builder
    pub fn new() -> Self {
        Self {
            world: World::new(),
            snow: None,
            terrain: None,
        }
    }

    /// Wire up the whole scene from configuration
    ///
    /// Meshes whose assets failed to load are skipped.
    pub fn from_config(config: &AppConfig, assets: &AssetCache, rng: &mut SeededRandom) -> Scene {
        let mut builder = Self::new()
            .with_fog(config.fog.to_fog())
            .with_lights(config.lights.clone());

        if config.physics.enabled {
            builder = builder.with_physics(config.physics.to_physics_config());
        }
        if config.ground.enabled {
            builder = builder.add_ground_plane(&config.ground);
        }
        if config.terrain.enabled {
            builder = builder.add_terrain(&config.terrain, rng);
        }
        for mesh in &config.meshes {
            builder = builder.add_mesh(MeshBuilder::from_config(mesh), assets);
        }
        if config.snow.enabled {
            builder = builder.with_snow(&config.snow, rng);
        }

        let scene = builder.build();
        log::info!(
            "Scene built with {} entities, {} lights, {} snowflakes",
            scene.world.entity_count(),
            scene.world.lights().lights().len(),
            scene.snow.as_ref().map_or(0, SnowField::len)
        );
        scene
    }

    /// Enable physics with the given configuration
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.world = self.world.with_physics(config);
        self
    }

    pub fn with_fog(mut self, fog: Option<FogExp2>) -> Self {
        self.world.set_fog(fog);
        self
    }

    /// Place every light the settings name; disabled lights are skipped
    pub fn with_lights(mut self, settings: LightSettings) -> Self {
        let mut rig = LightRig::new(settings);
        let placed = rig.place_configured();
        log::debug!("Placed {} lights", placed);
        self.world = self.world.with_lights(rig);
        self
    }

    /// Add the flat ground plane
    ///
    /// Visual only; nothing collides with it.
    pub fn add_ground_plane(self, ground: &GroundConfig) -> Self {
        let builder = MeshBuilder::new(GeometryKind::Plane {
            width: ground.size,
            height: ground.size,
            width_segments: ground.segments,
            height_segments: ground.segments,
        })
        .name("ground")
        .position(Vec3::new(0.0, ground.y, 0.0))
        .rotation([std::f32::consts::FRAC_PI_2, 0.0, 0.0])
        .material(Material::from(&ground.material))
        .tag("static");

        // Procedural geometry never touches the asset cache
        self.add_mesh(builder, &AssetCache::new())
    }

    /// Generate terrain, add its mesh and, with physics, its collider
    pub fn add_terrain(mut self, config: &TerrainConfig, rng: &mut SeededRandom) -> Self {
        let terrain = match Terrain::generate(config, rng) {
            Ok(terrain) => terrain,
            Err(e) => {
                log::warn!("Skipping terrain: {}", e);
                return self;
            }
        };

        if let Some(physics) = self.world.physics_mut() {
            physics.add_static_collider(terrain.static_collider());
        }
        self.world.add_entity(
            Entity::with_material(Arc::new(terrain.mesh.clone()), terrain.material.clone())
                .with_name("terrain")
                .with_tag("static"),
        );
        self.terrain = Some(terrain);
        self
    }

    /// Build and add one mesh; failures are logged and the mesh is skipped
    pub fn add_mesh(mut self, builder: MeshBuilder, assets: &AssetCache) -> Self {
        match builder.build(assets) {
            Ok(entity) => {
                self.world.add_entity(entity);
            }
            Err(e) => log::warn!("{}: {}", builder.label(), e),
        }
        self
    }

    /// Add a custom entity to the scene
    pub fn add_entity(mut self, entity: Entity) -> Self {
        self.world.add_entity(entity);
        self
    }

    /// Scatter the snow field
    pub fn with_snow(mut self, settings: &SnowSettings, rng: &mut SeededRandom) -> Self {
        self.snow = Some(SnowField::new(settings, rng));
        self
    }

    /// Build the scene
    pub fn build(self) -> Scene {
        Scene {
            world: self.world,
            snow: self.snow,
            terrain: self.terrain,
        }
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowfall_core::{LightKind, MeshData};

    #[test]
    fn test_empty_scene() {
        let scene = SceneBuilder::new().build();
        assert_eq!(scene.world.entity_count(), 0);
        assert!(scene.world.physics().is_none());
        assert!(scene.snow.is_none());
        assert!(scene.terrain.is_none());
    }

    #[test]
    fn test_scene_with_physics() {
        let scene = SceneBuilder::new().with_physics(PhysicsConfig::default()).build();
        let physics = scene.world.physics().unwrap();
        assert_eq!(physics.config.gravity, Vec3::new(0.0, -100.0, 0.0));
    }

    #[test]
    fn test_ground_plane_faces_down_at_configured_height() {
        let scene = SceneBuilder::new().add_ground_plane(&GroundConfig::default()).build();
        let (_, ground) = scene.world.get_by_name("ground").unwrap();
        assert_eq!(ground.transform.position, Vec3::new(0.0, -20.0, 0.0));
        assert_eq!(ground.mesh.vertex_count(), 121);
        assert!(ground.has_tag("static"));
    }

    #[test]
    fn test_terrain_adds_collider_only_with_physics() {
        let mut rng = SeededRandom::new(1);
        let scene = SceneBuilder::new()
            .with_physics(PhysicsConfig::default())
            .add_terrain(&TerrainConfig::default(), &mut rng)
            .build();
        assert_eq!(scene.world.physics().unwrap().static_colliders().len(), 1);
        assert!(scene.world.get_by_name("terrain").is_some());
        assert_eq!(scene.terrain.unwrap().heights.len(), 200);

        let scene = SceneBuilder::new()
            .add_terrain(&TerrainConfig::default(), &mut rng)
            .build();
        assert!(scene.world.physics().is_none());
        assert_eq!(scene.world.entity_count(), 1);
    }

    #[test]
    fn test_invalid_terrain_is_skipped() {
        let config = TerrainConfig {
            width: 1,
            ..TerrainConfig::default()
        };
        let scene = SceneBuilder::new()
            .add_terrain(&config, &mut SeededRandom::new(1))
            .build();
        assert_eq!(scene.world.entity_count(), 0);
        assert!(scene.terrain.is_none());
    }

    #[test]
    fn test_missing_model_is_skipped() {
        let assets = AssetCache::new();
        let scene = SceneBuilder::new()
            .add_mesh(MeshBuilder::new(GeometryKind::Json { model: "teapot".into() }), &assets)
            .add_mesh(
                MeshBuilder::new(GeometryKind::Box { width: 1.0, height: 1.0, depth: 1.0 }).name("crate"),
                &assets,
            )
            .build();
        assert_eq!(scene.world.entity_count(), 1);
        assert!(scene.world.get_by_name("crate").is_some());
    }

    #[test]
    fn test_model_from_cache_is_placed() {
        let mut assets = AssetCache::new();
        let handle = assets.insert("models/tri.json", MeshData::cuboid(1.0, 1.0, 1.0));
        assets.set_name(&handle, "tri");

        let scene = SceneBuilder::new()
            .add_mesh(MeshBuilder::new(GeometryKind::Json { model: "tri".into() }), &assets)
            .build();
        assert_eq!(scene.world.entity_count(), 1);
    }

    #[test]
    fn test_lights_follow_settings() {
        let scene = SceneBuilder::new().with_lights(LightSettings::default()).build();
        let lights = scene.world.lights();
        // Ambient is named but disabled
        assert!(lights.find(LightKind::Ambient).is_none());
        assert!(lights.find(LightKind::Directional).is_some());
        assert!(lights.find(LightKind::Hemisphere).is_some());
    }

    #[test]
    fn test_from_config_builds_demo_scene() {
        let mut config = AppConfig::default();
        config.snow.count = 100;
        let mut rng = SeededRandom::new(42);
        let scene = SceneBuilder::from_config(&config, &AssetCache::new(), &mut rng);

        // Ground and terrain; the teapot model is not loaded
        assert_eq!(scene.world.entity_count(), 2);
        assert!(scene.world.fog().is_some());
        assert_eq!(scene.snow.as_ref().map(SnowField::len), Some(100));
        assert_eq!(scene.world.physics().unwrap().static_colliders().len(), 1);
    }
}
