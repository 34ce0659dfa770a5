//! Fluent construction of renderable entities
//!
//! A [`MeshBuilder`] pairs a geometry description with placement and a
//! material. Procedural geometry is built on the spot; JSON model geometry is
//! taken from the asset cache by name.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use snowfall_math::Vec3;

use crate::asset_cache::AssetCache;
use crate::asset_error::AssetError;
use crate::entity::Entity;
use crate::geometry::{GeometryKind, MeshData};
use crate::material::{Material, MaterialConfig};
use crate::transform::Transform;

/// Serializable mesh placement, as found in the `meshes` config list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub geometry: GeometryKind,
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles (XYZ order) applied to the entity
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// Euler angles baked into the vertices before placement
    #[serde(default)]
    pub geo_rotate: [f32; 3],
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Builder for a single mesh entity
#[derive(Clone, Debug)]
pub struct MeshBuilder {
    name: Option<String>,
    geometry: GeometryKind,
    position: Vec3,
    rotation: [f32; 3],
    scale: Vec3,
    geo_rotate: [f32; 3],
    material: Material,
    tags: Vec<String>,
}

impl MeshBuilder {
    pub fn new(geometry: GeometryKind) -> Self {
        Self {
            name: None,
            geometry,
            position: Vec3::ZERO,
            rotation: [0.0; 3],
            scale: Vec3::ONE,
            geo_rotate: [0.0; 3],
            material: Material::default(),
            tags: Vec::new(),
        }
    }

    pub fn from_config(config: &MeshConfig) -> Self {
        Self {
            name: config.name.clone(),
            geometry: config.geometry.clone(),
            position: Vec3::from_array(config.position),
            rotation: config.rotation,
            scale: Vec3::from_array(config.scale),
            geo_rotate: config.geo_rotate,
            material: Material::from(&config.material),
            tags: config.tags.clone(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, euler: [f32; 3]) -> Self {
        self.rotation = euler;
        self
    }

    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn uniform_scale(self, factor: f32) -> Self {
        self.scale(Vec3::splat(factor))
    }

    pub fn geo_rotate(mut self, euler: [f32; 3]) -> Self {
        self.geo_rotate = euler;
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Label used in log messages
    pub fn label(&self) -> &str {
        match (&self.name, &self.geometry) {
            (Some(name), _) => name,
            (None, GeometryKind::Json { model }) => model,
            (None, GeometryKind::Plane { .. }) => "plane",
            (None, GeometryKind::Sphere { .. }) => "sphere",
            (None, GeometryKind::Box { .. }) => "box",
        }
    }

    /// Build the entity
    ///
    /// Fails only when JSON geometry names a model that is not in the cache.
    pub fn build(&self, assets: &AssetCache) -> Result<Entity, AssetError> {
        let mut mesh = match &self.geometry {
            GeometryKind::Json { model } => MeshData::clone(&*assets.require_named::<MeshData>(model)?),
            primitive => primitive
                .build_primitive()
                .ok_or_else(|| AssetError::Parse(format!("no procedural geometry for {:?}", primitive)))?,
        };
        mesh.rotate_euler(self.geo_rotate);

        let transform = Transform::from_euler(self.position, self.rotation, self.scale);
        let mut entity = Entity::with_transform(Arc::new(mesh), transform, self.material.clone())
            .with_tags(self.tags.iter().cloned());
        if let Some(name) = &self.name {
            entity = entity.with_name(name.clone());
        }
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn ground() -> GeometryKind {
        GeometryKind::Plane {
            width: 150.0,
            height: 150.0,
            width_segments: 10,
            height_segments: 10,
        }
    }

    #[test]
    fn test_build_ground_plane() {
        let entity = MeshBuilder::new(ground())
            .name("ground")
            .position(Vec3::new(0.0, -20.0, 0.0))
            .rotation([FRAC_PI_2, 0.0, 0.0])
            .material(Material::lambert(0x999999))
            .tag("static")
            .build(&AssetCache::new())
            .unwrap();

        assert_eq!(entity.name.as_deref(), Some("ground"));
        assert!(entity.has_tag("static"));
        assert_eq!(entity.mesh.vertex_count(), 121);
        assert_eq!(entity.transform.position, Vec3::new(0.0, -20.0, 0.0));

        // XY plane rotated a quarter turn about X ends up facing -Y
        let normal = entity.transform.transform_direction(Vec3::Z);
        assert!((normal.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_geo_rotate_is_baked_into_vertices() {
        let entity = MeshBuilder::new(ground())
            .geo_rotate([-FRAC_PI_2, 0.0, 0.0])
            .build(&AssetCache::new())
            .unwrap();
        let (min, max) = entity.mesh.bounds().unwrap();
        assert!((max.y - min.y).abs() < 1e-4);
        assert!((max.z - min.z - 150.0).abs() < 1e-3);
        assert_eq!(entity.transform.rotation, snowfall_math::Quat::IDENTITY);
    }

    #[test]
    fn test_json_geometry_comes_from_cache() {
        let mut cache = AssetCache::new();
        let handle = cache.insert("models/tri.json", MeshData::cuboid(1.0, 1.0, 1.0));
        cache.set_name(&handle, "teapot");

        let builder = MeshBuilder::new(GeometryKind::Json {
            model: "teapot".to_string(),
        })
        .uniform_scale(20.0);
        assert_eq!(builder.label(), "teapot");

        let entity = builder.build(&cache).unwrap();
        assert_eq!(entity.mesh.triangle_count(), 12);
        assert_eq!(entity.transform.scale, Vec3::splat(20.0));
    }

    #[test]
    fn test_geo_rotate_leaves_cached_model_alone() {
        let mut cache = AssetCache::new();
        let handle = cache.insert("models/slab.json", MeshData::cuboid(4.0, 1.0, 1.0));
        cache.set_name(&handle, "slab");

        let entity = MeshBuilder::new(GeometryKind::Json {
            model: "slab".to_string(),
        })
        .geo_rotate([0.0, 0.0, FRAC_PI_2])
        .build(&cache)
        .unwrap();

        let (min, max) = entity.mesh.bounds().unwrap();
        assert!((max.y - min.y - 4.0).abs() < 1e-4);
        let cached = cache.get_named::<MeshData>("slab").unwrap();
        let (min, max) = cached.bounds().unwrap();
        assert!((max.x - min.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let builder = MeshBuilder::new(GeometryKind::Json {
            model: "teapot".to_string(),
        });
        assert!(matches!(builder.build(&AssetCache::new()), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_from_config() {
        let config: MeshConfig = serde_json::from_str(
            r#"{
                "name": "ball",
                "geometry": {"type": "sphere", "radius": 5},
                "position": [0, 10, 0],
                "material": {"preset": "phong_shader", "map": {"name": "uv_grid"}},
                "tags": ["decor"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.scale, [1.0, 1.0, 1.0]);

        let entity = MeshBuilder::from_config(&config).build(&AssetCache::new()).unwrap();
        assert_eq!(entity.name.as_deref(), Some("ball"));
        assert!(entity.has_tag("decor"));
        assert_eq!(entity.material.map_name(), Some("uv_grid"));
        assert!(entity.material.is_double_sided());
        // 21 x 21 vertices for the default 20 x 20 segments
        assert_eq!(entity.mesh.vertex_count(), 441);
    }
}
