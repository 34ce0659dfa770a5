//! Procedural heightfield terrain
//!
//! One height array feeds both the rendered mesh and the physics collider, so
//! what you see is what the spheres roll on.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use snowfall_math::SeededRandom;
use snowfall_physics::{Heightfield, HeightfieldError, PhysicsMaterial, StaticCollider};

use crate::geometry::MeshData;
use crate::material::{Material, TextureSlot};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub enabled: bool,
    /// World size along X
    pub width_extents: f32,
    /// World size along Z
    pub depth_extents: f32,
    /// Samples along X
    pub width: usize,
    /// Samples along Z
    pub depth: usize,
    /// Nominal lower bound of the generated heights
    pub min_height: f32,
    /// Nominal upper bound of the generated heights
    pub max_height: f32,
    /// Collision margin around the surface
    pub margin: f32,
    pub color: u32,
    /// Texture asset tiled once per grid cell
    pub texture: Option<String>,
    pub material: PhysicsMaterial,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width_extents: 30.0,
            depth_extents: 128.0,
            width: 20,
            depth: 10,
            min_height: -2.0,
            max_height: 8.0,
            margin: 0.05,
            color: 0xc7c7c7,
            texture: Some("grid".to_string()),
            material: PhysicsMaterial::GROUND,
        }
    }
}

/// Height samples for a `width x depth` grid, row-major with `j` along Z.
///
/// Each row climbs by 2 units; the column term `1e-5 * i^6` curls the edges up
/// into a trough, with `i` running from `-width/2` in unit steps. A random
/// value in [0, 1) roughens every sample.
pub fn generate_height(width: usize, depth: usize, rng: &mut SeededRandom) -> Vec<f32> {
    let half = width as f32 / 2.0;
    let mut data = Vec::with_capacity(width * depth);
    for j in 0..depth {
        for k in 0..width {
            let i = k as f32 - half;
            data.push(j as f32 * 2.0 + 0.00001 * i.powi(6) + rng.next());
        }
    }
    data
}

/// Generated terrain: render mesh plus matching collider
#[derive(Clone, Debug)]
pub struct Terrain {
    pub heights: Vec<f32>,
    pub mesh: MeshData,
    pub heightfield: Heightfield,
    pub material: Material,
    physics_material: PhysicsMaterial,
}

impl Terrain {
    /// Generate heights and build the mesh and collider from them
    pub fn generate(config: &TerrainConfig, rng: &mut SeededRandom) -> Result<Self, HeightfieldError> {
        let heights = generate_height(config.width, config.depth, rng);
        Self::from_heights(config, heights)
    }

    /// Build terrain from existing height samples
    pub fn from_heights(config: &TerrainConfig, heights: Vec<f32>) -> Result<Self, HeightfieldError> {
        let heightfield = Heightfield::new(
            config.width,
            config.depth,
            heights.clone(),
            config.width_extents,
            config.depth_extents,
        )?
        .with_margin(config.margin);

        if heightfield.min_height() < config.min_height || heightfield.max_height() > config.max_height {
            log::info!(
                "Terrain heights span {:.2}..{:.2}, outside the nominal {}..{}; collider uses the data bounds",
                heightfield.min_height(),
                heightfield.max_height(),
                config.min_height,
                config.max_height
            );
        }

        let mut mesh = MeshData::plane(
            config.width_extents,
            config.depth_extents,
            config.width as u32 - 1,
            config.depth as u32 - 1,
        );
        mesh.rotate_x(-FRAC_PI_2);
        for (position, height) in mesh.positions.iter_mut().zip(&heights) {
            position.y = *height;
        }
        mesh.compute_vertex_normals();

        let mut material = Material::phong(config.color);
        if let Some(texture) = &config.texture {
            material = material.with_map(
                TextureSlot::new(texture.clone())
                    .with_repeat((config.width - 1) as f32, (config.depth - 1) as f32),
            );
        }

        Ok(Self {
            heights,
            mesh,
            heightfield,
            material,
            physics_material: config.material,
        })
    }

    /// Static collider sharing this terrain's height data
    pub fn static_collider(&self) -> StaticCollider {
        StaticCollider::heightfield(self.heightfield.clone(), self.physics_material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowfall_math::Vec3;

    #[test]
    fn test_generate_height_formula() {
        let mut rng = SeededRandom::new(7);
        let heights = generate_height(20, 10, &mut rng);
        assert_eq!(heights.len(), 200);

        // Replay the same random sequence to check every sample
        let mut replay = SeededRandom::new(7);
        for j in 0..10 {
            for k in 0..20 {
                let i = k as f32 - 10.0;
                let expected = j as f32 * 2.0 + 1e-5 * i.powi(6) + replay.next();
                assert!((heights[j * 20 + k] - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_generate_height_odd_width_is_symmetric_in_i() {
        let mut rng = SeededRandom::new(1);
        let heights = generate_height(5, 1, &mut rng);
        // i runs -2.5, -1.5, ..., 1.5 so the trough term is largest at the first column
        let trough = |i: f32| 1e-5 * i.powi(6);
        assert!(heights[0] >= trough(-2.5));
        assert!(heights[0] < trough(-2.5) + 1.0);
    }

    #[test]
    fn test_rows_climb_along_z() {
        let mut rng = SeededRandom::new(3);
        let heights = generate_height(20, 10, &mut rng);
        // Same column, next row: +2 units give or take the random term
        let step = heights[20 + 10] - heights[10];
        assert!(step > 1.0 && step < 3.0);
    }

    #[test]
    fn test_terrain_mesh_matches_collider() {
        let config = TerrainConfig::default();
        let mut rng = SeededRandom::new(42);
        let terrain = Terrain::generate(&config, &mut rng).unwrap();

        assert_eq!(terrain.mesh.vertex_count(), 200);
        assert_eq!(terrain.mesh.triangle_count(), 19 * 9 * 2);

        // Every mesh vertex lies on the collider surface
        for (idx, p) in terrain.mesh.positions.iter().enumerate() {
            let (i, j) = (idx % 20, idx / 20);
            let v = terrain.heightfield.vertex(i, j);
            assert!((p.x - v.x).abs() < 1e-3 && (p.z - v.z).abs() < 1e-3);
            assert_eq!(p.y, terrain.heights[idx]);
        }

        // Normals face up after the rotation
        assert!(terrain.mesh.normals.iter().all(|n| n.dot(Vec3::Y) > 0.0));
    }

    #[test]
    fn test_terrain_material_tiles_grid_per_cell() {
        let terrain = Terrain::generate(&TerrainConfig::default(), &mut SeededRandom::new(1)).unwrap();
        let slot = terrain.material.map.as_ref().unwrap();
        assert_eq!(slot.name, "grid");
        assert_eq!(slot.repeat, [19.0, 9.0]);
    }

    #[test]
    fn test_collider_bounds_follow_data() {
        let config = TerrainConfig::default();
        let terrain = Terrain::generate(&config, &mut SeededRandom::new(5)).unwrap();
        // The far rows climb well past the nominal maximum
        assert!(terrain.heightfield.max_height() > config.max_height);
        assert!(terrain.heightfield.height_at(0.0, 0.0).is_some());
        assert!(matches!(
            terrain.static_collider().collider,
            snowfall_physics::Collider::Heightfield(_)
        ));
    }

    #[test]
    fn test_invalid_sample_counts() {
        let config = TerrainConfig { width: 1, ..TerrainConfig::default() };
        assert!(Terrain::generate(&config, &mut SeededRandom::new(1)).is_err());

        let config = TerrainConfig::default();
        assert!(Terrain::from_heights(&config, vec![0.0; 3]).is_err());
    }
}
