//! Triangle mesh data and primitive builders
//!
//! The builders produce the same vertex order, winding and UV layout as the
//! three.js primitives the scene was designed around, so height data written
//! per vertex index lines up with the terrain grid.

use std::collections::HashSet;
use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use snowfall_math::{Quat, Vec3};

/// CPU-side indexed triangle mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, counter-clockwise front faces
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Plane in XY facing +Z, centred on the origin
    ///
    /// Vertex rows run from +Y down to -Y and columns from -X to +X.
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let grid_x = width_segments.max(1);
        let grid_y = height_segments.max(1);
        let grid_x1 = grid_x + 1;
        let segment_w = width / grid_x as f32;
        let segment_h = height / grid_y as f32;

        let mut mesh = Self::default();
        for iy in 0..=grid_y {
            let y = iy as f32 * segment_h - height / 2.0;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_w - width / 2.0;
                mesh.positions.push(Vec3::new(x, -y, 0.0));
                mesh.normals.push(Vec3::Z);
                mesh.uvs.push([ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32]);
            }
        }

        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + grid_x1 * iy;
                let b = ix + grid_x1 * (iy + 1);
                let c = (ix + 1) + grid_x1 * (iy + 1);
                let d = (ix + 1) + grid_x1 * iy;
                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        mesh
    }

    /// UV sphere with poles on the Y axis
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);

        let mut mesh = Self::default();
        let mut grid = Vec::with_capacity(hs as usize + 1);
        let mut index = 0u32;

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            // Pole vertices take the UV centre of their triangle fan
            let u_offset = if iy == 0 {
                0.5 / ws as f32
            } else if iy == hs {
                -0.5 / ws as f32
            } else {
                0.0
            };

            let mut row = Vec::with_capacity(ws as usize + 1);
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let p = Vec3::new(
                    -radius * (u * 2.0 * PI).cos() * (v * PI).sin(),
                    radius * (v * PI).cos(),
                    radius * (u * 2.0 * PI).sin() * (v * PI).sin(),
                );
                mesh.positions.push(p);
                mesh.normals.push(p.normalized());
                mesh.uvs.push([u + u_offset, 1.0 - v]);
                row.push(index);
                index += 1;
            }
            grid.push(row);
        }

        for iy in 0..hs as usize {
            for ix in 0..ws as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs as usize - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        mesh
    }

    /// Axis-aligned box centred on the origin, four vertices per face
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vec3::new(width / 2.0, height / 2.0, depth / 2.0);
        // (normal, u axis, v axis) with u x v == normal
        let faces = [
            (Vec3::X, -Vec3::Z, Vec3::Y),
            (-Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, -Vec3::Z),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, -Vec3::X, Vec3::Y),
        ];

        let mut mesh = Self::default();
        for (normal, u, v) in faces {
            let base = mesh.positions.len() as u32;
            let center = normal.component_mul(half);
            let du = u.component_mul(half);
            let dv = v.component_mul(half);
            for (su, sv, uv) in [(-1.0, -1.0, [0.0, 0.0]), (1.0, -1.0, [1.0, 0.0]), (1.0, 1.0, [1.0, 1.0]), (-1.0, 1.0, [0.0, 1.0])] {
                mesh.positions.push(center + du * su + dv * sv);
                mesh.normals.push(normal);
                mesh.uvs.push(uv);
            }
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Rotate positions and normals by a quaternion
    pub fn rotate(&mut self, rotation: Quat) -> &mut Self {
        for p in &mut self.positions {
            *p = rotation.rotate(*p);
        }
        for n in &mut self.normals {
            *n = rotation.rotate(*n);
        }
        self
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotate(Quat::from_axis_angle(Vec3::X, angle))
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotate(Quat::from_axis_angle(Vec3::Y, angle))
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotate(Quat::from_axis_angle(Vec3::Z, angle))
    }

    /// Rotate about X, then Y, then Z, each about the fixed world axis
    pub fn rotate_euler(&mut self, angles: [f32; 3]) -> &mut Self {
        if angles[0] != 0.0 {
            self.rotate_x(angles[0]);
        }
        if angles[1] != 0.0 {
            self.rotate_y(angles[1]);
        }
        if angles[2] != 0.0 {
            self.rotate_z(angles[2]);
        }
        self
    }

    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        for p in &mut self.positions {
            *p += offset;
        }
        self
    }

    /// Scale positions per axis; normals are recomputed from the new shape
    pub fn scale(&mut self, factor: Vec3) -> &mut Self {
        for p in &mut self.positions {
            *p = p.component_mul(factor);
        }
        self.compute_vertex_normals()
    }

    /// Area-weighted smooth normals from the triangle list
    pub fn compute_vertex_normals(&mut self) -> &mut Self {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let face = (pb - pa).cross(pc - pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals.into_iter().map(Vec3::normalized).collect();
        self
    }

    /// Unique edges of the triangle list as a line list
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    lines.extend_from_slice(&[a, b]);
                }
            }
        }
        lines
    }

    /// Axis-aligned bounds as (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (lo.min_components(*p), hi.max_components(*p))
        }))
    }
}

/// Geometry description as it appears in configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryKind {
    Plane {
        width: f32,
        height: f32,
        #[serde(default = "one_segment")]
        width_segments: u32,
        #[serde(default = "one_segment")]
        height_segments: u32,
    },
    Sphere {
        radius: f32,
        #[serde(default = "sphere_segments")]
        width_segments: u32,
        #[serde(default = "sphere_segments")]
        height_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Mesh loaded from a JSON model asset, looked up by name
    Json { model: String },
}

fn one_segment() -> u32 {
    1
}

fn sphere_segments() -> u32 {
    20
}

impl GeometryKind {
    /// Build procedural geometry; model-backed geometry returns `None`
    pub fn build_primitive(&self) -> Option<MeshData> {
        match *self {
            GeometryKind::Plane { width, height, width_segments, height_segments } => {
                Some(MeshData::plane(width, height, width_segments, height_segments))
            }
            GeometryKind::Sphere { radius, width_segments, height_segments } => {
                Some(MeshData::sphere(radius, width_segments, height_segments))
            }
            GeometryKind::Box { width, height, depth } => Some(MeshData::cuboid(width, height, depth)),
            GeometryKind::Json { .. } => None,
        }
    }
}
