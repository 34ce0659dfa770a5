//! JSON model loading
//!
//! Reads the three.js JSON model format, version 3: flat `vertices`,
//! `normals` and `uvs` arrays plus a `faces` stream where every face starts
//! with a type bitmask describing which optional indices follow.

use std::path::Path;

use serde::Deserialize;
use snowfall_math::Vec3;

use crate::asset_cache::Asset;
use crate::asset_error::AssetError;
use crate::geometry::MeshData;

const FACE_QUAD: u32 = 1 << 0;
const FACE_MATERIAL: u32 = 1 << 1;
const FACE_UV: u32 = 1 << 2;
const FACE_VERTEX_UV: u32 = 1 << 3;
const FACE_NORMAL: u32 = 1 << 4;
const FACE_VERTEX_NORMAL: u32 = 1 << 5;
const FACE_COLOR: u32 = 1 << 6;
const FACE_VERTEX_COLOR: u32 = 1 << 7;

/// Raw model file contents
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JsonModel {
    /// Vertex positions are divided by this
    #[serde(default)]
    pub scale: Option<f32>,
    pub vertices: Vec<f32>,
    #[serde(default)]
    pub normals: Vec<f32>,
    /// One flat array per UV layer
    #[serde(default)]
    pub uvs: Vec<Vec<f32>>,
    pub faces: Vec<u32>,
}

/// Cursor over the face stream
struct FaceReader<'a> {
    data: &'a [u32],
    offset: usize,
}

impl FaceReader<'_> {
    fn next(&mut self) -> Result<u32, AssetError> {
        let value = self
            .data
            .get(self.offset)
            .copied()
            .ok_or_else(|| AssetError::Parse(format!("face data truncated at offset {}", self.offset)))?;
        self.offset += 1;
        Ok(value)
    }

    fn take(&mut self, n: usize) -> Result<Vec<u32>, AssetError> {
        (0..n).map(|_| self.next()).collect()
    }

    fn skip(&mut self, n: usize) -> Result<(), AssetError> {
        self.take(n).map(|_| ())
    }

    fn done(&self) -> bool {
        self.offset >= self.data.len()
    }
}

fn vec3_at(data: &[f32], index: u32, what: &str) -> Result<Vec3, AssetError> {
    let i = index as usize * 3;
    match data.get(i..i + 3) {
        Some(v) => Ok(Vec3::new(v[0], v[1], v[2])),
        None => Err(AssetError::Parse(format!("{} index {} out of range", what, index))),
    }
}

fn uv_at(layer: &[f32], index: u32) -> Result<[f32; 2], AssetError> {
    let i = index as usize * 2;
    match layer.get(i..i + 2) {
        Some(v) => Ok([v[0], v[1]]),
        None => Err(AssetError::Parse(format!("uv index {} out of range", index))),
    }
}

impl JsonModel {
    pub fn parse(text: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Expand faces into a triangle mesh.
    ///
    /// Quads `(a, b, c, d)` split into `(a, b, d)` and `(b, c, d)`. Each face
    /// corner becomes its own vertex so per-face normals and UVs survive.
    /// Faces without normals get flat normals.
    pub fn to_mesh(&self) -> Result<MeshData, AssetError> {
        let inv_scale = match self.scale {
            Some(s) if s != 0.0 => 1.0 / s,
            _ => 1.0,
        };
        let uv_layers = self.uvs.iter().filter(|layer| !layer.is_empty()).count();
        let first_uvs = self.uvs.first().map(Vec::as_slice).unwrap_or(&[]);

        let mut mesh = MeshData::default();
        let mut reader = FaceReader { data: &self.faces, offset: 0 };

        while !reader.done() {
            let kind = reader.next()?;
            let corners = if kind & FACE_QUAD != 0 { 4 } else { 3 };
            let verts = reader.take(corners)?;

            if kind & FACE_MATERIAL != 0 {
                reader.skip(1)?;
            }
            if kind & FACE_UV != 0 {
                reader.skip(uv_layers)?;
            }
            let mut corner_uvs = None;
            if kind & FACE_VERTEX_UV != 0 {
                for layer in 0..uv_layers {
                    let idx = reader.take(corners)?;
                    if layer == 0 {
                        corner_uvs = Some(idx);
                    }
                }
            }
            let mut face_normal = None;
            if kind & FACE_NORMAL != 0 {
                face_normal = Some(reader.next()?);
            }
            let mut corner_normals = None;
            if kind & FACE_VERTEX_NORMAL != 0 {
                corner_normals = Some(reader.take(corners)?);
            }
            if kind & FACE_COLOR != 0 {
                reader.skip(1)?;
            }
            if kind & FACE_VERTEX_COLOR != 0 {
                reader.skip(corners)?;
            }

            let triangles: &[[usize; 3]] = if corners == 4 { &[[0, 1, 3], [1, 2, 3]] } else { &[[0, 1, 2]] };
            for tri in triangles {
                let mut positions = [Vec3::ZERO; 3];
                for (p, &c) in positions.iter_mut().zip(tri) {
                    *p = vec3_at(&self.vertices, verts[c], "vertex")? * inv_scale;
                }
                let flat = (positions[1] - positions[0]).cross(positions[2] - positions[0]).normalized();

                for (&c, position) in tri.iter().zip(positions) {
                    let normal = match (&corner_normals, face_normal) {
                        (Some(n), _) => vec3_at(&self.normals, n[c], "normal")?.normalized(),
                        (None, Some(n)) => vec3_at(&self.normals, n, "normal")?.normalized(),
                        (None, None) => flat,
                    };
                    let uv = match &corner_uvs {
                        Some(idx) => uv_at(first_uvs, idx[c])?,
                        None => [0.0, 0.0],
                    };

                    mesh.indices.push(mesh.positions.len() as u32);
                    mesh.positions.push(position);
                    mesh.normals.push(normal);
                    mesh.uvs.push(uv);
                }
            }
        }

        Ok(mesh)
    }
}

impl Asset for MeshData {
    fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        let text = std::fs::read_to_string(path)?;
        JsonModel::parse(&text)?.to_mesh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_MODEL: &str = r#"{
        "metadata": { "formatVersion": 3 },
        "scale": 2.0,
        "vertices": [0,0,0, 2,0,0, 2,2,0, 0,2,0],
        "normals": [0,0,1],
        "uvs": [[0,0, 1,0, 1,1, 0,1]],
        "faces": [41, 0,1,2,3, 0,1,2,3, 0,0,0,0]
    }"#;

    #[test]
    fn test_quad_with_uvs_and_vertex_normals() {
        // 41 = quad | vertex uvs | vertex normals
        let mesh = JsonModel::parse(QUAD_MODEL).unwrap().to_mesh().unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);

        // Scale 2 halves every coordinate
        assert_eq!(mesh.positions[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.positions[2], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(mesh.uvs[2], [0.0, 1.0]);
        assert!(mesh.normals.iter().all(|n| *n == Vec3::Z));
    }

    #[test]
    fn test_triangle_without_normals_gets_flat_normal() {
        let model = JsonModel::parse(r#"{"vertices":[0,0,0, 1,0,0, 0,0,-1],"faces":[0, 0,1,2]}"#).unwrap();
        let mesh = model.to_mesh().unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        for n in &mesh.normals {
            assert!((n.y - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_optional_indices_are_skipped() {
        // 2 | 16 | 64 = material, face normal, face colour
        let model = JsonModel::parse(
            r#"{"vertices":[0,0,0, 1,0,0, 0,1,0],"normals":[0,0,1],"faces":[82, 0,1,2, 5, 0, 9, 0, 2,1,0]}"#,
        )
        .unwrap();
        let mesh = model.to_mesh().unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.normals[0], Vec3::Z);
        // The second face has no normals and gets its flat normal
        assert_eq!(mesh.positions[3], Vec3::new(0.0, 1.0, 0.0));
        assert!((mesh.normals[3].z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_truncated_faces_error() {
        let model = JsonModel::parse(r#"{"vertices":[0,0,0],"faces":[1, 0,0]}"#).unwrap();
        assert!(matches!(model.to_mesh(), Err(AssetError::Parse(ref m)) if m.contains("truncated")));
    }

    #[test]
    fn test_vertex_index_out_of_range() {
        let model = JsonModel::parse(r#"{"vertices":[0,0,0],"faces":[0, 0,0,7]}"#).unwrap();
        assert!(matches!(model.to_mesh(), Err(AssetError::Parse(ref m)) if m.contains("vertex index 7")));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(JsonModel::parse("{ not json"), Err(AssetError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join("snowfall_model_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quad.json");
        std::fs::write(&path, QUAD_MODEL).unwrap();

        let mesh = MeshData::load_from_file(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);

        let _ = std::fs::remove_file(&path);
    }
}
