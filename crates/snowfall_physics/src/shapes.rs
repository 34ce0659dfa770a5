//! Collision shape primitives
//!
//! Dynamic bodies are spheres. Static geometry is made of planes and
//! heightfields (the terrain).

use std::fmt;
use std::sync::Arc;

use snowfall_math::Vec3;

/// A sphere defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside the sphere
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// An infinite plane defined by normal and distance from origin
///
/// The plane equation is: normal · point = distance
/// Points with normal · point > distance are "above" the plane (positive side)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal vector pointing to the positive side
    pub normal: Vec3,
    /// Signed distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from a normal and distance
    ///
    /// The normal will be normalized automatically.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalized(),
            distance,
        }
    }

    /// Create a plane from a point on the plane and a normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalized();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    /// Create a horizontal floor plane at the given Y height
    pub fn floor(y: f32) -> Self {
        Self::from_point_normal(Vec3::new(0.0, y, 0.0), Vec3::Y)
    }

    /// Positive above the plane, negative below
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// Invalid heightfield dimensions or sample data
#[derive(Debug, Clone, PartialEq)]
pub enum HeightfieldError {
    /// Fewer than two samples along an axis
    TooFewSamples { width: usize, depth: usize },
    /// Sample count does not match `width * depth`
    SampleCountMismatch { expected: usize, actual: usize },
    /// Extents must be positive
    InvalidExtents,
}

impl fmt::Display for HeightfieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightfieldError::TooFewSamples { width, depth } => {
                write!(f, "heightfield needs at least 2x2 samples, got {}x{}", width, depth)
            }
            HeightfieldError::SampleCountMismatch { expected, actual } => {
                write!(f, "heightfield expected {} samples, got {}", expected, actual)
            }
            HeightfieldError::InvalidExtents => write!(f, "heightfield extents must be positive"),
        }
    }
}

impl std::error::Error for HeightfieldError {}

/// A regular grid of height samples centred on the origin in XZ.
///
/// Sample `(i, j)` is stored at `heights[j * width + i]` and sits at
/// `x = -W/2 + i * W/(width-1)`, `z = -D/2 + j * D/(depth-1)`.
/// Each cell is split into two triangles along the diagonal from
/// `(i, j+1)` to `(i+1, j)`, the same split the terrain mesh uses.
#[derive(Clone, Debug)]
pub struct Heightfield {
    width: usize,
    depth: usize,
    heights: Vec<f32>,
    width_extents: f32,
    depth_extents: f32,
    min_height: f32,
    max_height: f32,
    /// Extra contact distance around the surface
    pub margin: f32,
}

impl Heightfield {
    pub fn new(
        width: usize,
        depth: usize,
        heights: Vec<f32>,
        width_extents: f32,
        depth_extents: f32,
    ) -> Result<Self, HeightfieldError> {
        if width < 2 || depth < 2 {
            return Err(HeightfieldError::TooFewSamples { width, depth });
        }
        if heights.len() != width * depth {
            return Err(HeightfieldError::SampleCountMismatch {
                expected: width * depth,
                actual: heights.len(),
            });
        }
        if !(width_extents > 0.0 && depth_extents > 0.0) {
            return Err(HeightfieldError::InvalidExtents);
        }

        let min_height = heights.iter().copied().fold(f32::INFINITY, f32::min);
        let max_height = heights.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        Ok(Self {
            width,
            depth,
            heights,
            width_extents,
            depth_extents,
            min_height,
            max_height,
            margin: 0.0,
        })
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Distance between samples along X and Z
    pub fn spacing(&self) -> (f32, f32) {
        (
            self.width_extents / (self.width - 1) as f32,
            self.depth_extents / (self.depth - 1) as f32,
        )
    }

    pub fn sample(&self, i: usize, j: usize) -> f32 {
        self.heights[j * self.width + i]
    }

    /// World-space position of sample `(i, j)`
    pub fn vertex(&self, i: usize, j: usize) -> Vec3 {
        let (dx, dz) = self.spacing();
        Vec3::new(
            -self.width_extents / 2.0 + i as f32 * dx,
            self.sample(i, j),
            -self.depth_extents / 2.0 + j as f32 * dz,
        )
    }

    /// Cell containing `(x, z)` and the fractional position inside it
    fn locate(&self, x: f32, z: f32) -> Option<(usize, usize, f32, f32)> {
        let (dx, dz) = self.spacing();
        let gx = (x + self.width_extents / 2.0) / dx;
        let gz = (z + self.depth_extents / 2.0) / dz;
        let max_x = (self.width - 1) as f32;
        let max_z = (self.depth - 1) as f32;
        if !(0.0..=max_x).contains(&gx) || !(0.0..=max_z).contains(&gz) {
            return None;
        }
        let i = (gx.floor() as usize).min(self.width - 2);
        let j = (gz.floor() as usize).min(self.depth - 2);
        Some((i, j, gx - i as f32, gz - j as f32))
    }

    /// Surface height at `(x, z)`, or `None` outside the grid
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let (i, j, fx, fz) = self.locate(x, z)?;
        let h00 = self.sample(i, j);
        let h10 = self.sample(i + 1, j);
        let h01 = self.sample(i, j + 1);
        let h11 = self.sample(i + 1, j + 1);

        if fx + fz <= 1.0 {
            Some(h00 + fx * (h10 - h00) + fz * (h01 - h00))
        } else {
            Some(h11 + (1.0 - fx) * (h01 - h11) + (1.0 - fz) * (h10 - h11))
        }
    }

    /// Upward unit normal of the triangle under `(x, z)`
    pub fn normal_at(&self, x: f32, z: f32) -> Option<Vec3> {
        let (i, j, fx, fz) = self.locate(x, z)?;
        let [first, second] = self.cell_triangles(i, j);
        let [a, b, c] = if fx + fz <= 1.0 { first } else { second };
        Some((b - a).cross(c - a).normalized())
    }

    /// The two triangles of cell `(i, j)`, wound so their normals face +Y
    pub fn cell_triangles(&self, i: usize, j: usize) -> [[Vec3; 3]; 2] {
        let a = self.vertex(i, j);
        let b = self.vertex(i, j + 1);
        let c = self.vertex(i + 1, j + 1);
        let d = self.vertex(i + 1, j);
        [[a, b, d], [b, c, d]]
    }

    /// Inclusive cell index ranges overlapping an XZ rectangle
    pub fn cells_overlapping(
        &self,
        min_x: f32,
        min_z: f32,
        max_x: f32,
        max_z: f32,
    ) -> Option<(std::ops::RangeInclusive<usize>, std::ops::RangeInclusive<usize>)> {
        let (dx, dz) = self.spacing();
        let half_w = self.width_extents / 2.0;
        let half_d = self.depth_extents / 2.0;
        if max_x < -half_w || min_x > half_w || max_z < -half_d || min_z > half_d {
            return None;
        }
        let cell = |v: f32, half: f32, step: f32, cells: usize| -> usize {
            (((v + half) / step).floor().max(0.0) as usize).min(cells - 1)
        };
        let i0 = cell(min_x, half_w, dx, self.width - 1);
        let i1 = cell(max_x, half_w, dx, self.width - 1);
        let j0 = cell(min_z, half_d, dz, self.depth - 1);
        let j1 = cell(max_z, half_d, dz, self.depth - 1);
        Some((i0..=i1, j0..=j1))
    }
}

/// Shapes usable as static colliders
#[derive(Clone, Debug)]
pub enum Collider {
    Sphere(Sphere),
    Plane(Plane),
    Heightfield(Arc<Heightfield>),
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn ramp() -> Heightfield {
        // 3x2 samples over 2x1 units; height rises with z
        Heightfield::new(3, 2, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0], 2.0, 1.0).unwrap()
    }

    #[test]
    fn test_sphere_contains() {
        let s = Sphere::new(Vec3::ZERO, 1.0);
        assert!(s.contains(Vec3::new(0.5, 0.5, 0.0)));
        assert!(!s.contains(Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_plane_floor_signed_distance() {
        let floor = Plane::floor(-2.0);
        assert_eq!(floor.normal, Vec3::Y);
        assert_eq!(floor.signed_distance(Vec3::new(3.0, 1.0, 7.0)), 3.0);
        assert_eq!(floor.signed_distance(Vec3::new(0.0, -5.0, 0.0)), -3.0);
    }

    #[test]
    fn test_plane_normalizes() {
        let p = Plane::new(Vec3::new(0.0, 10.0, 0.0), 1.0);
        assert_eq!(p.normal, Vec3::Y);
    }

    #[test]
    fn test_heightfield_rejects_bad_dimensions() {
        assert_eq!(
            Heightfield::new(1, 4, vec![0.0; 4], 1.0, 1.0).unwrap_err(),
            HeightfieldError::TooFewSamples { width: 1, depth: 4 }
        );
        assert_eq!(
            Heightfield::new(2, 2, vec![0.0; 3], 1.0, 1.0).unwrap_err(),
            HeightfieldError::SampleCountMismatch { expected: 4, actual: 3 }
        );
        assert_eq!(
            Heightfield::new(2, 2, vec![0.0; 4], 0.0, 1.0).unwrap_err(),
            HeightfieldError::InvalidExtents
        );
    }

    #[test]
    fn test_heightfield_bounds() {
        let hf = Heightfield::new(2, 2, vec![-2.0, 3.0, 8.0, 0.5], 1.0, 1.0).unwrap();
        assert_eq!(hf.min_height(), -2.0);
        assert_eq!(hf.max_height(), 8.0);
    }

    #[test]
    fn test_heightfield_vertex_layout() {
        let hf = ramp();
        assert_eq!(hf.vertex(0, 0), Vec3::new(-1.0, 0.0, -0.5));
        assert_eq!(hf.vertex(2, 1), Vec3::new(1.0, 1.0, 0.5));
        assert_eq!(hf.spacing(), (1.0, 1.0));
    }

    #[test]
    fn test_height_at_samples_and_between() {
        let hf = ramp();
        assert!((hf.height_at(-1.0, -0.5).unwrap() - 0.0).abs() < EPSILON);
        assert!((hf.height_at(1.0, 0.5).unwrap() - 1.0).abs() < EPSILON);
        // Halfway along z the ramp is halfway up, on both triangles
        assert!((hf.height_at(-0.9, 0.0).unwrap() - 0.5).abs() < EPSILON);
        assert!((hf.height_at(-0.1, 0.0).unwrap() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_height_at_outside_is_none() {
        let hf = ramp();
        assert!(hf.height_at(1.5, 0.0).is_none());
        assert!(hf.height_at(0.0, -0.6).is_none());
    }

    #[test]
    fn test_normal_points_up_and_against_slope() {
        let hf = ramp();
        let n = hf.normal_at(0.2, 0.1).unwrap();
        assert!(n.y > 0.0);
        // Height grows with z, so the normal leans toward -z
        assert!(n.z < 0.0);
        assert!((n.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_flat_cell_triangles_face_up() {
        let hf = Heightfield::new(2, 2, vec![1.0; 4], 4.0, 4.0).unwrap();
        for [a, b, c] in hf.cell_triangles(0, 0) {
            let n = (b - a).cross(c - a).normalized();
            assert!((n.y - 1.0).abs() < EPSILON, "normal {:?}", n);
        }
    }

    #[test]
    fn test_cells_overlapping_clamps() {
        let hf = Heightfield::new(5, 5, vec![0.0; 25], 4.0, 4.0).unwrap();
        let (is, js) = hf.cells_overlapping(-10.0, -0.5, -1.5, 0.5).unwrap();
        assert_eq!(is, 0..=0);
        assert_eq!(js, 1..=2);
        assert!(hf.cells_overlapping(5.0, 5.0, 6.0, 6.0).is_none());
    }
}
