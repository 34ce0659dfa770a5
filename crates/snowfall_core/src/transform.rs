//! 3D Transform (position, rotation, scale)
//!
//! A Transform represents the position, rotation, and scale of an entity in the scene.

use snowfall_math::{mat4, Mat4, Quat, Vec3};
use serde::{Serialize, Deserialize};

/// A 3D transform with position, rotation, and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a unit quaternion
    pub rotation: Quat,
    /// Scale factor per axis
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform (no translation, rotation, or scale change)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform from position, XYZ Euler angles (radians) and scale
    pub fn from_euler(position: Vec3, euler: [f32; 3], scale: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::from_euler_xyz(euler[0], euler[1], euler[2]),
            scale,
        }
    }

    /// Model matrix (translation * rotation * scale)
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        mat4::compose(self.position, self.rotation, self.scale)
    }

    /// Transform a point from local space to world space
    ///
    /// Applies scale, then rotation, then translation.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.rotate(p.component_mul(self.scale)) + self.position
    }

    /// Transform a direction from local space to world space
    ///
    /// Applies scale and rotation, but not translation.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.rotation.rotate(d.component_mul(self.scale))
    }
}
