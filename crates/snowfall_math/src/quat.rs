//! Unit quaternion rotations

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};
use crate::mat4::Mat4;
use crate::Vec3;

/// Quaternion `w + xi + yj + zk`, kept at unit length for rotations
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity rotation
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around `axis` (normalized internally)
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Rotation from Euler angles applied in X, then Y, then Z order
    /// about the object's local axes (intrinsic XYZ).
    pub fn from_euler_xyz(x: f32, y: f32, z: f32) -> Self {
        let (s1, c1) = (x * 0.5).sin_cos();
        let (s2, c2) = (y * 0.5).sin_cos();
        let (s3, c3) = (z * 0.5).sin_cos();

        Self::new(
            s1 * c2 * c3 + c1 * s2 * s3,
            c1 * s2 * c3 - s1 * c2 * s3,
            c1 * c2 * s3 + s1 * s2 * c3,
            c1 * c2 * c3 - s1 * s2 * s3,
        )
    }

    /// Vector part
    #[inline]
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalize to unit length; a degenerate quaternion becomes identity
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            let inv = 1.0 / len;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Hamilton product: applying the result rotates by `other` first, then `self`
    pub fn mul(self, other: Self) -> Self {
        Self::new(
            self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
            self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
        )
    }

    /// Rotate a vector
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let q = self.xyz();
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    /// Advance the rotation by an angular velocity (radians/second) over `dt`
    pub fn integrate(self, angular_velocity: Vec3, dt: f32) -> Self {
        if angular_velocity.length_squared() == 0.0 {
            return self;
        }
        let omega = Self::new(angular_velocity.x, angular_velocity.y, angular_velocity.z, 0.0);
        let dq = omega.mul(self);
        let half_dt = 0.5 * dt;
        Self::new(
            self.x + dq.x * half_dt,
            self.y + dq.y * half_dt,
            self.z + dq.z * half_dt,
            self.w + dq.w * half_dt,
        )
        .normalize()
    }

    /// Rotation matrix (column-major)
    pub fn to_mat4(self) -> Mat4 {
        let Self { x, y, z, w } = self;
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, xy, xz) = (x * x2, x * y2, x * z2);
        let (yy, yz, zz) = (y * y2, y * z2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        [
            [1.0 - (yy + zz), xy + wz, xz - wy, 0.0],
            [xy - wz, 1.0 - (xx + zz), yz + wx, 0.0],
            [xz + wy, yz - wx, 1.0 - (xx + yy), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }
}

impl std::ops::Mul for Quat {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        Quat::mul(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mat4;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity_rotation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(Quat::IDENTITY.rotate(v), v));
    }

    #[test]
    fn test_axis_angle_y() {
        // 90 degrees around Y takes X to -Z
        let q = Quat::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let r = q.rotate(Vec3::X);
        assert!(vec_approx_eq(r, Vec3::new(0.0, 0.0, -1.0)), "got {:?}", r);
    }

    #[test]
    fn test_euler_x_matches_axis_angle() {
        let a = Quat::from_euler_xyz(FRAC_PI_2, 0.0, 0.0);
        let b = Quat::from_axis_angle(Vec3::X, FRAC_PI_2);
        assert!((a.dot(b).abs() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_euler_x_turns_plane_normal_down() {
        // A plane facing +Z rotated +90 degrees about X faces -Y
        let q = Quat::from_euler_xyz(FRAC_PI_2, 0.0, 0.0);
        let n = q.rotate(Vec3::Z);
        assert!(vec_approx_eq(n, Vec3::new(0.0, -1.0, 0.0)), "got {:?}", n);
    }

    #[test]
    fn test_mul_composes() {
        let q90 = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let q180 = q90 * q90;
        let r = q180.rotate(Vec3::X);
        assert!(vec_approx_eq(r, Vec3::new(-1.0, 0.0, 0.0)), "got {:?}", r);
    }

    #[test]
    fn test_to_mat4_matches_rotate() {
        let q = Quat::from_euler_xyz(0.3, -1.1, 0.7);
        let v = Vec3::new(1.0, -2.0, 0.5);
        let by_quat = q.rotate(v);
        let by_mat = mat4::transform_vector(q.to_mat4(), v);
        assert!(vec_approx_eq(by_quat, by_mat));
    }

    #[test]
    fn test_integrate_full_turn() {
        // Spin at PI rad/s around Y for one second in small steps
        let mut q = Quat::IDENTITY;
        for _ in 0..1000 {
            q = q.integrate(Vec3::new(0.0, PI, 0.0), 0.001);
        }
        let r = q.rotate(Vec3::X);
        assert!(vec_approx_eq(r, Vec3::new(-1.0, 0.0, 0.0)), "got {:?}", r);
        assert!((q.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_integrate_zero_is_noop() {
        let q = Quat::from_axis_angle(Vec3::X, 0.4);
        assert_eq!(q.integrate(Vec3::ZERO, 1.0), q);
    }

    #[test]
    fn test_normalize_degenerate() {
        assert_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).normalize(), Quat::IDENTITY);
    }
}
