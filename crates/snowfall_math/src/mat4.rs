//! 4x4 Matrix utilities
//!
//! Matrices are stored column-major as `m[column][row]`, matching the WGSL
//! `mat4x4<f32>` memory layout so they can be uploaded directly.

use crate::{Quat, Vec3};

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

pub fn translation(t: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = t.x;
    m[3][1] = t.y;
    m[3][2] = t.z;
    m
}

pub fn scale(s: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = s.x;
    m[1][1] = s.y;
    m[2][2] = s.z;
    m
}

pub fn from_quat(q: Quat) -> Mat4 {
    q.to_mat4()
}

/// Translation * rotation * scale
pub fn compose(position: Vec3, rotation: Quat, scale_by: Vec3) -> Mat4 {
    let mut m = rotation.to_mat4();
    for (col, s) in [scale_by.x, scale_by.y, scale_by.z].into_iter().enumerate() {
        for row in 0..3 {
            m[col][row] *= s;
        }
    }
    m[3][0] = position.x;
    m[3][1] = position.y;
    m[3][2] = position.z;
    m
}

/// Right-handed perspective projection mapping depth to wgpu's 0..1 range
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far * nf, -1.0],
        [0.0, 0.0, far * near * nf, 0.0],
    ]
}

/// Right-handed look-at view matrix
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized();
    let s = f.cross(up).normalized();
    let u = s.cross(f);

    [
        [s.x, u.x, -f.x, 0.0],
        [s.y, u.y, -f.y, 0.0],
        [s.z, u.z, -f.z, 0.0],
        [-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
    ]
}

/// Transform a point (w = 1), including translation
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
        m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
    )
}

/// Transform a direction (w = 0), ignoring translation
pub fn transform_vector(m: Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
        m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
        m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
    )
}

/// Transpose a matrix
pub fn transpose(m: Mat4) -> Mat4 {
    [
        [m[0][0], m[1][0], m[2][0], m[3][0]],
        [m[0][1], m[1][1], m[2][1], m[3][1]],
        [m[0][2], m[1][2], m[2][2], m[3][2]],
        [m[0][3], m[1][3], m[2][3], m[3][3]],
    ]
}

/// Inverse-transpose of the upper 3x3, padded back to 4x4.
///
/// Falls back to identity when the upper 3x3 is singular (e.g. zero scale).
pub fn normal_matrix(m: Mat4) -> Mat4 {
    let (a, b, c) = (m[0][0], m[1][0], m[2][0]);
    let (d, e, f) = (m[0][1], m[1][1], m[2][1]);
    let (g, h, i) = (m[0][2], m[1][2], m[2][2]);

    let co00 = e * i - f * h;
    let co01 = -(d * i - f * g);
    let co02 = d * h - e * g;
    let det = a * co00 + b * co01 + c * co02;
    if det.abs() < 1e-12 {
        return IDENTITY;
    }
    let inv_det = 1.0 / det;

    // Cofactor matrix divided by det is the inverse transpose
    let co10 = -(b * i - c * h);
    let co11 = a * i - c * g;
    let co12 = -(a * h - b * g);
    let co20 = b * f - c * e;
    let co21 = -(a * f - c * d);
    let co22 = a * e - b * d;

    [
        [co00 * inv_det, co10 * inv_det, co20 * inv_det, 0.0],
        [co01 * inv_det, co11 * inv_det, co21 * inv_det, 0.0],
        [co02 * inv_det, co12 * inv_det, co22 * inv_det, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}
