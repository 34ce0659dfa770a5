//! GPU-compatible data types for the mesh and snow pipelines
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.
//! Every vec3 quantity is padded to a vec4 to satisfy WGSL uniform alignment.

use bytemuck::{Pod, Zeroable};
use snowfall_math::mat4;

/// Mesh vertex: position, normal, texture coordinate
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Per-frame scene uniforms (must match `Scene` in mesh.wgsl)
/// Layout: 288 bytes total
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// xyz = camera position
    pub camera_position: [f32; 4],
    /// rgb = fog colour, a = exp2 density (0 disables fog)
    pub fog: [f32; 4],
    /// rgb = ambient colour * intensity
    pub ambient: [f32; 4],
    /// rgb = sky colour * intensity
    pub hemisphere_sky: [f32; 4],
    /// rgb = ground colour * intensity
    pub hemisphere_ground: [f32; 4],
    /// xyz = unit "up" direction of the hemisphere light
    pub hemisphere_direction: [f32; 4],
    /// rgb = directional colour * intensity
    pub directional_color: [f32; 4],
    /// xyz = unit direction toward the light
    pub directional_direction: [f32; 4],
    /// rgb = point colour * intensity, a = cutoff distance (0 = none)
    pub point_color: [f32; 4],
    /// xyz = point light position
    pub point_position: [f32; 4],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view: mat4::IDENTITY,
            projection: mat4::IDENTITY,
            camera_position: [0.0; 4],
            fog: [0.0; 4],
            ambient: [0.0; 4],
            hemisphere_sky: [0.0; 4],
            hemisphere_ground: [0.0; 4],
            hemisphere_direction: [0.0, 1.0, 0.0, 0.0],
            directional_color: [0.0; 4],
            directional_direction: [0.0, 1.0, 0.0, 0.0],
            point_color: [0.0; 4],
            point_position: [0.0; 4],
        }
    }
}

/// Shading model index used by mesh.wgsl
pub const SHADING_BASIC: u32 = 0;
pub const SHADING_LAMBERT: u32 = 1;
pub const SHADING_PHONG: u32 = 2;

/// Per-object uniforms (must match `Object` in mesh.wgsl)
/// Layout: 192 bytes total
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// rgb = diffuse colour, a = opacity
    pub color: [f32; 4],
    /// rgb = emissive colour, a = shininess
    pub emissive: [f32; 4],
    /// (offset u, offset v, repeat u, repeat v)
    pub offset_repeat: [f32; 4],
    /// x = shading model, y = 1 when a texture map is bound
    pub flags: [u32; 4],
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self {
            model: mat4::IDENTITY,
            normal_matrix: mat4::IDENTITY,
            color: [1.0; 4],
            emissive: [0.0, 0.0, 0.0, 30.0],
            offset_repeat: [0.0, 0.0, 1.0, 1.0],
            flags: [SHADING_PHONG, 0, 0, 0],
        }
    }
}

/// Snow uniforms (must match `Snow` in snow.wgsl)
/// Layout: 208 bytes total
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SnowUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// xyz = field offset, w = elapsed time
    pub offset_time: [f32; 4],
    /// rgb = flake colour, a = opacity
    pub color: [f32; 4],
    /// (height, radius_x, radius_z, speed_h)
    pub motion: [f32; 4],
    /// (speed_v, size, scale, unused)
    pub sizing: [f32; 4],
    /// (width, height) of the viewport in pixels
    pub viewport: [f32; 4],
}

impl Default for SnowUniforms {
    fn default() -> Self {
        Self {
            view: mat4::IDENTITY,
            projection: mat4::IDENTITY,
            offset_time: [0.0; 4],
            color: [1.0; 4],
            motion: [100.0, 2.5, 2.5, 1.0],
            sizing: [1.0, 100.0, 4.0, 0.0],
            viewport: [1.0, 1.0, 0.0, 0.0],
        }
    }
}

/// One snowflake's base position, stepped per instance
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SnowInstance {
    pub base: [f32; 3],
}
