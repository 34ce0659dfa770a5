//! wgpu renderer for the snowfall scene
//!
//! Draws lit, textured meshes and an instanced snow particle field into a
//! winit window.

pub mod camera;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod renderable;
pub mod texture;
pub mod uniforms;

pub use camera::Camera;
pub use context::{RenderContext, DEPTH_FORMAT};
pub use error::RenderError;
pub use pipeline::{MeshPipeline, MeshVariant, ObjectBinding, SnowPipeline};
pub use renderable::{mesh_vertices, GpuMesh, SceneObjects, TextureStore};
pub use texture::GpuTexture;
pub use uniforms::{frame_uniforms, object_uniforms, snow_uniforms};
