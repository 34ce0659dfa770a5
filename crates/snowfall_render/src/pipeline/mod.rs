//! Render pipelines and their GPU data layouts

pub mod mesh_pipeline;
pub mod snow_pipeline;
pub mod types;

pub use mesh_pipeline::{MeshPipeline, MeshVariant, ObjectBinding};
pub use snow_pipeline::SnowPipeline;
pub use types::*;
