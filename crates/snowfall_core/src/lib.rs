//! Core types for the Snowfall scene
//!
//! This crate provides everything the demo needs above raw math and physics:
//!
//! - [`Transform`] - Position, rotation, and scale
//! - [`MeshData`] and [`GeometryKind`] - Indexed triangle meshes and their builders
//! - [`Material`] - Basic, Lambert and Phong surfaces with an optional texture map
//! - [`LightRig`] and [`FogExp2`] - Scene lighting and fog
//! - [`Entity`] and [`World`] - Renderable objects, optionally backed by physics bodies
//! - [`AssetCache`] and [`AssetLoader`] - Startup asset loading (JSON models, textures)
//! - [`MeshBuilder`] - Fluent mesh placement
//! - [`Terrain`], [`SnowField`], [`ObjectSpawner`] - The demo's procedural content
//! - [`TweenSet`] - Eased camera animation

mod transform;
mod geometry;
mod material;
mod light;
mod fog;
mod entity;
mod world;
mod terrain;
mod snow;
mod spawner;
mod tween;
mod mesh_builder;
pub mod asset_cache;
pub mod asset_error;
pub mod loader;
pub mod model;
pub mod texture;

pub use transform::Transform;
pub use geometry::{GeometryKind, MeshData};
pub use material::{Material, MaterialConfig, MaterialKind, MaterialPreset, Side, TextureSlot};
pub use light::{
    AmbientLightSettings, DirectionalLightSettings, HemisphereLightSettings, Light, LightKind, LightRig,
    LightSettings, PointLightSettings, UnknownLightKind,
};
pub use fog::{FogExp2, FogSettings};
pub use entity::{DirtyFlags, Entity};
pub use world::{EntityKey, World};
pub use terrain::{generate_height, Terrain, TerrainConfig};
pub use snow::{animated_position, SnowField, SnowParameters, SnowSettings};
pub use spawner::{ObjectSpawner, SpawnerSettings};
pub use tween::{EaseFunction, Tween, TweenSample, TweenSet, TweenSettings, TweenTarget};
pub use mesh_builder::{MeshBuilder, MeshConfig};
pub use asset_cache::{Asset, AssetCache, AssetHandle, AssetId};
pub use asset_error::AssetError;
pub use loader::{AssetLoader, AssetManifest, LoadFailure, LoadReport};
pub use model::JsonModel;
pub use texture::TextureData;

// Re-export commonly used types from snowfall_math for convenience
pub use snowfall_math::{mat4, Mat4, Quat, SeededRandom, Vec3};

// Re-export physics types for convenient access through snowfall_core
pub use snowfall_physics::{BodyKey, Heightfield, HeightfieldError, PhysicsConfig, PhysicsMaterial, PhysicsWorld, RigidBody, StaticCollider};
