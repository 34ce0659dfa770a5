//! Rigid-body physics for Snowfall
//!
//! This crate provides the physics the demo needs, including:
//! - Collision shapes (spheres, planes, heightfield terrain)
//! - Collision detection with contact generation
//! - Rigid body dynamics with gravity, restitution and rolling friction
//! - A fixed-timestep world with bounded sub-stepping

pub mod body;
pub mod collision;
pub mod material;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, BodyType, RigidBody, StaticCollider};
pub use collision::{closest_point_on_triangle, sphere_vs_heightfield, sphere_vs_plane, sphere_vs_sphere, Contact};
pub use material::PhysicsMaterial;
pub use shapes::{Collider, Heightfield, HeightfieldError, Plane, Sphere};
pub use world::{PhysicsConfig, PhysicsWorld};
