//! 3D Mathematics Library
//!
//! This crate provides the small linear-algebra toolkit used by the Snowfall demo.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - unit quaternion rotation
//! - [`Mat4`] - 4x4 column-major matrix for transformations
//!
//! ## Utilities
//!
//! - [`color`] - hex colour conversion
//! - [`SeededRandom`] - deterministic xorshift random numbers

mod vec3;
mod quat;
pub mod mat4;
pub mod color;
mod random;

pub use vec3::Vec3;
pub use quat::Quat;
pub use mat4::Mat4;
pub use random::SeededRandom;
