//! Snowfall application library
//!
//! Configuration, input mapping, scene construction and the per-frame
//! systems used by the `snowfall` binary.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
