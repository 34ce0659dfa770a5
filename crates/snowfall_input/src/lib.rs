//! Input handling for Snowfall
//!
//! This crate provides keyboard state tracking with chord queries
//! (`"shift+up"`) and orbit-style camera controls.

mod keyboard;
mod orbit_controls;

pub use keyboard::{KeyModifiers, KeyStroke, Keyboard};
pub use orbit_controls::{OrbitCamera, OrbitControls, OrbitSettings};
