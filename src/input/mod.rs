//! Keyboard shortcuts
//!
//! Held keys are tracked by `snowfall_input::Keyboard`; this module only
//! turns single key presses into app-level actions.

mod input_mapper;

pub use input_mapper::{InputAction, InputMapper};
