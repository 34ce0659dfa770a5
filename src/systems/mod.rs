//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod render;
mod simulation;
mod stats;
mod throttle;
mod window;

pub use render::RenderSystem;
pub use simulation::{SimulationResult, SimulationSystem};
pub use stats::{FrameStats, FrameSummary};
pub use throttle::{Throttle, DEFAULT_THROTTLE};
pub use window::{format_title, WindowError, WindowSystem, UNSUPPORTED_MESSAGE};
