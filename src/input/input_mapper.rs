//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to high-level actions like Exit, ResetCamera, etc.
//! Camera keys (arrows, shift) are NOT mapped here - they go to the Keyboard
//! state that the simulation reads each frame.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by special keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Tween the camera back to its starting position (R key)
    ResetCamera,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Pause or resume physics and spawning (P key)
    TogglePause,
    /// Toggle orbit auto-rotation (G key)
    ToggleAutoRotate,
}

/// Maps raw input events to semantic actions
///
/// Everything that is not an action still flows to the Keyboard state.
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for special keys, `None` for everything else
    pub fn map_keyboard(key: KeyCode, state: ElementState, repeat: bool) -> Option<InputAction> {
        // Only handle fresh key presses, not releases or auto-repeat
        if state != ElementState::Pressed || repeat {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::KeyP => Some(InputAction::TogglePause),
            KeyCode::KeyG => Some(InputAction::ToggleAutoRotate),
            _ => None,
        }
    }
}
