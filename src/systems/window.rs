//! Window management system
//!
//! Handles window creation, fullscreen toggle, throttled title updates and
//! the message shown when the machine cannot render.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use crate::config::WindowConfig;
use super::throttle::Throttle;

/// Shown instead of the scene when no GPU backend is available
pub const UNSUPPORTED_MESSAGE: &str = "Your graphics card does not seem to support the required GPU features";

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
    title_throttle: Throttle,
    pending_title: Option<String>,
    unsupported: bool,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_transparent(true)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
            title_throttle: Throttle::default(),
            pending_title: None,
            unsupported: false,
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        log::info!("Fullscreen {}", if new_fullscreen.is_some() { "on" } else { "off" });
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Queue a status line for the title bar
    ///
    /// Title changes are throttled; the latest status always lands.
    pub fn update_title(&mut self, status: &str) {
        if self.unsupported {
            return;
        }
        self.pending_title = Some(format_title(&self.base_title, status));
        if self.title_throttle.call() {
            self.apply_title();
        }
    }

    /// Apply a deferred title once its throttle interval has passed
    pub fn poll_title(&mut self) {
        if self.title_throttle.poll() {
            self.apply_title();
        }
    }

    fn apply_title(&mut self) {
        if let Some(title) = self.pending_title.take() {
            self.window.set_title(&title);
        }
    }

    /// Replace the scene with a static message; later status updates are dropped
    pub fn show_unsupported(&mut self, detail: &str) {
        self.unsupported = true;
        self.pending_title = None;
        self.window
            .set_title(&format_title(&self.base_title, UNSUPPORTED_MESSAGE));
        log::error!("{} ({})", UNSUPPORTED_MESSAGE, detail);
    }

    pub fn is_unsupported(&self) -> bool {
        self.unsupported
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// Window title with a status suffix
pub fn format_title(base: &str, status: &str) -> String {
    if status.is_empty() {
        base.to_string()
    } else {
        format!("{} - {}", base, status)
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_formatting() {
        assert_eq!(format_title("Snowfall", "12 objects"), "Snowfall - 12 objects");
        assert_eq!(format_title("Snowfall", ""), "Snowfall");
    }

    #[test]
    fn test_unsupported_title() {
        let title = format_title("Snowfall", UNSUPPORTED_MESSAGE);
        assert!(title.starts_with("Snowfall - "));
        assert!(title.contains("graphics card"));
    }

    #[test]
    fn test_window_error_display() {
        let err = WindowError::CreationFailed("no display".to_string());
        assert_eq!(format!("{}", err), "Window creation failed: no display");
    }
}
