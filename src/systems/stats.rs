//! Frame timing statistics
//!
//! Averages frame times over a fixed window and reports once per window,
//! in place of an on-screen stats panel.

/// Summary of one reporting window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub frames: u32,
    pub fps: f32,
    pub average_ms: f32,
    pub max_ms: f32,
}

/// Accumulates frame times and reports every `window` seconds
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: f32,
    elapsed: f32,
    frames: u32,
    total: f32,
    max: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl FrameStats {
    pub fn new(window: f32) -> Self {
        Self {
            window: window.max(f32::EPSILON),
            elapsed: 0.0,
            frames: 0,
            total: 0.0,
            max: 0.0,
        }
    }

    /// Record one frame of `dt` seconds; returns a summary when the window is full
    pub fn record(&mut self, dt: f32) -> Option<FrameSummary> {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.frames += 1;
        self.total += dt;
        self.max = self.max.max(dt);

        if self.elapsed < self.window {
            return None;
        }

        let summary = FrameSummary {
            frames: self.frames,
            fps: self.frames as f32 / self.elapsed,
            average_ms: self.total / self.frames as f32 * 1000.0,
            max_ms: self.max * 1000.0,
        };
        log::debug!(
            "{:.1} fps, frame {:.2} ms avg / {:.2} ms max",
            summary.fps,
            summary.average_ms,
            summary.max_ms
        );

        self.elapsed = 0.0;
        self.frames = 0;
        self.total = 0.0;
        self.max = 0.0;
        Some(summary)
    }
}
