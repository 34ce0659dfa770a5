//! Eased interpolation of camera vectors over time

use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};
use snowfall_math::Vec3;

/// Standard easing curves.
///
/// Each variant maps `t` in \[0, 1\] to an eased value in roughly \[0, 1\].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseFunction {
    Linear,
    QuadIn,
    QuadOut,
    #[default]
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    SineInOut,
}

impl EaseFunction {
    /// Evaluate the easing function at `t` (clamped to \[0, 1\]).
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::SineIn => 1.0 - (t * FRAC_PI_2).cos(),
            Self::SineOut => (t * FRAC_PI_2).sin(),
            Self::SineInOut => -(PI * t).cos() / 2.0 + 0.5,
        }
    }
}

/// What a [`Tween`] drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenTarget {
    CameraPosition,
    CameraTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenSettings {
    pub easing: EaseFunction,
    pub duration_ms: u32,
}

impl Default for TweenSettings {
    fn default() -> Self {
        Self {
            easing: EaseFunction::QuadInOut,
            duration_ms: 500,
        }
    }
}

impl TweenSettings {
    pub fn duration_secs(&self) -> f32 {
        self.duration_ms as f32 / 1000.0
    }
}

/// Interpolates a vector from `start` to `end` with easing
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    pub start: Vec3,
    pub end: Vec3,
    pub ease: EaseFunction,
    pub duration: f32,
    pub elapsed: f32,
}

impl Tween {
    pub fn new(target: TweenTarget, start: Vec3, end: Vec3, ease: EaseFunction, duration: f32) -> Self {
        Self {
            target,
            start,
            end,
            ease,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current interpolated value
    pub fn value(&self) -> Vec3 {
        let raw = if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.start.lerp(self.end, self.ease.sample(raw))
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration.max(0.0));
    }
}

/// Value of a tween after an update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSample {
    pub target: TweenTarget,
    pub value: Vec3,
    pub finished: bool,
}

/// Running tweens; at most one per target
#[derive(Debug, Clone, Default)]
pub struct TweenSet {
    tweens: Vec<Tween>,
}

impl TweenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween, replacing any running tween on the same target
    pub fn add(&mut self, tween: Tween) {
        self.tweens.retain(|t| t.target != tween.target);
        self.tweens.push(tween);
    }

    /// Advance every tween and sample it. Finished tweens report their end
    /// value once and are then removed.
    pub fn update(&mut self, dt: f32) -> Vec<TweenSample> {
        let mut samples = Vec::with_capacity(self.tweens.len());
        for tween in &mut self.tweens {
            tween.advance(dt);
            samples.push(TweenSample {
                target: tween.target,
                value: tween.value(),
                finished: tween.is_finished(),
            });
        }
        self.tweens.retain(|t| !t.is_finished());
        samples
    }

    pub fn is_tweening(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}
