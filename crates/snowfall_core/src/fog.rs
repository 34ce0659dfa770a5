//! Exponential-squared distance fog

use serde::{Deserialize, Serialize};
use snowfall_math::color::hex_to_rgb;

/// Fog whose density grows with the square of view distance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogExp2 {
    pub color: [f32; 3],
    pub density: f32,
}

impl FogExp2 {
    pub fn new(hex: u32, density: f32) -> Self {
        Self {
            color: hex_to_rgb(hex),
            density: density.max(0.0),
        }
    }

    /// Blend weight toward the fog colour at a view distance (0 = clear)
    pub fn factor(&self, distance: f32) -> f32 {
        let d = self.density * distance;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSettings {
    pub enabled: bool,
    pub color: u32,
    pub density: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: 0x444444,
            density: 0.0008,
        }
    }
}

impl FogSettings {
    /// The configured fog, or `None` when disabled
    pub fn to_fog(&self) -> Option<FogExp2> {
        self.enabled.then(|| FogExp2::new(self.color, self.density))
    }
}
