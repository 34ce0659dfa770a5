//! Scene lights
//!
//! Each light type has its own settings block with an `enabled` flag. A
//! [`LightRig`] places lights by name and skips any that are disabled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snowfall_math::color::hex_to_rgb;
use snowfall_math::Vec3;

/// A light in the scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    /// Uniform light from every direction
    Ambient { color: [f32; 3], intensity: f32 },
    /// Parallel rays shining from `position` toward the origin
    Directional { color: [f32; 3], intensity: f32, position: Vec3 },
    /// Omni light that fades to zero at `distance` (0 = no falloff)
    Point { color: [f32; 3], intensity: f32, position: Vec3, distance: f32 },
    /// Sky colour from above blending to ground colour from below
    Hemisphere { sky_color: [f32; 3], ground_color: [f32; 3], intensity: f32, position: Vec3 },
}

impl Light {
    pub fn kind(&self) -> LightKind {
        match self {
            Light::Ambient { .. } => LightKind::Ambient,
            Light::Directional { .. } => LightKind::Directional,
            Light::Point { .. } => LightKind::Point,
            Light::Hemisphere { .. } => LightKind::Hemisphere,
        }
    }

    pub fn intensity(&self) -> f32 {
        match *self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Hemisphere { intensity, .. } => intensity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
    Hemisphere,
}

/// A light name that matches no [`LightKind`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownLightKind(pub String);

impl fmt::Display for UnknownLightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown light kind: {}", self.0)
    }
}

impl std::error::Error for UnknownLightKind {}

impl FromStr for LightKind {
    type Err = UnknownLightKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ambient" => Ok(LightKind::Ambient),
            "directional" => Ok(LightKind::Directional),
            "point" => Ok(LightKind::Point),
            "hemi" | "hemisphere" => Ok(LightKind::Hemisphere),
            _ => Err(UnknownLightKind(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightSettings {
    pub enabled: bool,
    pub color: u32,
    pub intensity: f32,
}

impl Default for AmbientLightSettings {
    fn default() -> Self {
        Self { enabled: false, color: 0x141414, intensity: 1.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightSettings {
    pub enabled: bool,
    pub color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for DirectionalLightSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: 0xf0f0f0,
            intensity: 0.4,
            position: [-75.0, 280.0, 150.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLightSettings {
    pub enabled: bool,
    pub color: u32,
    pub intensity: f32,
    pub distance: f32,
    pub position: [f32; 3],
}

impl Default for PointLightSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            color: 0xffffff,
            intensity: 0.34,
            distance: 115.0,
            position: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HemisphereLightSettings {
    pub enabled: bool,
    pub sky_color: u32,
    pub ground_color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for HemisphereLightSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sky_color: 0xc8c8c8,
            ground_color: 0xffffff,
            intensity: 0.55,
            position: [0.0, 0.0, 0.0],
        }
    }
}

/// All light settings plus the names of the lights to place
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub placed: Vec<String>,
    pub ambient: AmbientLightSettings,
    pub directional: DirectionalLightSettings,
    pub point: PointLightSettings,
    pub hemisphere: HemisphereLightSettings,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            placed: vec!["ambient".into(), "directional".into(), "hemisphere".into()],
            ambient: AmbientLightSettings::default(),
            directional: DirectionalLightSettings::default(),
            point: PointLightSettings::default(),
            hemisphere: HemisphereLightSettings::default(),
        }
    }
}

/// The lights currently placed in the scene
#[derive(Clone, Debug, Default)]
pub struct LightRig {
    settings: LightSettings,
    lights: Vec<Light>,
}

impl LightRig {
    pub fn new(settings: LightSettings) -> Self {
        Self { settings, lights: Vec::new() }
    }

    /// Place one light of the given kind if its settings enable it
    ///
    /// Returns whether a light was added.
    pub fn place(&mut self, kind: LightKind) -> bool {
        let s = &self.settings;
        let light = match kind {
            LightKind::Ambient if s.ambient.enabled => Light::Ambient {
                color: hex_to_rgb(s.ambient.color),
                intensity: s.ambient.intensity,
            },
            LightKind::Directional if s.directional.enabled => Light::Directional {
                color: hex_to_rgb(s.directional.color),
                intensity: s.directional.intensity,
                position: Vec3::from_array(s.directional.position),
            },
            LightKind::Point if s.point.enabled => Light::Point {
                color: hex_to_rgb(s.point.color),
                intensity: s.point.intensity,
                position: Vec3::from_array(s.point.position),
                distance: s.point.distance,
            },
            LightKind::Hemisphere if s.hemisphere.enabled => Light::Hemisphere {
                sky_color: hex_to_rgb(s.hemisphere.sky_color),
                ground_color: hex_to_rgb(s.hemisphere.ground_color),
                intensity: s.hemisphere.intensity,
                position: Vec3::from_array(s.hemisphere.position),
            },
            _ => {
                log::debug!("{:?} light is disabled, not placing it", kind);
                return false;
            }
        };
        self.lights.push(light);
        true
    }

    /// Place every light named in the settings; unknown names are logged and skipped
    pub fn place_configured(&mut self) -> usize {
        let names = self.settings.placed.clone();
        let mut placed = 0;
        for name in &names {
            match name.parse::<LightKind>() {
                Ok(kind) => {
                    if self.place(kind) {
                        placed += 1;
                    }
                }
                Err(e) => log::warn!("{}", e),
            }
        }
        placed
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn settings(&self) -> &LightSettings {
        &self.settings
    }

    /// First placed light of the given kind
    pub fn find(&self, kind: LightKind) -> Option<&Light> {
        self.lights.iter().find(|light| light.kind() == kind)
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }
}
