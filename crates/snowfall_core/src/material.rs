//! Surface materials
//!
//! Materials follow the classic three-tier lighting split: unlit `Basic`,
//! diffuse-only `Lambert` and specular `Phong`.

use serde::{Deserialize, Serialize};
use snowfall_math::color::hex_to_rgb;

/// Lighting model used when shading a surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Unlit flat colour
    Basic,
    /// Diffuse lighting only
    Lambert,
    /// Diffuse plus specular highlights
    #[default]
    Phong,
}

/// Which faces are drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// A texture reference with UV offset and repeat
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureSlot {
    /// Name of the texture asset
    pub name: String,
    #[serde(default = "unit_repeat")]
    pub repeat: [f32; 2],
    #[serde(default)]
    pub offset: [f32; 2],
}

fn unit_repeat() -> [f32; 2] {
    [1.0, 1.0]
}

impl TextureSlot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repeat: unit_repeat(),
            offset: [0.0, 0.0],
        }
    }

    pub fn with_repeat(mut self, u: f32, v: f32) -> Self {
        self.repeat = [u, v];
        self
    }

    pub fn with_offset(mut self, u: f32, v: f32) -> Self {
        self.offset = [u, v];
        self
    }

    /// Packed as (offset_u, offset_v, repeat_u, repeat_v)
    pub fn offset_repeat(&self) -> [f32; 4] {
        [self.offset[0], self.offset[1], self.repeat[0], self.repeat[1]]
    }
}

/// Visual properties of an entity
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// Base colour as RGB (each component 0.0-1.0)
    pub color: [f32; 3],
    /// Emissive colour added after lighting
    pub emissive: [f32; 3],
    /// Specular exponent (Phong only)
    pub shininess: f32,
    pub opacity: f32,
    /// Blend with what is behind instead of overwriting it
    pub transparent: bool,
    /// Draw triangle edges only
    pub wireframe: bool,
    pub side: Side,
    pub map: Option<TextureSlot>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Phong,
            color: [1.0, 1.0, 1.0],
            emissive: [0.0, 0.0, 0.0],
            shininess: 30.0,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            side: Side::Front,
            map: None,
        }
    }
}

impl Material {
    /// Unlit material with the given hex colour
    pub fn basic(hex: u32) -> Self {
        Self {
            kind: MaterialKind::Basic,
            color: hex_to_rgb(hex),
            ..Self::default()
        }
    }

    /// Diffuse-only material with the given hex colour
    pub fn lambert(hex: u32) -> Self {
        Self {
            kind: MaterialKind::Lambert,
            color: hex_to_rgb(hex),
            ..Self::default()
        }
    }

    /// Specular material with the given hex colour
    pub fn phong(hex: u32) -> Self {
        Self {
            kind: MaterialKind::Phong,
            color: hex_to_rgb(hex),
            ..Self::default()
        }
    }

    /// Yellow, very shiny, double-sided Phong surface with a 4x4 tiled map
    pub fn phong_shader(texture: Option<&str>) -> Self {
        Self {
            kind: MaterialKind::Phong,
            color: hex_to_rgb(0xffff00),
            shininess: 100.0,
            side: Side::Double,
            map: texture.map(|name| TextureSlot::new(name).with_offset(0.0, 0.0).with_repeat(4.0, 4.0)),
            ..Self::default()
        }
    }

    pub fn with_map(mut self, slot: TextureSlot) -> Self {
        self.map = Some(slot);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Set opacity; anything below 1 also turns on blending
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = self.opacity < 1.0;
        self
    }

    pub fn is_double_sided(&self) -> bool {
        self.side == Side::Double
    }

    pub fn map_name(&self) -> Option<&str> {
        self.map.as_ref().map(|slot| slot.name.as_str())
    }
}

/// Named material recipes that override the individual fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialPreset {
    /// See [`Material::phong_shader`]; `map` supplies only the texture name
    PhongShader,
}

/// Serializable material description
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub preset: Option<MaterialPreset>,
    pub kind: MaterialKind,
    /// Hex RGB, e.g. `0xC7C7C7`
    pub color: u32,
    pub emissive: u32,
    pub shininess: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub side: Side,
    pub map: Option<TextureSlot>,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            preset: None,
            kind: MaterialKind::Phong,
            color: 0xffffff,
            emissive: 0x000000,
            shininess: 30.0,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            side: Side::Front,
            map: None,
        }
    }
}

impl From<&MaterialConfig> for Material {
    fn from(config: &MaterialConfig) -> Self {
        if let Some(MaterialPreset::PhongShader) = config.preset {
            return Self::phong_shader(config.map.as_ref().map(|slot| slot.name.as_str()));
        }
        Self {
            kind: config.kind,
            color: hex_to_rgb(config.color),
            emissive: hex_to_rgb(config.emissive),
            shininess: config.shininess,
            opacity: config.opacity.clamp(0.0, 1.0),
            transparent: config.transparent || config.opacity < 1.0,
            wireframe: config.wireframe,
            side: config.side,
            map: config.map.clone(),
        }
    }
}
