//! Procedural snowfall
//!
//! Flakes are stored as fixed base positions; all motion is a pure function
//! of the elapsed time, evaluated on the GPU per vertex. [`animated_position`]
//! is the CPU reference of that vertex program.

use serde::{Deserialize, Serialize};
use snowfall_math::color::hex_to_rgb;
use snowfall_math::{SeededRandom, Vec3};

/// Appearance and motion of the flakes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowParameters {
    pub color: u32,
    /// Height of the column flakes wrap around in
    pub height: f32,
    /// Horizontal sway amplitude along X
    pub radius_x: f32,
    /// Horizontal sway amplitude along Z
    pub radius_z: f32,
    pub size: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Sway frequency multiplier
    pub speed_h: f32,
    /// Fall speed in units per second
    pub speed_v: f32,
}

impl Default for SnowParameters {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            height: 100.0,
            radius_x: 2.5,
            radius_z: 2.5,
            size: 100.0,
            scale: 4.0,
            opacity: 0.4,
            speed_h: 1.0,
            speed_v: 1.0,
        }
    }
}

impl SnowParameters {
    pub fn color_rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.color)
    }

    /// Screen size of a flake at a view distance; nearer flakes are larger
    pub fn point_size(&self, view_distance: f32) -> f32 {
        self.size * self.scale / view_distance.max(1e-3)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowSettings {
    pub enabled: bool,
    pub count: usize,
    /// Extent of the field along X
    pub width: f32,
    /// Extent of the field along Z
    pub depth: f32,
    /// Sprite texture asset name
    pub texture: Option<String>,
    pub parameters: SnowParameters,
}

impl Default for SnowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 10_000,
            width: 100.0,
            depth: 100.0,
            texture: Some("snowflake".to_string()),
            parameters: SnowParameters::default(),
        }
    }
}

/// Position of one flake at time `t`, relative to the field origin.
///
/// The vertical position wraps into `[0, height)`. The Z sway reads the X
/// coordinate after the X sway has been applied.
pub fn animated_position(base: Vec3, t: f32, params: &SnowParameters) -> Vec3 {
    let x = base.x + ((t + base.z) * 0.25 * params.speed_h).cos() * params.radius_x;
    let y = if params.height > 0.0 {
        (base.y - t * params.speed_v).rem_euclid(params.height)
    } else {
        base.y
    };
    let z = base.z + ((t + x) * 0.25 * params.speed_h).sin() * params.radius_z;
    Vec3::new(x, y, z)
}

/// A field of snow particles
#[derive(Clone, Debug)]
pub struct SnowField {
    pub parameters: SnowParameters,
    base_positions: Vec<Vec3>,
    /// Translation applied to the whole field
    pub offset: Vec3,
    elapsed_time: f32,
    texture: Option<String>,
}

impl SnowField {
    /// Scatter `count` flakes uniformly over the field volume
    pub fn new(settings: &SnowSettings, rng: &mut SeededRandom) -> Self {
        let params = settings.parameters.clone();
        let base_positions = (0..settings.count)
            .map(|_| {
                Vec3::new(
                    rng.next_centered(settings.width),
                    rng.next() * params.height,
                    rng.next_centered(settings.depth),
                )
            })
            .collect();

        Self {
            offset: Vec3::new(0.0, -params.height / 2.0, 0.0),
            parameters: params,
            base_positions,
            elapsed_time: 0.0,
            texture: settings.texture.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.base_positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base_positions.is_empty()
    }

    pub fn base_positions(&self) -> &[Vec3] {
        &self.base_positions
    }

    pub fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    /// Advance the snow clock
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed_time += dt;
        }
    }

    /// World position of flake `index` at the current time
    pub fn world_position(&self, index: usize) -> Option<Vec3> {
        let base = *self.base_positions.get(index)?;
        Some(animated_position(base, self.elapsed_time, &self.parameters) + self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings(count: usize) -> SnowSettings {
        SnowSettings { count, ..SnowSettings::default() }
    }

    #[test]
    fn test_field_scatter_within_bounds() {
        let settings = small_settings(500);
        let field = SnowField::new(&settings, &mut SeededRandom::new(9));
        assert_eq!(field.len(), 500);
        for p in field.base_positions() {
            assert!(p.x >= -50.0 && p.x < 50.0);
            assert!(p.y >= 0.0 && p.y < 100.0);
            assert!(p.z >= -50.0 && p.z < 50.0);
        }
        assert_eq!(field.offset, Vec3::new(0.0, -50.0, 0.0));
    }

    #[test]
    fn test_default_settings() {
        let settings = SnowSettings::default();
        assert_eq!(settings.count, 10_000);
        assert_eq!(settings.parameters.radius_x, 2.5);
        assert_eq!(settings.parameters.opacity, 0.4);
        assert_eq!(settings.parameters.color_rgb(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_animated_position_at_time_zero() {
        let params = SnowParameters::default();
        let base = Vec3::new(0.0, 10.0, 0.0);
        let p = animated_position(base, 0.0, &params);
        // cos(0) * 2.5 on X, then sin((0 + 2.5) * 0.25) * 2.5 on Z
        assert!((p.x - 2.5).abs() < 1e-5);
        assert_eq!(p.y, 10.0);
        assert!((p.z - (0.625f32).sin() * 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_flakes_fall_and_wrap() {
        let params = SnowParameters::default();
        let base = Vec3::new(0.0, 5.0, 0.0);
        assert!((animated_position(base, 3.0, &params).y - 2.0).abs() < 1e-4);
        // Falling past the floor wraps to the top of the column
        assert!((animated_position(base, 6.0, &params).y - 99.0).abs() < 1e-4);
        for t in [0.0, 17.3, 250.0, 1.0e4] {
            let y = animated_position(base, t, &params).y;
            assert!((0.0..100.0).contains(&y));
        }
    }

    #[test]
    fn test_flat_field_does_not_fall() {
        let params = SnowParameters {
            height: 0.0,
            ..SnowParameters::default()
        };
        let base = Vec3::new(1.0, 3.0, -2.0);
        for t in [0.0, 4.5, 1.0e3] {
            let y = animated_position(base, t, &params).y;
            assert!(y.is_finite());
            assert_eq!(y, 3.0);
        }
    }

    #[test]
    fn test_sway_is_bounded() {
        let params = SnowParameters::default();
        let base = Vec3::new(10.0, 50.0, -20.0);
        for step in 0..200 {
            let p = animated_position(base, step as f32 * 0.37, &params);
            assert!((p.x - base.x).abs() <= params.radius_x + 1e-4);
            assert!((p.z - base.z).abs() <= params.radius_z + 1e-4);
        }
    }

    #[test]
    fn test_point_size_attenuation() {
        let params = SnowParameters::default();
        assert_eq!(params.point_size(100.0), 4.0);
        assert!(params.point_size(50.0) > params.point_size(100.0));
        assert!(params.point_size(0.0).is_finite());
    }

    #[test]
    fn test_clock_and_world_position() {
        let mut field = SnowField::new(&small_settings(3), &mut SeededRandom::new(2));
        field.advance(0.5);
        field.advance(-1.0);
        assert_eq!(field.elapsed_time(), 0.5);

        let base = field.base_positions()[1];
        let expected = animated_position(base, 0.5, &field.parameters) + field.offset;
        assert_eq!(field.world_position(1), Some(expected));
        assert!(field.world_position(3).is_none());
        assert_eq!(field.texture(), Some("snowflake"));
    }
}
