//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SNOW_SECTION__KEY`)
//!
//! Scene sections (`fog`, `lights`, `terrain`, `spawner`, `snow`, `assets`,
//! `meshes`, `tween`) reuse the settings types of the crates that consume them.

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use snowfall_core::{
    AssetManifest, FogSettings, GeometryKind, LightSettings, MaterialConfig, MaterialKind, MaterialPreset, Side,
    MeshConfig, PhysicsConfig, SeededRandom, SnowSettings, SpawnerSettings, TerrainConfig, TextureSlot, TweenSettings, Vec3,
};
use snowfall_input::OrbitSettings;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    /// Orbit controls
    #[serde(default)]
    pub controls: OrbitSettings,
    #[serde(default)]
    pub fog: FogSettings,
    #[serde(default)]
    pub lights: LightSettings,
    /// Flat decorative ground plane
    #[serde(default)]
    pub ground: GroundConfig,
    /// Heightfield terrain the spawned spheres land on
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub physics: PhysicsSettings,
    #[serde(default)]
    pub spawner: SpawnerSettings,
    #[serde(default)]
    pub snow: SnowSettings,
    #[serde(default)]
    pub assets: AssetManifest,
    /// Extra meshes placed at startup
    #[serde(default = "default_meshes")]
    pub meshes: Vec<MeshConfig>,
    /// Camera reset animation
    #[serde(default)]
    pub tween: TweenSettings,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            renderer: RendererConfig::default(),
            camera: CameraConfig::default(),
            controls: OrbitSettings::default(),
            fog: FogSettings::default(),
            lights: LightSettings::default(),
            ground: GroundConfig::default(),
            terrain: TerrainConfig::default(),
            physics: PhysicsSettings::default(),
            spawner: SpawnerSettings::default(),
            snow: SnowSettings::default(),
            assets: AssetManifest::default(),
            meshes: default_meshes(),
            tween: TweenSettings::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SNOW_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // SNOW_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("SNOW_").split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(problem) = self.controls.inverted_limit() {
            return Err(ConfigError::invalid("controls", problem));
        }
        self.physics
            .to_physics_config()
            .validate()
            .map_err(|problem| ConfigError::invalid("physics", problem))
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Snowfall".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Background colour as hex RGB
    pub clear_color: u32,
    /// Background alpha; 0 leaves the surface transparent where supported
    pub clear_alpha: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: 0x000000,
            clear_alpha: 1.0,
        }
    }
}

impl RendererConfig {
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = snowfall_math::color::hex_to_rgb(self.clear_color);
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: self.clear_alpha.clamp(0.0, 1.0) as f64,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position [x, y, z]
    pub position: [f32; 3],
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 30.0, 40.0],
            fov: 45.0,
            near: 2.0,
            far: 1000.0,
        }
    }
}

/// Ground plane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub enabled: bool,
    /// Edge length of the square plane
    pub size: f32,
    /// Segments along each edge
    pub segments: u32,
    /// Height of the plane
    pub y: f32,
    pub material: MaterialConfig,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 150.0,
            segments: 10,
            y: -20.0,
            material: MaterialConfig {
                kind: MaterialKind::Lambert,
                color: 0xffffff,
                side: Side::Double,
                ..MaterialConfig::default()
            },
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Run the rigid-body simulation at all
    pub enabled: bool,
    /// Gravity vector
    pub gravity: [f32; 3],
    /// Length of one simulation step in seconds
    pub fixed_timestep: f32,
    /// Maximum steps per frame
    pub max_substeps: u32,
    /// Bodies that fall below this height are removed
    pub despawn_below: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            gravity: [0.0, -100.0, 0.0],
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 10,
            despawn_below: -500.0,
        }
    }
}

impl PhysicsSettings {
    /// Convert to the physics crate's config
    pub fn to_physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            gravity: Vec3::from_array(self.gravity),
            fixed_timestep: self.fixed_timestep,
            max_substeps: self.max_substeps,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log frame statistics once per second
    pub dev_mode: bool,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Seed for terrain, snow and spawn randomness; random when unset
    pub seed: Option<u32>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            dev_mode: false,
            log_level: "info".to_string(),
            seed: None,
        }
    }
}

impl DebugConfig {
    /// Random source for the scene; seeded from the clock when no seed is set
    pub fn rng(&self) -> SeededRandom {
        let seed = self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        });
        log::debug!("Scene seed {}", seed);
        SeededRandom::new(seed)
    }
}

/// The teapot, scaled up and wrapped in the tiled phong shader material
fn default_meshes() -> Vec<MeshConfig> {
    vec![MeshConfig {
        name: Some("teapot".to_string()),
        geometry: GeometryKind::Json { model: "teapot".to_string() },
        position: [0.0, 0.0, 0.0],
        rotation: [0.0; 3],
        scale: [20.0, 20.0, 20.0],
        geo_rotate: [0.0; 3],
        material: MaterialConfig {
            preset: Some(MaterialPreset::PhongShader),
            map: Some(TextureSlot::new("uv_grid")),
            ..MaterialConfig::default()
        },
        tags: vec!["decoration".to_string()],
    }]
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(section: &str, problem: String) -> Self {
        ConfigError {
            message: format!("[{}] {}", section, problem),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
