//! Scene simulation system
//!
//! Runs the per-frame animate loop:
//! - Delta time calculation
//! - Keyboard camera nudges
//! - Camera tweens
//! - Physics stepping, despawning and spawning
//! - Orbit controls and the snow clock

use std::time::Instant;

use snowfall_core::{
    EntityKey, ObjectSpawner, SeededRandom, SpawnerSettings, Tween, TweenSet, TweenSettings, TweenTarget, Vec3,
};
use snowfall_input::{Keyboard, OrbitControls};
use snowfall_render::Camera;

use crate::scene::Scene;

/// Largest frame delta fed to the simulation, in seconds
const MAX_FRAME_DT: f32 = 0.25;
/// Arrow-key orbit speed in radians per second
const KEY_ORBIT_SPEED: f32 = 1.5;
/// Shift+arrow dolly speed in zoom steps per second
const KEY_DOLLY_SPEED: f32 = 10.0;

/// Result of a simulation update
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimulationResult {
    /// Delta time the frame was simulated with
    pub dt: f32,
    /// Fixed physics steps taken
    pub physics_steps: u32,
    /// Entity added by the spawner this frame
    pub spawned: Option<EntityKey>,
    /// Objects removed after falling out of the world
    pub despawned: usize,
    /// Whether the orbit controls moved the camera
    pub camera_moved: bool,
}

/// Manages the scene simulation loop
pub struct SimulationSystem {
    last_frame: Instant,
    elapsed: f32,
    paused: bool,
    tweens: TweenSet,
    tween_settings: TweenSettings,
    spawner: ObjectSpawner,
    rng: SeededRandom,
    despawn_below: f32,
    home_position: Vec3,
}

impl SimulationSystem {
    /// Create a new simulation system
    ///
    /// `home_position` is where the camera reset tween returns to.
    pub fn new(
        spawner: SpawnerSettings,
        tween_settings: TweenSettings,
        rng: SeededRandom,
        despawn_below: f32,
        home_position: Vec3,
    ) -> Self {
        Self {
            last_frame: Instant::now(),
            elapsed: 0.0,
            paused: false,
            tweens: TweenSet::new(),
            tween_settings,
            spawner: ObjectSpawner::new(spawner),
            rng,
            despawn_below,
            home_position,
        }
    }

    /// Run one simulation frame using wall-clock time
    pub fn update(
        &mut self,
        scene: &mut Scene,
        camera: &mut Camera,
        controls: &mut OrbitControls,
        keyboard: &Keyboard,
    ) -> SimulationResult {
        let dt = self.frame_delta(Instant::now());
        self.step(dt, scene, camera, controls, keyboard)
    }

    /// Time since the previous frame, capped to keep the first frame and
    /// focus changes from producing huge steps
    fn frame_delta(&mut self, now: Instant) -> f32 {
        let raw_dt = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        raw_dt.min(MAX_FRAME_DT)
    }

    /// Run one simulation frame with an explicit delta time
    pub fn step(
        &mut self,
        dt: f32,
        scene: &mut Scene,
        camera: &mut Camera,
        controls: &mut OrbitControls,
        keyboard: &Keyboard,
    ) -> SimulationResult {
        let mut result = SimulationResult {
            dt,
            ..SimulationResult::default()
        };

        // 1. Keyboard camera nudges
        if controls.enabled {
            apply_key_nudges(controls, keyboard, dt);
        }

        // 2. Tweens drive the camera while active
        if self.tweens.is_tweening() {
            for sample in self.tweens.update(dt) {
                match sample.target {
                    TweenTarget::CameraPosition => camera.position = sample.value,
                    TweenTarget::CameraTarget => {
                        camera.target = sample.value;
                        controls.target = sample.value;
                    }
                }
            }
            if !self.tweens.is_tweening() {
                controls.reset_motion();
                controls.enabled = true;
            }
        }

        // 3. Physics
        if !self.paused {
            result.physics_steps = scene.world.update(dt);
        }

        // 4. Objects that left the terrain
        result.despawned = scene.world.despawn_below(self.despawn_below);

        // 5. Spawner
        if !self.paused && self.spawner.settings.enabled && scene.world.physics().is_some() {
            let live = scene.world.physics_entity_count();
            if self.spawner.tick(dt, live) {
                result.spawned = self.spawner.spawn(&mut scene.world, &mut self.rng);
            }
        }

        // 6. Orbit controls
        if controls.enabled {
            result.camera_moved = controls.update(camera);
        }

        // 7. Snow
        if let Some(snow) = scene.snow.as_mut() {
            snow.advance(dt);
        }

        self.elapsed += dt;
        result
    }

    /// Tween the camera back to its home position and target
    pub fn start_camera_reset(&mut self, camera: &Camera, controls: &mut OrbitControls) {
        let home_target = Vec3::from_array(controls.settings.target);
        let duration = self.tween_settings.duration_secs();
        let ease = self.tween_settings.easing;
        // Constrain against the home target so the tween ends inside the orbit limits
        controls.target = home_target;
        let home_position = controls.constrain(self.home_position);
        controls.target = camera.target;

        self.tweens.add(Tween::new(TweenTarget::CameraPosition, camera.position, home_position, ease, duration));
        self.tweens.add(Tween::new(TweenTarget::CameraTarget, camera.target, home_target, ease, duration));
        controls.enabled = false;
        log::debug!("Camera reset to {:?} over {:.2}s", home_position, duration);
    }

    /// Pause or resume physics and spawning; returns the new state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("Physics {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_tweening(&self) -> bool {
        self.tweens.is_tweening()
    }

    /// Seconds simulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn spawner(&self) -> &ObjectSpawner {
        &self.spawner
    }
}

/// Arrow keys orbit; with shift, up and down dolly instead
fn apply_key_nudges(controls: &mut OrbitControls, keyboard: &Keyboard, dt: f32) {
    let angle = KEY_ORBIT_SPEED * dt;
    if keyboard.pressed("left") {
        controls.rotate_left(angle);
    }
    if keyboard.pressed("right") {
        controls.rotate_left(-angle);
    }

    if keyboard.pressed("shift") {
        if keyboard.pressed("up") {
            controls.dolly(KEY_DOLLY_SPEED * dt);
        }
        if keyboard.pressed("down") {
            controls.dolly(-KEY_DOLLY_SPEED * dt);
        }
    } else {
        if keyboard.pressed("up") {
            controls.rotate_up(angle);
        }
        if keyboard.pressed("down") {
            controls.rotate_up(-angle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBuilder;
    use snowfall_core::{PhysicsConfig, SnowSettings, TerrainConfig};
    use snowfall_input::OrbitSettings;
    use std::time::Duration;
    use winit::keyboard::KeyCode;

    const DT: f32 = 1.0 / 60.0;

    fn system() -> SimulationSystem {
        SimulationSystem::new(
            SpawnerSettings::default(),
            TweenSettings::default(),
            SeededRandom::new(7),
            -500.0,
            Vec3::new(0.0, 30.0, 40.0),
        )
    }

    fn physics_scene() -> Scene {
        let mut rng = SeededRandom::new(3);
        SceneBuilder::new()
            .with_physics(PhysicsConfig::default())
            .add_terrain(&TerrainConfig::default(), &mut rng)
            .build()
    }

    fn camera_and_controls() -> (Camera, OrbitControls) {
        let controls = OrbitControls::new(OrbitSettings {
            enable_damping: false,
            ..OrbitSettings::default()
        });
        let camera = Camera::new(Vec3::new(0.0, 200.0, 200.0), 45.0, 2.0, 1000.0, 1.0);
        (camera, controls)
    }

    #[test]
    fn test_delta_time_capped() {
        let mut sim = system();
        let start = sim.last_frame;
        assert_eq!(sim.frame_delta(start + Duration::from_secs(2)), MAX_FRAME_DT);
        let dt = sim.frame_delta(start + Duration::from_millis(2100));
        assert!((dt - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_spawner_adds_spheres_over_time() {
        let mut sim = system();
        let mut scene = physics_scene();
        let (mut camera, mut controls) = camera_and_controls();
        let keyboard = Keyboard::new();

        let mut spawned = 0;
        // 8 simulated seconds: spawns once t passes 3 and again after 6.5
        for _ in 0..16 {
            if sim.step(0.5, &mut scene, &mut camera, &mut controls, &keyboard).spawned.is_some() {
                spawned += 1;
            }
        }
        assert_eq!(spawned, 2);
        assert_eq!(scene.world.physics_entity_count(), 2);
        assert!((sim.elapsed() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_pause_freezes_physics_and_spawning() {
        let mut sim = system();
        let mut scene = physics_scene();
        let (mut camera, mut controls) = camera_and_controls();
        let keyboard = Keyboard::new();

        assert!(sim.toggle_pause());
        for _ in 0..20 {
            let result = sim.step(0.5, &mut scene, &mut camera, &mut controls, &keyboard);
            assert_eq!(result.physics_steps, 0);
            assert!(result.spawned.is_none());
        }
        assert_eq!(scene.world.physics_entity_count(), 0);

        assert!(!sim.toggle_pause());
        let result = sim.step(DT, &mut scene, &mut camera, &mut controls, &keyboard);
        assert_eq!(result.physics_steps, 1);
    }

    #[test]
    fn test_spawner_needs_physics() {
        let mut sim = system();
        let mut scene = SceneBuilder::new().build();
        let (mut camera, mut controls) = camera_and_controls();
        for _ in 0..20 {
            let result = sim.step(0.5, &mut scene, &mut camera, &mut controls, &Keyboard::new());
            assert!(result.spawned.is_none());
        }
        assert_eq!(scene.world.entity_count(), 0);
    }

    #[test]
    fn test_camera_reset_tween() {
        let mut sim = system();
        let mut scene = SceneBuilder::new().build();
        let (mut camera, mut controls) = camera_and_controls();
        let keyboard = Keyboard::new();

        sim.start_camera_reset(&camera, &mut controls);
        assert!(!controls.enabled);
        assert!(sim.is_tweening());

        sim.step(0.25, &mut scene, &mut camera, &mut controls, &keyboard);
        assert!(!controls.enabled);

        sim.step(0.3, &mut scene, &mut camera, &mut controls, &keyboard);
        assert!(controls.enabled);
        assert!(!sim.is_tweening());

        // Home (0, 30, 40) is 50 from the target; the orbit keeps at least 200
        assert!((camera.position.length() - 200.0).abs() < 0.1);
        assert!(camera.position.x.abs() < 1e-3);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_arrow_keys_orbit_camera() {
        let mut sim = system();
        let mut scene = SceneBuilder::new().build();
        let (mut camera, mut controls) = camera_and_controls();
        let mut keyboard = Keyboard::new();
        keyboard.on_key_change(KeyCode::ArrowLeft, true);

        let result = sim.step(DT, &mut scene, &mut camera, &mut controls, &keyboard);
        assert!(result.camera_moved);
        // Orbiting left swings the camera toward -X
        assert!(camera.position.x < 0.0);
    }

    #[test]
    fn test_shift_up_dollies_in() {
        let mut sim = system();
        let mut scene = SceneBuilder::new().build();
        let (mut camera, mut controls) = camera_and_controls();
        let mut keyboard = Keyboard::new();
        keyboard.on_key_change(KeyCode::ShiftLeft, true);
        keyboard.on_key_change(KeyCode::ArrowUp, true);

        let before = camera.position.length();
        sim.step(0.1, &mut scene, &mut camera, &mut controls, &keyboard);
        assert!(camera.position.length() < before);
    }

    #[test]
    fn test_snow_clock_advances() {
        let mut sim = system();
        let settings = SnowSettings {
            count: 10,
            ..SnowSettings::default()
        };
        let mut scene = SceneBuilder::new().with_snow(&settings, &mut SeededRandom::new(1)).build();
        let (mut camera, mut controls) = camera_and_controls();

        sim.step(0.5, &mut scene, &mut camera, &mut controls, &Keyboard::new());
        let snow = scene.snow.unwrap();
        assert!(snow.elapsed_time() > 0.0);
    }
}
