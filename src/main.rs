//! Snowfall - Snow scene demo
//!
//! Orbit a heightfield terrain under falling snow while spheres drop onto it.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use snowfall::config::AppConfig;
use snowfall::input::{InputAction, InputMapper};
use snowfall::scene::{Scene, SceneBuilder};
use snowfall::systems::{FrameStats, RenderSystem, SimulationSystem, Throttle, WindowSystem};
use snowfall_core::{AssetCache, AssetLoader, Vec3};
use snowfall_input::{Keyboard, OrbitControls};
use snowfall_render::{Camera, RenderError};

/// Everything that exists once the renderer passed the capability check
struct Demo {
    scene: Scene,
    simulation: SimulationSystem,
    render: RenderSystem,
}

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    demo: Option<Demo>,
    camera: Camera,
    controls: OrbitControls,
    keyboard: Keyboard,
    stats: FrameStats,
    resize_throttle: Throttle,
    pending_size: Option<PhysicalSize<u32>>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let controls = OrbitControls::new(config.controls.clone());
        let mut camera = Camera::new(
            Vec3::from_array(config.camera.position),
            config.camera.fov,
            config.camera.near,
            config.camera.far,
            config.window.width as f32 / config.window.height.max(1) as f32,
        );
        camera.target = controls.target;

        Self {
            config,
            window: None,
            demo: None,
            camera,
            controls,
            keyboard: Keyboard::new(),
            stats: FrameStats::default(),
            resize_throttle: Throttle::default(),
            pending_size: None,
        }
    }

    /// Load assets, build the scene and hand it to the renderer
    fn start_demo(&self, render: RenderSystem) -> Demo {
        let mut assets = AssetCache::new();
        let report = AssetLoader::load_all(&self.config.assets, &mut assets);
        log::info!(
            "Loaded {} assets, {} failed",
            report.loaded.len(),
            report.failures.len()
        );

        let mut rng = self.config.debug.rng();
        let scene = SceneBuilder::from_config(&self.config, &assets, &mut rng);

        let mut render = render;
        render.prepare_scene(&scene, &assets);

        let simulation = SimulationSystem::new(
            self.config.spawner.clone(),
            self.config.tween.clone(),
            rng,
            self.config.physics.despawn_below,
            Vec3::from_array(self.config.camera.position),
        );

        Demo {
            scene,
            simulation,
            render,
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::ResetCamera => {
                if let Some(demo) = &mut self.demo {
                    demo.simulation.start_camera_reset(&self.camera, &mut self.controls);
                }
            }
            InputAction::TogglePause => {
                if let Some(demo) = &mut self.demo {
                    demo.simulation.toggle_pause();
                }
            }
            InputAction::ToggleAutoRotate => {
                self.controls.settings.auto_rotate = !self.controls.settings.auto_rotate;
                log::info!(
                    "Auto-rotate: {}",
                    if self.controls.settings.auto_rotate { "ON" } else { "OFF" }
                );
            }
        }
    }

    fn apply_pending_resize(&mut self) {
        if let (Some(size), Some(demo)) = (self.pending_size.take(), &mut self.demo) {
            demo.render.resize(size.width, size.height);
            log::debug!("Resized to {}x{}", size.width, size.height);
        }
    }

    /// One animation frame: simulate, then render
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        if self.resize_throttle.poll() {
            self.apply_pending_resize();
        }

        let Some(demo) = &mut self.demo else {
            return;
        };

        let result = demo.simulation.update(
            &mut demo.scene,
            &mut self.camera,
            &mut self.controls,
            &self.keyboard,
        );
        if self.config.debug.dev_mode {
            self.stats.record(result.dt);
        }

        let status = format!(
            "{} objects{}",
            demo.scene.world.physics_entity_count(),
            if demo.simulation.is_paused() { " (paused)" } else { "" }
        );

        match demo.render.render_frame(&mut demo.scene, &mut self.camera) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => demo.render.reconfigure(),
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("{}", e),
        }

        if let Some(window) = &mut self.window {
            window.update_title(&status);
            window.poll_title();
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.window().inner_size();
        self.camera.set_aspect(size.width, size.height);

        match RenderSystem::new(
            Arc::clone(window.window()),
            self.config.window.vsync,
            self.config.renderer.clear_color(),
        ) {
            Ok(render) => {
                let demo = self.start_demo(render);
                log::info!("Scene ready: {} entities", demo.scene.world.entity_count());
                self.demo = Some(demo);
                window.request_redraw();
            }
            Err(e) => window.show_unsupported(&e.to_string()),
        }

        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                self.pending_size = Some(physical_size);
                if self.resize_throttle.call() {
                    self.apply_pending_resize();
                }
            }

            WindowEvent::Focused(false) => {
                self.keyboard.on_blur();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state, event.repeat) {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.controls.process_mouse_button(button, state);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.controls.process_scroll(lines);
            }

            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            let height = self
                .window
                .as_ref()
                .map(|w| w.window().inner_size().height as f32)
                .unwrap_or(0.0);
            self.controls.process_mouse_motion(delta.0, delta.1, height);
        }
    }
}

fn main() {
    // Configuration first so the log level can come from it
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize logging; RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting Snowfall");

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create and run application
    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
