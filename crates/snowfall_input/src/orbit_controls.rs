//! Orbit camera controls
//!
//! Controls:
//! - Left mouse drag: orbit around the target
//! - Scroll wheel: dolly in/out
//!
//! The camera position is kept in spherical coordinates around the target.
//! Polar angle is measured from +Y, azimuth from +Z toward +X.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use snowfall_math::Vec3;
use winit::event::{ElementState, MouseButton};

const EPS: f32 = 1e-6;

/// Tunables for [`OrbitControls`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub auto_rotate: bool,
    /// Full turns per minute at 60 updates per second; negative turns clockwise
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub enable_zoom: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// `None` leaves azimuth unbounded
    pub min_azimuth_angle: Option<f32>,
    pub max_azimuth_angle: Option<f32>,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub target: [f32; 3],
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            auto_rotate: false,
            auto_rotate_speed: -0.5,
            rotate_speed: 0.5,
            zoom_speed: 0.8,
            enable_zoom: true,
            min_distance: 200.0,
            max_distance: 600.0,
            min_polar_angle: PI / 5.0,
            max_polar_angle: PI / 2.0,
            min_azimuth_angle: None,
            max_azimuth_angle: None,
            enable_damping: true,
            damping_factor: 0.5,
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl OrbitSettings {
    /// Describe the first limit pair whose minimum exceeds its maximum
    pub fn inverted_limit(&self) -> Option<String> {
        let pairs = [
            ("distance", Some(self.min_distance), Some(self.max_distance)),
            ("polar angle", Some(self.min_polar_angle), Some(self.max_polar_angle)),
            ("azimuth angle", self.min_azimuth_angle, self.max_azimuth_angle),
        ];
        pairs.into_iter().find_map(|(what, min, max)| match (min, max) {
            (Some(min), Some(max)) if min > max || min.is_nan() || max.is_nan() => {
                Some(format!("min {} {} is not below max {}", what, min, max))
            }
            _ => None,
        })
    }
}

/// A camera the controls can drive
pub trait OrbitCamera {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn look_at(&mut self, target: Vec3);
}

/// Spherical offset from the target
#[derive(Clone, Copy, Debug, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y
    phi: f32,
    /// Azimuth from +Z toward +X
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < EPS {
            return Self { radius: 0.0, phi: 0.0, theta: 0.0 };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit controller
pub struct OrbitControls {
    pub settings: OrbitSettings,
    pub target: Vec3,
    /// Ignore user input while false (e.g. while a tween drives the camera)
    pub enabled: bool,
    dragging: bool,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            target: Vec3::from_array(settings.target),
            settings,
            enabled: true,
            dragging: false,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.dragging = self.enabled && state == ElementState::Pressed;
        }
    }

    /// Process mouse movement; only orbits while the left button is held
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64, viewport_height: f32) {
        if !self.enabled || !self.dragging || viewport_height <= 0.0 {
            return;
        }
        let per_pixel = TAU / viewport_height * self.settings.rotate_speed;
        self.rotate_left(delta_x as f32 * per_pixel);
        self.rotate_up(delta_y as f32 * per_pixel);
    }

    /// Process scroll input in lines; positive scrolls in
    pub fn process_scroll(&mut self, lines: f32) {
        if !self.enabled || !self.settings.enable_zoom {
            return;
        }
        self.dolly(lines);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Orbit to the left (camera moves clockwise seen from above)
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Orbit upwards
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Move toward the target by `steps` zoom steps; negative moves away
    pub fn dolly(&mut self, steps: f32) {
        let zoom_scale = 0.95f32.powf(self.settings.zoom_speed);
        self.scale *= zoom_scale.powf(steps);
    }

    /// Clamp a camera position to the distance and angle limits
    pub fn constrain(&self, position: Vec3) -> Vec3 {
        let mut spherical = Spherical::from_offset(position - self.target);
        self.clamp(&mut spherical);
        self.target + spherical.to_offset()
    }

    fn clamp(&self, spherical: &mut Spherical) {
        let s = &self.settings;
        let min_theta = s.min_azimuth_angle.unwrap_or(f32::NEG_INFINITY);
        let max_theta = s.max_azimuth_angle.unwrap_or(f32::INFINITY);
        spherical.theta = limit(spherical.theta, min_theta, max_theta);
        spherical.phi = limit(spherical.phi, s.min_polar_angle, s.max_polar_angle).clamp(EPS, PI - EPS);
        spherical.radius = limit(spherical.radius, s.min_distance, s.max_distance);
    }

    /// Apply pending rotation and zoom to the camera
    ///
    /// Returns true if the camera moved.
    pub fn update<C: OrbitCamera>(&mut self, camera: &mut C) -> bool {
        let position = camera.position();
        let mut spherical = Spherical::from_offset(position - self.target);

        if self.settings.auto_rotate && !self.dragging {
            self.rotate_left(TAU / 60.0 / 60.0 * self.settings.auto_rotate_speed);
        }

        let factor = if self.settings.enable_damping {
            self.settings.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.delta_theta * factor;
        spherical.phi += self.delta_phi * factor;
        spherical.radius *= self.scale;
        self.clamp(&mut spherical);

        let new_position = self.target + spherical.to_offset();
        camera.set_position(new_position);
        camera.look_at(self.target);

        if self.settings.enable_damping {
            self.delta_theta *= 1.0 - self.settings.damping_factor;
            self.delta_phi *= 1.0 - self.settings.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        (new_position - position).length_squared() > EPS
    }

    /// Drop pending motion (e.g. when a tween takes over)
    pub fn reset_motion(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.dragging = false;
    }
}

/// `min` wins when the limits are inverted; never panics
fn limit(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}
