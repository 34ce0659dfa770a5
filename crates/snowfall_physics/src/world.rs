//! Physics world and simulation

use crate::body::{BodyKey, RigidBody, StaticCollider};
use crate::collision::{sphere_vs_heightfield, sphere_vs_plane, sphere_vs_sphere, Contact};
use crate::material::PhysicsMaterial;
use crate::shapes::{Collider, Sphere};
use serde::{Deserialize, Serialize};
use snowfall_math::Vec3;
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity acceleration vector
    pub gravity: Vec3,
    /// Length of one internal simulation step in seconds
    pub fixed_timestep: f32,
    /// Upper bound on steps taken per `step_simulation` call; 0 steps the raw dt once
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -100.0, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 10,
        }
    }
}

impl PhysicsConfig {
    /// Create a config with the given gravity vector and default stepping
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// Whether `fixed_timestep` can drive the accumulator
    pub fn has_valid_timestep(&self) -> bool {
        self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0
    }

    /// Reject settings the fixed-step loop cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if !self.has_valid_timestep() {
            return Err(format!(
                "fixed_timestep must be a positive number of seconds, got {}",
                self.fixed_timestep
            ));
        }
        Ok(())
    }
}

/// The physics world containing all rigid bodies
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Static colliders (floors, terrain)
    static_colliders: Vec<StaticCollider>,
    /// Time not yet consumed by fixed steps
    accumulator: f32,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    ///
    /// An unusable `fixed_timestep` is logged; such a world steps the raw
    /// frame time once per call instead.
    pub fn with_config(config: PhysicsConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("{}; stepping once per frame", e);
        }
        Self {
            bodies: SlotMap::with_key(),
            static_colliders: Vec::new(),
            accumulator: 0.0,
            config,
        }
    }

    /// Add a static collider to the world
    pub fn add_static_collider(&mut self, collider: StaticCollider) {
        self.static_colliders.push(collider);
    }

    /// Get immutable access to static colliders
    pub fn static_colliders(&self) -> &[StaticCollider] {
        &self.static_colliders
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body from the world and return it
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        self.bodies.remove(key)
    }

    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Iterate over all bodies with their keys
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> {
        self.bodies.iter()
    }

    /// Time carried over to the next `step_simulation` call
    pub fn pending_time(&self) -> f32 {
        self.accumulator
    }

    /// Remove dynamic bodies whose centers fell below `y`, returning their keys
    pub fn despawn_below(&mut self, y: f32) -> Vec<BodyKey> {
        let doomed: Vec<BodyKey> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.is_dynamic() && b.position.y < y)
            .map(|(k, _)| k)
            .collect();
        for key in &doomed {
            self.bodies.remove(*key);
        }
        if !doomed.is_empty() {
            log::debug!("Despawned {} bodies below y={}", doomed.len(), y);
        }
        doomed
    }

    /// Advance by frame time `dt` using fixed internal steps
    ///
    /// Time accumulates across calls and is consumed in `fixed_timestep`
    /// slices. At most `max_substeps` slices run per call; time beyond that
    /// cap is dropped so a long stall cannot snowball. Returns the number of
    /// steps taken.
    pub fn step_simulation(&mut self, dt: f32) -> u32 {
        if !(dt > 0.0) {
            return 0;
        }

        if self.config.max_substeps == 0 || !self.config.has_valid_timestep() {
            self.step(dt);
            return 1;
        }

        let fixed = self.config.fixed_timestep;
        self.accumulator += dt;
        let available = (self.accumulator / fixed).floor() as u32;
        self.accumulator -= available as f32 * fixed;

        let steps = available.min(self.config.max_substeps);
        if steps < available {
            log::trace!("Dropping {} physics steps", available - steps);
            self.accumulator = 0.0;
        }
        for _ in 0..steps {
            self.step(fixed);
        }
        steps
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs:
    /// 1. Gravity application to dynamic bodies with gravity enabled
    /// 2. Linear and angular velocity integration
    /// 3. Static collider collision detection and resolution
    /// 4. Body-body collision detection and resolution
    pub fn step(&mut self, dt: f32) {
        let gravity = self.config.gravity;

        for (_key, body) in &mut self.bodies {
            if body.is_static() {
                continue;
            }

            if body.affected_by_gravity && body.is_dynamic() {
                body.velocity += gravity * dt;
            }

            let displacement = body.velocity * dt;
            body.apply_correction(displacement);
            body.rotation = body.rotation.integrate(body.angular_velocity, dt);
        }

        // Below this approach speed contacts don't bounce, so resting bodies settle
        let resting_speed = 2.0 * gravity.length() * dt;

        self.resolve_static_collisions(resting_speed);
        self.resolve_body_collisions(resting_speed);
    }

    /// Check for collision between a body sphere and a static collider
    fn check_static_collision(sphere: &Sphere, static_collider: &Collider) -> Option<Contact> {
        match static_collider {
            Collider::Plane(plane) => sphere_vs_plane(sphere, plane),
            Collider::Heightfield(field) => sphere_vs_heightfield(sphere, field),
            // Normal must point toward the body, so test from the static side
            Collider::Sphere(fixed) => sphere_vs_sphere(fixed, sphere),
        }
    }

    /// Resolve collisions between bodies and static colliders
    fn resolve_static_collisions(&mut self, resting_speed: f32) {
        for (_key, body) in &mut self.bodies {
            if !body.is_dynamic() {
                continue;
            }

            for static_col in &self.static_colliders {
                let Some(contact) = Self::check_static_collision(&body.collider, &static_col.collider) else {
                    continue;
                };
                if !contact.is_colliding() {
                    continue;
                }

                // Push the body out of the static collider
                body.apply_correction(contact.normal * contact.penetration);

                let combined = body.material.combine(&static_col.material);
                Self::apply_static_response(body, contact.normal, &combined, resting_speed);
            }
        }
    }

    /// Impulse response against an immovable surface with normal `n`
    fn apply_static_response(body: &mut RigidBody, n: Vec3, material: &PhysicsMaterial, resting_speed: f32) {
        let r = -n * body.radius();
        let v_contact = body.velocity_at(r);
        let vn = v_contact.dot(n);
        if vn >= 0.0 {
            return;
        }

        let inv_mass = body.inverse_mass();
        if inv_mass == 0.0 {
            return;
        }

        let restitution = if -vn < resting_speed { 0.0 } else { material.restitution };
        let jn = -(1.0 + restitution) * vn / inv_mass;
        let mut impulse = n * jn;

        // Coulomb friction on the sliding part of the contact velocity
        let vt = v_contact - n * vn;
        let vt_len = vt.length();
        if vt_len > 1e-4 {
            let t = vt / vt_len;
            let radius = body.radius();
            let k = inv_mass + radius * radius * body.inverse_inertia();
            let jt = (vt_len / k).min(material.friction * jn);
            impulse -= t * jt;
        }

        body.apply_impulse(impulse, r);
    }

    /// Resolve collisions between bodies
    fn resolve_body_collisions(&mut self, resting_speed: f32) {
        let keys: Vec<BodyKey> = self.bodies.keys().collect();
        let key_count = keys.len();

        for i in 0..key_count {
            for j in (i + 1)..key_count {
                let (key_a, key_b) = (keys[i], keys[j]);
                let body_a = &self.bodies[key_a];
                let body_b = &self.bodies[key_b];

                if !body_a.is_dynamic() && !body_b.is_dynamic() {
                    continue;
                }

                // Normal points FROM body A TOWARD body B
                if let Some(contact) = sphere_vs_sphere(&body_a.collider, &body_b.collider) {
                    if contact.is_colliding() {
                        self.resolve_body_pair_collision(key_a, key_b, &contact, resting_speed);
                    }
                }
            }
        }
    }

    /// Resolve collision between two specific bodies
    fn resolve_body_pair_collision(
        &mut self,
        key_a: BodyKey,
        key_b: BodyKey,
        contact: &Contact,
        resting_speed: f32,
    ) {
        let (Some(mut a), Some(mut b)) = (self.bodies.get(key_a).cloned(), self.bodies.get(key_b).cloned()) else {
            return;
        };
        Self::pair_response(&mut a, &mut b, contact, resting_speed);
        self.bodies[key_a] = a;
        self.bodies[key_b] = b;
    }

    /// Positional correction and impulse exchange for one touching pair
    fn pair_response(a: &mut RigidBody, b: &mut RigidBody, contact: &Contact, resting_speed: f32) {

        let inv_a = a.inverse_mass();
        let inv_b = b.inverse_mass();
        let inv_total = inv_a + inv_b;
        if inv_total == 0.0 {
            return;
        }

        // Split the correction by inverse mass: the lighter body moves further
        let n = contact.normal;
        a.apply_correction(-n * (contact.penetration * inv_a / inv_total));
        b.apply_correction(n * (contact.penetration * inv_b / inv_total));

        let r_a = n * a.radius();
        let r_b = -n * b.radius();
        let v_rel = b.velocity_at(r_b) - a.velocity_at(r_a);
        let vn = v_rel.dot(n);
        if vn >= 0.0 {
            return;
        }

        let combined = a.material.combine(&b.material);
        let restitution = if -vn < resting_speed { 0.0 } else { combined.restitution };
        let jn = -(1.0 + restitution) * vn / inv_total;
        let mut impulse = n * jn;

        let vt = v_rel - n * vn;
        let vt_len = vt.length();
        if vt_len > 1e-4 {
            let t = vt / vt_len;
            let k = inv_total
                + a.radius() * a.radius() * a.inverse_inertia()
                + b.radius() * b.radius() * b.inverse_inertia();
            let jt = (vt_len / k).min(combined.friction * jn);
            impulse -= t * jt;
        }

        a.apply_impulse(-impulse, r_a);
        b.apply_impulse(impulse, r_b);
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
