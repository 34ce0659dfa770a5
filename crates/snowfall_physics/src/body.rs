//! Rigid body types

use std::sync::Arc;

use crate::material::PhysicsMaterial;
use crate::shapes::{Collider, Heightfield, Plane, Sphere};
use snowfall_math::{Quat, Vec3};
use slotmap::new_key_type;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing: if a body is removed and its slot reused,
    /// old keys return None instead of pointing to the wrong body.
    pub struct BodyKey;
}

/// How a body participates in the simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyType {
    /// Moved by gravity and contacts
    #[default]
    Dynamic,
    /// Never moves
    Static,
    /// Moves only by its own velocity; pushes dynamic bodies but is never pushed
    Kinematic,
}

/// A rigid sphere with linear and angular state
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Position of the center (world coordinates)
    pub position: Vec3,
    /// Orientation
    pub rotation: Quat,
    /// Linear velocity (units per second)
    pub velocity: Vec3,
    /// Angular velocity (radians per second, world axes)
    pub angular_velocity: Vec3,
    /// Mass; zero or negative mass behaves as immovable
    pub mass: f32,
    /// Surface material for contact response
    pub material: PhysicsMaterial,
    /// Whether this body is affected by gravity
    pub affected_by_gravity: bool,
    /// Collision sphere (center tracks `position`)
    pub collider: Sphere,
    pub body_type: BodyType,
}

impl RigidBody {
    /// Create a new dynamic sphere body with unit mass
    pub fn new_sphere(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            material: PhysicsMaterial::default(),
            affected_by_gravity: true,
            collider: Sphere::new(position, radius),
            body_type: BodyType::Dynamic,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation.normalize();
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    /// Set the restitution (bounciness) of this body
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.material.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    /// Set the body type; static and kinematic bodies ignore gravity
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        if body_type != BodyType::Dynamic {
            self.affected_by_gravity = false;
        }
        self
    }

    pub fn radius(&self) -> f32 {
        self.collider.radius
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn is_kinematic(&self) -> bool {
        self.body_type == BodyType::Kinematic
    }

    /// Inverse mass; zero for bodies that contacts cannot move
    pub fn inverse_mass(&self) -> f32 {
        if self.is_dynamic() && self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Inverse moment of inertia of a solid sphere (2/5 m r^2)
    pub fn inverse_inertia(&self) -> f32 {
        let r = self.collider.radius;
        let inertia = 0.4 * self.mass * r * r;
        if self.is_dynamic() && inertia > 0.0 {
            1.0 / inertia
        } else {
            0.0
        }
    }

    /// Velocity of a point offset `r` from the center
    pub fn velocity_at(&self, r: Vec3) -> Vec3 {
        self.velocity + self.angular_velocity.cross(r)
    }

    /// Apply an impulse at offset `r` from the center
    pub fn apply_impulse(&mut self, impulse: Vec3, r: Vec3) {
        self.velocity += impulse * self.inverse_mass();
        self.angular_velocity += r.cross(impulse) * self.inverse_inertia();
    }

    /// Update the position and sync the collider
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.collider.center = position;
    }

    /// Apply a positional correction (e.g., from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec3) {
        self.set_position(self.position + correction);
    }
}

/// Immovable collision geometry with a material
#[derive(Clone, Debug)]
pub struct StaticCollider {
    pub collider: Collider,
    pub material: PhysicsMaterial,
}

impl StaticCollider {
    pub fn new(collider: Collider, material: PhysicsMaterial) -> Self {
        Self { collider, material }
    }

    /// Horizontal floor at the given Y height
    pub fn floor(y: f32, material: PhysicsMaterial) -> Self {
        Self::new(Collider::Plane(Plane::floor(y)), material)
    }

    /// Plane with the given normal and distance from origin
    pub fn plane(normal: Vec3, distance: f32, material: PhysicsMaterial) -> Self {
        Self::new(Collider::Plane(Plane::new(normal, distance)), material)
    }

    /// Heightfield terrain
    pub fn heightfield(field: Heightfield, material: PhysicsMaterial) -> Self {
        Self::new(Collider::Heightfield(Arc::new(field)), material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sphere_body() {
        let pos = Vec3::new(1.0, 2.0, 3.0);
        let body = RigidBody::new_sphere(pos, 0.5);

        assert_eq!(body.position, pos);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.rotation, Quat::IDENTITY);
        assert_eq!(body.mass, 1.0);
        assert!(body.affected_by_gravity);
        assert!(body.is_dynamic());
        assert_eq!(body.collider.center, pos);
        assert_eq!(body.radius(), 0.5);
    }

    #[test]
    fn test_builder_methods() {
        let body = RigidBody::new_sphere(Vec3::ZERO, 1.0)
            .with_velocity(Vec3::new(1.0, 2.0, 0.0))
            .with_mass(5.0)
            .with_restitution(0.8)
            .with_gravity(false);

        assert_eq!(body.velocity, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(body.mass, 5.0);
        assert_eq!(body.material.restitution, 0.8);
        assert!(!body.affected_by_gravity);
    }

    #[test]
    fn test_restitution_clamping() {
        let body = RigidBody::new_sphere(Vec3::ZERO, 1.0).with_restitution(1.5);
        assert_eq!(body.material.restitution, 1.0);
    }

    #[test]
    fn test_non_dynamic_bodies_ignore_gravity_and_impulses() {
        let mut body = RigidBody::new_sphere(Vec3::ZERO, 1.0).with_body_type(BodyType::Static);
        assert!(body.is_static());
        assert!(!body.affected_by_gravity);
        assert_eq!(body.inverse_mass(), 0.0);

        body.apply_impulse(Vec3::new(10.0, 0.0, 0.0), Vec3::Y);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.angular_velocity, Vec3::ZERO);

        let kinematic = RigidBody::new_sphere(Vec3::ZERO, 1.0).with_body_type(BodyType::Kinematic);
        assert!(kinematic.is_kinematic());
        assert_eq!(kinematic.inverse_inertia(), 0.0);
    }

    #[test]
    fn test_solid_sphere_inertia() {
        let body = RigidBody::new_sphere(Vec3::ZERO, 2.0).with_mass(5.0);
        // I = 0.4 * 5 * 4 = 8
        assert!((body.inverse_inertia() - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_off_center_impulse_spins() {
        let mut body = RigidBody::new_sphere(Vec3::ZERO, 1.0).with_mass(2.0);
        // Push the bottom of the sphere along +X
        body.apply_impulse(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(body.velocity, Vec3::new(0.5, 0.0, 0.0));
        // (-Y) x (+X) = +Z
        assert!(body.angular_velocity.z > 0.0);
    }

    #[test]
    fn test_velocity_at_includes_spin() {
        let body = RigidBody::new_sphere(Vec3::ZERO, 1.0).with_angular_velocity(Vec3::new(0.0, 0.0, 2.0));
        // Spinning about +Z, the bottom point moves along +X
        let v = body.velocity_at(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(v, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_apply_correction_moves_collider() {
        let mut body = RigidBody::new_sphere(Vec3::new(1.0, 0.0, 0.0), 1.0);
        body.apply_correction(Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(body.position, Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(body.collider.center, Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_static_collider_constructors() {
        let floor = StaticCollider::floor(-2.0, PhysicsMaterial::GROUND);
        assert!(matches!(floor.collider, Collider::Plane(p) if p.distance == -2.0));

        let field = Heightfield::new(2, 2, vec![0.0; 4], 1.0, 1.0).unwrap();
        let terrain = StaticCollider::heightfield(field, PhysicsMaterial::default());
        assert!(matches!(terrain.collider, Collider::Heightfield(_)));
    }
}
