//! Surface properties used by contact resolution

use serde::{Deserialize, Serialize};

/// Friction and bounce of a surface
///
/// Friction is a Coulomb coefficient: the tangential impulse at a contact is
/// capped at `friction * normal_impulse`. With enough friction a sphere on a
/// slope rolls instead of sliding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsMaterial {
    pub friction: f32,
    /// 0 absorbs the impact, 1 returns all of it
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

impl PhysicsMaterial {
    /// Packed snow over rock; what the terrain is made of
    pub const GROUND: Self = Self {
        friction: 0.7,
        restitution: 0.1,
    };

    /// Slick surface, spheres slide more than they roll
    pub const ICE: Self = Self {
        friction: 0.05,
        restitution: 0.1,
    };

    pub const BOUNCY: Self = Self {
        friction: 0.9,
        restitution: 0.8,
    };

    /// Friction floored at zero, restitution clamped to [0, 1]
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.max(0.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Material for a contact between two surfaces
    ///
    /// Friction is the geometric mean, so one frictionless side makes the
    /// contact frictionless. The bouncier side decides restitution.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spheres_default_to_dead_impacts() {
        let material = PhysicsMaterial::default();
        assert_eq!(material.restitution, 0.0);
        assert!(material.friction > 0.0);
    }

    #[test]
    fn test_new_keeps_values_physical() {
        assert_eq!(PhysicsMaterial::new(-1.0, 2.0), PhysicsMaterial { friction: 0.0, restitution: 1.0 });
        assert_eq!(PhysicsMaterial::new(1.5, -0.5), PhysicsMaterial { friction: 1.5, restitution: 0.0 });
    }

    #[test]
    fn test_frictionless_side_wins() {
        let slick = PhysicsMaterial::new(0.0, 0.0);
        assert_eq!(PhysicsMaterial::GROUND.combine(&slick).friction, 0.0);
    }

    #[test]
    fn test_sphere_on_terrain_contact() {
        let contact = PhysicsMaterial::default().combine(&PhysicsMaterial::GROUND);
        assert!((contact.friction - (0.5f32 * 0.7).sqrt()).abs() < 1e-6);
        assert_eq!(contact.restitution, 0.1);
        // Symmetric
        assert_eq!(contact, PhysicsMaterial::GROUND.combine(&PhysicsMaterial::default()));
    }

    #[test]
    fn test_deserialize_partial() {
        let material: PhysicsMaterial = serde_json::from_str(r#"{"restitution":0.3}"#).unwrap();
        assert_eq!(material.friction, 0.5);
        assert_eq!(material.restitution, 0.3);
    }
}
