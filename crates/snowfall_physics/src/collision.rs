//! Collision detection
//!
//! Provides contact generation for spheres against planes, other spheres and
//! heightfield terrain.

use crate::shapes::{Heightfield, Plane, Sphere};
use snowfall_math::Vec3;

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Point of contact (on the surface of the first shape)
    pub point: Vec3,
    /// Unit normal; for static contacts it points from the static shape toward the body
    pub normal: Vec3,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    /// Create a new contact
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }

    /// Check if this represents an actual collision (positive penetration)
    pub fn is_colliding(&self) -> bool {
        self.penetration > 0.0
    }
}

/// Test sphere vs plane collision
///
/// The contact normal is the plane normal (from the plane toward the sphere
/// when the sphere is above it).
pub fn sphere_vs_plane(sphere: &Sphere, plane: &Plane) -> Option<Contact> {
    let signed_dist = plane.signed_distance(sphere.center);
    // Works whether the center is above or below the plane
    let penetration = sphere.radius - signed_dist;

    if penetration > 0.0 {
        let normal = plane.normal;
        let point = sphere.center - normal * sphere.radius;
        Some(Contact::new(point, normal, penetration))
    } else {
        None
    }
}

/// Sphere vs sphere collision (normal points from sphere A toward B)
pub fn sphere_vs_sphere(a: &Sphere, b: &Sphere) -> Option<Contact> {
    let delta = b.center - a.center;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;

    if dist_sq < min_dist * min_dist && dist_sq > 0.0001 {
        let dist = dist_sq.sqrt();
        let normal = delta / dist;
        let point = a.center + normal * a.radius;
        Some(Contact::new(point, normal, min_dist - dist))
    } else {
        None
    }
}

/// Closest point to `p` on triangle `abc` (Voronoi region walk)
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Test sphere vs heightfield collision
///
/// Every triangle under the sphere's footprint is tested and the deepest
/// contact wins. A center that has fallen below the surface is pushed back
/// out along the surface normal.
pub fn sphere_vs_heightfield(sphere: &Sphere, field: &Heightfield) -> Option<Contact> {
    let reach = sphere.radius + field.margin;
    let c = sphere.center;

    if c.y - reach > field.max_height() {
        return None;
    }

    let mut best: Option<Contact> = None;
    let mut consider = |contact: Contact| {
        if best.map_or(true, |b| contact.penetration > b.penetration) {
            best = Some(contact);
        }
    };

    // Tunnelled below the surface
    if let (Some(h), Some(n)) = (field.height_at(c.x, c.z), field.normal_at(c.x, c.z)) {
        if c.y < h {
            let depth = (h - c.y) * n.y + reach;
            consider(Contact::new(c - n * sphere.radius, n, depth));
        }
    }

    let (is, js) = field.cells_overlapping(c.x - reach, c.z - reach, c.x + reach, c.z + reach)?;
    for j in js {
        for i in is.clone() {
            for [a, b, t] in field.cell_triangles(i, j) {
                let closest = closest_point_on_triangle(c, a, b, t);
                let delta = c - closest;
                let dist_sq = delta.length_squared();
                if dist_sq >= reach * reach {
                    continue;
                }
                let dist = dist_sq.sqrt();
                let face_normal = (b - a).cross(t - a).normalized();
                let normal = if dist > 1e-5 {
                    let n = delta / dist;
                    // Below a face the offset points down; keep pushing up
                    if n.dot(face_normal) < 0.0 { face_normal } else { n }
                } else {
                    face_normal
                };
                consider(Contact::new(closest, normal, reach - dist));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_contact_is_colliding() {
        assert!(Contact::new(Vec3::ZERO, Vec3::Y, 0.1).is_colliding());
        assert!(!Contact::new(Vec3::ZERO, Vec3::Y, 0.0).is_colliding());
    }

    #[test]
    fn test_sphere_vs_plane_penetrating() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.5, 0.0), 1.0);
        let contact = sphere_vs_plane(&sphere, &Plane::floor(0.0)).unwrap();
        assert!((contact.penetration - 0.5).abs() < EPSILON);
        assert_eq!(contact.normal, Vec3::Y);
        assert!(vec_approx_eq(contact.point, Vec3::new(0.0, -0.5, 0.0)));
    }

    #[test]
    fn test_sphere_vs_plane_separated() {
        let sphere = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 1.0);
        assert!(sphere_vs_plane(&sphere, &Plane::floor(0.0)).is_none());
    }

    #[test]
    fn test_sphere_vs_plane_center_below() {
        let sphere = Sphere::new(Vec3::new(0.0, -0.5, 0.0), 1.0);
        let contact = sphere_vs_plane(&sphere, &Plane::floor(0.0)).unwrap();
        assert!((contact.penetration - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_sphere_vs_sphere_overlap() {
        let a = Sphere::new(Vec3::ZERO, 1.0);
        let b = Sphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let contact = sphere_vs_sphere(&a, &b).unwrap();
        assert!((contact.penetration - 0.5).abs() < EPSILON);
        assert!(vec_approx_eq(contact.normal, Vec3::X));
        assert!(vec_approx_eq(contact.point, Vec3::X));
    }

    #[test]
    fn test_sphere_vs_sphere_apart_or_coincident() {
        let a = Sphere::new(Vec3::ZERO, 1.0);
        assert!(sphere_vs_sphere(&a, &Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0)).is_none());
        // Coincident centres have no defined normal
        assert!(sphere_vs_sphere(&a, &a).is_none());
    }

    #[test]
    fn test_closest_point_regions() {
        let a = Vec3::ZERO;
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 1.0);

        // Face interior projects straight down
        let p = closest_point_on_triangle(Vec3::new(0.25, 5.0, 0.25), a, b, c);
        assert!(vec_approx_eq(p, Vec3::new(0.25, 0.0, 0.25)));

        // Vertex regions
        assert!(vec_approx_eq(closest_point_on_triangle(Vec3::new(-1.0, 0.0, -1.0), a, b, c), a));
        assert!(vec_approx_eq(closest_point_on_triangle(Vec3::new(3.0, 0.0, 0.0), a, b, c), b));
        assert!(vec_approx_eq(closest_point_on_triangle(Vec3::new(0.0, 1.0, 3.0), a, b, c), c));

        // Edge region between b and c
        let p = closest_point_on_triangle(Vec3::new(1.0, 0.0, 1.0), a, b, c);
        assert!(vec_approx_eq(p, Vec3::new(0.5, 0.0, 0.5)));
    }

    fn flat_field(height: f32) -> Heightfield {
        Heightfield::new(3, 3, vec![height; 9], 4.0, 4.0).unwrap()
    }

    #[test]
    fn test_sphere_resting_on_flat_heightfield() {
        let field = flat_field(2.0);
        let sphere = Sphere::new(Vec3::new(0.3, 2.8, -0.4), 1.0);
        let contact = sphere_vs_heightfield(&sphere, &field).unwrap();
        assert!((contact.penetration - 0.2).abs() < EPSILON);
        assert!(vec_approx_eq(contact.normal, Vec3::Y));
    }

    #[test]
    fn test_sphere_above_heightfield_has_no_contact() {
        let field = flat_field(2.0);
        let sphere = Sphere::new(Vec3::new(0.0, 3.5, 0.0), 1.0);
        assert!(sphere_vs_heightfield(&sphere, &field).is_none());
    }

    #[test]
    fn test_margin_extends_contact() {
        let field = flat_field(0.0).with_margin(0.05);
        let sphere = Sphere::new(Vec3::new(0.0, 1.02, 0.0), 1.0);
        let contact = sphere_vs_heightfield(&sphere, &field).unwrap();
        assert!((contact.penetration - 0.03).abs() < EPSILON);
    }

    #[test]
    fn test_tunnelled_sphere_pushed_up() {
        let field = flat_field(0.0);
        let sphere = Sphere::new(Vec3::new(0.1, -3.0, 0.1), 0.5);
        let contact = sphere_vs_heightfield(&sphere, &field).unwrap();
        assert!(contact.normal.y > 0.99);
        // Needs 3 units to reach the surface plus the radius
        assert!((contact.penetration - 3.5).abs() < EPSILON);
    }

    #[test]
    fn test_sphere_off_the_edge_misses() {
        let field = flat_field(0.0);
        let sphere = Sphere::new(Vec3::new(10.0, 0.0, 0.0), 1.0);
        assert!(sphere_vs_heightfield(&sphere, &field).is_none());
    }
}
