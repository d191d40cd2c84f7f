//! Sphere primitive.

use std::f64::consts::PI;

use whitted_core::MaterialId;
use whitted_math::{Ray, Vec2, Vec3};

use crate::primitive::{EPSILON, NO_HIT};

/// A sphere given by center and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere. Non-positive radii are clamped to zero.
    pub fn new(center: Vec3, radius: f64, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Near and far roots of the ray/sphere quadratic.
    ///
    /// A discriminant within `EPSILON` of zero counts as a tangent hit and
    /// yields the same root twice.
    fn roots(&self, ray: &Ray) -> Option<(f64, f64)> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let delta = b * b - 4.0 * a * c;
        if delta.abs() <= EPSILON {
            let t = -b / (2.0 * a);
            Some((t, t))
        } else if delta > EPSILON {
            let root = delta.sqrt();
            Some(((-b - root) / (2.0 * a), (-b + root) / (2.0 * a)))
        } else {
            None
        }
    }

    /// Smaller root, which is negative when the ray starts inside.
    pub fn intersect(&self, ray: &Ray) -> f64 {
        self.roots(ray).map_or(NO_HIT, |(near, _)| near)
    }

    pub fn exit_distance(&self, ray: &Ray) -> f64 {
        self.roots(ray).map_or(NO_HIT, |(_, far)| far)
    }

    pub fn intersect_exit(&self, ray: &Ray) -> Vec3 {
        self.roots(ray).map_or(ray.origin, |(_, far)| ray.at(far))
    }

    /// Outward normal; unit length for points on the surface.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        if self.radius == 0.0 {
            return Vec3::ZERO;
        }
        (point - self.center) / self.radius
    }

    /// Longitude/latitude mapping: `v` runs from 0 at the bottom pole to 1
    /// at the top, `u` wraps once around the y axis.
    pub fn texture_coordinate_at(&self, point: Vec3) -> Vec2 {
        let p = self.normal_at(point).normalize_or_zero();
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }

    pub fn contains_surface_point(&self, point: Vec3) -> bool {
        (self.radius - (point - self.center).length()).abs() < EPSILON
    }
}
