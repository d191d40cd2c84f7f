//! Axis-aligned box primitive.

use whitted_core::MaterialId;
use whitted_math::{Aabb, Ray, Vec2, Vec3};

use crate::primitive::{EPSILON, NO_HIT};

/// An axis-aligned box between two corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    bounds: Aabb,
    material: MaterialId,
}

impl Cuboid {
    /// Create a box from two opposite corners, in any order.
    pub fn new(a: Vec3, b: Vec3, material: MaterialId) -> Self {
        Self {
            bounds: Aabb::from_points(a, b),
            material,
        }
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Distance to the first near face hit, trying the x, y and z slabs in
    /// that order. Rays starting inside the box do not hit it.
    pub fn intersect(&self, ray: &Ray) -> f64 {
        self.bounds.entry_distance(ray, EPSILON).unwrap_or(NO_HIT)
    }

    /// Axis-aligned normal of the face the point lies on, or zero when the
    /// point is on no face.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        self.bounds.face_normal(point, EPSILON)
    }

    pub fn texture_coordinate_at(&self, point: Vec3) -> Vec2 {
        self.bounds
            .face_coordinates(point, EPSILON)
            .unwrap_or(Vec2::ZERO)
    }

    pub fn contains_surface_point(&self, point: Vec3) -> bool {
        self.bounds.on_surface(point, EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Cuboid {
        Cuboid::new(Vec3::splat(-1.0), Vec3::splat(1.0), 0)
    }

    #[test]
    fn test_box_hit_each_axis() {
        let cuboid = unit_box();

        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!((cuboid.intersect(&ray) - 4.0).abs() < 1e-12);

        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!((cuboid.intersect(&ray) - 4.0).abs() < 1e-12);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        assert!((cuboid.intersect(&ray) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_box_miss() {
        let cuboid = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 3.0, 5.0), Vec3::NEG_Z);

        assert!(cuboid.intersect(&ray) < 0.0);
    }

    #[test]
    fn test_box_axis_order() {
        let cuboid = unit_box();

        // Crosses the shared edge of the x = -1 and z = 1 faces; x is tried
        // first and owns the normal
        let ray = Ray::new(Vec3::new(-2.0, 0.0, 2.0), Vec3::new(1.0, 0.0, -1.0));
        let t = cuboid.intersect(&ray);
        assert!((t - 1.0).abs() < 1e-12);
        assert_eq!(cuboid.normal_at(ray.at(t)), Vec3::NEG_X);
    }

    #[test]
    fn test_box_from_inside_misses() {
        let cuboid = unit_box();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.2, 1.0));

        assert!(cuboid.intersect(&ray) < 0.0);
    }

    #[test]
    fn test_box_face_normals() {
        let cuboid = unit_box();

        assert_eq!(cuboid.normal_at(Vec3::new(-1.0, 0.2, 0.3)), Vec3::NEG_X);
        assert_eq!(cuboid.normal_at(Vec3::new(1.0, 0.2, 0.3)), Vec3::X);
        assert_eq!(cuboid.normal_at(Vec3::new(0.2, -1.0, 0.3)), Vec3::NEG_Y);
        assert_eq!(cuboid.normal_at(Vec3::new(0.2, 1.0, 0.3)), Vec3::Y);
        assert_eq!(cuboid.normal_at(Vec3::new(0.2, 0.3, -1.0)), Vec3::NEG_Z);
        assert_eq!(cuboid.normal_at(Vec3::new(0.2, 0.3, 1.0)), Vec3::Z);
        assert_eq!(cuboid.normal_at(Vec3::ZERO), Vec3::ZERO);

        // Edge points resolve to the first face in check order
        assert_eq!(cuboid.normal_at(Vec3::new(1.0, -1.0, 0.0)), Vec3::X);
    }

    #[test]
    fn test_box_texture_and_membership() {
        let cuboid = unit_box();
        let p = Vec3::new(0.0, 0.5, 1.0);

        assert!(cuboid.contains_surface_point(p));
        assert!(!cuboid.contains_surface_point(Vec3::new(0.0, 0.5, 0.5)));
        assert!(!cuboid.contains_surface_point(Vec3::new(3.0, 0.5, 1.0)));

        let uv = cuboid.texture_coordinate_at(p);
        assert!((uv - Vec2::new(0.5, 0.75)).length() < 1e-12);
    }
}
