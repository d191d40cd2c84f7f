//! Triangle primitive.
//!
//! Triangles are one-sided: a ray only hits the face whose vertices appear
//! counter-clockwise from the ray origin. The same test is reused by
//! [`TriangleMesh`](crate::TriangleMesh) for each of its faces.

use whitted_core::MaterialId;
use whitted_math::{Ray, Vec2, Vec3};

use crate::primitive::{EPSILON, MIN_TRIANGLE_DISTANCE, NO_HIT};

/// A textured triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Vec3; 3],
    /// Per-vertex texture coordinates
    tex_coords: [Vec2; 3],
    material: MaterialId,
}

impl Triangle {
    pub fn new(vertices: [Vec3; 3], tex_coords: [Vec2; 3], material: MaterialId) -> Self {
        Self {
            vertices,
            tex_coords,
            material,
        }
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn intersect(&self, ray: &Ray) -> f64 {
        hit_distance(&self.vertices, ray).unwrap_or(NO_HIT)
    }

    /// Unnormalized face normal `(v1 - v0) x (v2 - v0)`.
    pub fn normal_at(&self, _point: Vec3) -> Vec3 {
        face_normal(&self.vertices)
    }

    /// Texture coordinates interpolated from the vertices.
    pub fn texture_coordinate_at(&self, point: Vec3) -> Vec2 {
        match barycentric(&self.vertices, point) {
            Some(w) => {
                self.tex_coords[0] * w.x + self.tex_coords[1] * w.y + self.tex_coords[2] * w.z
            }
            None => self.tex_coords[0],
        }
    }

    pub fn contains_surface_point(&self, point: Vec3) -> bool {
        contains_point(&self.vertices, point)
    }
}

pub(crate) fn face_normal(v: &[Vec3; 3]) -> Vec3 {
    (v[1] - v[0]).cross(v[2] - v[0])
}

/// Distance at which `ray` hits the front face of the triangle.
///
/// The plane hit must lie at least [`MIN_TRIANGLE_DISTANCE`] along the ray
/// and strictly inside all three edges.
pub(crate) fn hit_distance(v: &[Vec3; 3], ray: &Ray) -> Option<f64> {
    let e0 = v[1] - v[0];
    let e1 = v[2] - v[1];
    let e2 = v[0] - v[2];
    let normal = e0.cross(e1);

    let divisor = ray.direction.dot(normal);
    if divisor > -EPSILON {
        return None;
    }
    let distance = (v[0] - ray.origin).dot(normal) / divisor;
    if distance < MIN_TRIANGLE_DISTANCE {
        return None;
    }

    let p = ray.at(distance);
    let n = normal.normalize_or_zero();
    let inside = [(e0, v[0]), (e1, v[1]), (e2, v[2])]
        .iter()
        .all(|&(edge, start)| 0.5 * n.dot(edge.cross(p - start)) > 0.0);

    inside.then_some(distance)
}

/// Barycentric weights of `p` projected onto the triangle's plane.
///
/// Returns `None` for degenerate triangles.
pub(crate) fn barycentric(v: &[Vec3; 3], p: Vec3) -> Option<Vec3> {
    let n = face_normal(v);
    let nn = n.length_squared();
    if nn == 0.0 {
        return None;
    }

    let w0 = n.dot((v[2] - v[1]).cross(p - v[1])) / nn;
    let w1 = n.dot((v[0] - v[2]).cross(p - v[2])) / nn;
    Some(Vec3::new(w0, w1, 1.0 - w0 - w1))
}

/// True if `p` is within [`EPSILON`] of the plane and inside the edges.
pub(crate) fn contains_point(v: &[Vec3; 3], p: Vec3) -> bool {
    let n = face_normal(v).normalize_or_zero();
    if n == Vec3::ZERO || n.dot(p - v[0]).abs() >= EPSILON {
        return false;
    }

    barycentric(v, p).is_some_and(|w| w.min_element() >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit right triangle in the z = -2 plane, facing +z.
    fn facing_camera() -> Triangle {
        Triangle::new(
            [
                Vec3::new(0.0, 0.0, -2.0),
                Vec3::new(1.0, 0.0, -2.0),
                Vec3::new(0.0, 1.0, -2.0),
            ],
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
            0,
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 0.0), Vec3::NEG_Z);

        assert!((tri.intersect(&ray) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_back_face_culled() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3::new(0.25, 0.25, -4.0), Vec3::Z);

        assert!(tri.intersect(&ray) < 0.0);
    }

    #[test]
    fn test_triangle_outside_edges() {
        let tri = facing_camera();

        let ray = Ray::new(Vec3::new(0.75, 0.75, 0.0), Vec3::NEG_Z);
        assert!(tri.intersect(&ray) < 0.0);

        // Exactly on an edge counts as outside
        let ray = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::NEG_Z);
        assert!(tri.intersect(&ray) < 0.0);
    }

    #[test]
    fn test_triangle_too_close() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3::new(0.25, 0.25, -2.00001), Vec3::NEG_Z);

        assert!(tri.intersect(&ray) < 0.0);
    }

    #[test]
    fn test_triangle_normal_unnormalized() {
        let tri = Triangle::new(
            [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0)],
            [Vec2::ZERO; 3],
            0,
        );

        assert_eq!(tri.normal_at(Vec3::ZERO), Vec3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn test_triangle_texture_interpolation() {
        let tri = facing_camera();

        let uv = tri.texture_coordinate_at(Vec3::new(0.25, 0.5, -2.0));
        assert!((uv - Vec2::new(0.25, 0.5)).length() < 1e-12);

        let uv = tri.texture_coordinate_at(Vec3::new(1.0, 0.0, -2.0));
        assert!((uv - Vec2::new(1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_triangle_membership() {
        let tri = facing_camera();

        assert!(tri.contains_surface_point(Vec3::new(0.2, 0.2, -2.0)));
        assert!(tri.contains_surface_point(Vec3::new(0.2, 0.2, -2.0005)));
        assert!(!tri.contains_surface_point(Vec3::new(0.2, 0.2, -2.01)));
        assert!(!tri.contains_surface_point(Vec3::new(0.8, 0.8, -2.0)));
    }
}
