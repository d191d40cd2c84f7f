//! Constructive solid geometry.
//!
//! A [`CsgNode`] combines two primitives with a boolean operation. The
//! combination works purely on entry and exit distances along the ray, so
//! it is exact for convex operands with a real exit (spheres) and an
//! approximation for everything else.

use whitted_core::{CsgOp, MaterialId};
use whitted_math::{Ray, Vec2, Vec3};

use crate::primitive::{Primitive, NO_HIT};

/// Boolean combination of two exclusively owned primitives.
#[derive(Debug, Clone)]
pub struct CsgNode {
    op: CsgOp,
    left: Box<Primitive>,
    right: Box<Primitive>,
}

impl CsgNode {
    pub fn new(op: CsgOp, left: impl Into<Primitive>, right: impl Into<Primitive>) -> Self {
        Self {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    pub fn op(&self) -> CsgOp {
        self.op
    }

    pub fn left(&self) -> &Primitive {
        &self.left
    }

    pub fn right(&self) -> &Primitive {
        &self.right
    }

    pub fn intersect(&self, ray: &Ray) -> f64 {
        let i0 = self.left.intersect(ray);
        let i1 = self.right.intersect(ray);

        match self.op {
            CsgOp::Union => {
                let min = i0.min(i1);
                if min < 0.0 {
                    i0.max(i1)
                } else {
                    min
                }
            }
            CsgOp::Intersect => {
                let o0 = self.left.exit_distance(ray);
                let o1 = self.right.exit_distance(ray);
                overlap(i0, o0, i1, o1)
            }
            CsgOp::IntersectSurfacePoint => {
                let o0 = (self.left.intersect_exit(ray) - ray.origin).length();
                let o1 = (self.right.intersect_exit(ray) - ray.origin).length();
                overlap(i0, o0, i1, o1)
            }
            CsgOp::Difference => {
                let o0 = self.left.exit_distance(ray);
                let o1 = self.right.exit_distance(ray);
                difference(i0, o0, i1, o1)
            }
        }
    }

    /// The larger of the two operands' exit distances.
    pub fn exit_distance(&self, ray: &Ray) -> f64 {
        self.left.exit_distance(ray).max(self.right.exit_distance(ray))
    }

    /// Whichever operand exit point lies farther from the ray origin.
    pub fn intersect_exit(&self, ray: &Ray) -> Vec3 {
        let a = self.left.intersect_exit(ray);
        let b = self.right.intersect_exit(ray);
        if (a - ray.origin).length() > (b - ray.origin).length() {
            a
        } else {
            b
        }
    }

    /// Normal of the operand whose surface holds the point, left first.
    ///
    /// Falls back to +Y when neither operand claims the point.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        if self.left.contains_surface_point(point) {
            self.left.normal_at(point)
        } else if self.right.contains_surface_point(point) {
            self.right.normal_at(point)
        } else {
            Vec3::Y
        }
    }

    pub fn texture_coordinate_at(&self, point: Vec3) -> Vec2 {
        if self.left.contains_surface_point(point) {
            self.left.texture_coordinate_at(point)
        } else if self.right.contains_surface_point(point) {
            self.right.texture_coordinate_at(point)
        } else {
            Vec2::ZERO
        }
    }

    pub fn contains_surface_point(&self, point: Vec3) -> bool {
        self.left.contains_surface_point(point) || self.right.contains_surface_point(point)
    }

    pub fn material(&self) -> MaterialId {
        self.left.material().max(self.right.material())
    }
}

/// Entry into the overlap of two `[entry, exit]` spans, or [`NO_HIT`].
fn overlap(i0: f64, o0: f64, i1: f64, o1: f64) -> f64 {
    if i0 < i1 && o0 > i1 {
        i1
    } else if i1 < i0 && o1 > i0 {
        i0
    } else {
        NO_HIT
    }
}

/// Entry into `left - right`.
///
/// When both operands have a proper span along the ray, the two exact
/// cases are settled first: disjoint spans leave the left operand intact,
/// and a right span covering the left one removes it. Everything else uses
/// the entry/exit heuristic.
fn difference(i0: f64, o0: f64, i1: f64, o1: f64) -> f64 {
    if let (Some((i0, o0)), Some((i1, o1))) = (span(i0, o0), span(i1, o1)) {
        if o1 < i0 || i1 > o0 {
            return i0;
        }
        if i1 <= i0 && o1 >= o0 {
            return NO_HIT;
        }
    }

    if i0 > i1 {
        i0
    } else if o0 > i1 {
        o0
    } else {
        NO_HIT
    }
}

/// `(entry, exit)` when the operand reports a span reaching in front of
/// the ray origin. A tangent hit is a span of length zero.
fn span(entry: f64, exit: f64) -> Option<(f64, f64)> {
    (exit >= entry && exit > 0.0).then_some((entry, exit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cuboid, Sphere};

    fn sphere(x: f64, radius: f64, material: MaterialId) -> Sphere {
        Sphere::new(Vec3::new(x, 0.0, 0.0), radius, material)
    }

    fn along_x() -> Ray {
        Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::X)
    }

    #[test]
    fn test_union_of_disjoint_spheres() {
        let node = CsgNode::new(CsgOp::Union, sphere(-3.0, 1.0, 0), sphere(3.0, 1.0, 1));
        let ray = along_x();

        assert!((node.intersect(&ray) - 6.0).abs() < 1e-9);

        // A ray hitting only the right sphere
        let ray = Ray::new(Vec3::new(3.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!((node.intersect(&ray) - 9.0).abs() < 1e-9);

        // Missing both
        let ray = Ray::new(Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Z);
        assert!(node.intersect(&ray) < 0.0);
    }

    #[test]
    fn test_intersect_of_overlapping_spheres() {
        let node = CsgNode::new(CsgOp::Intersect, sphere(-0.5, 1.0, 0), sphere(0.5, 1.0, 0));

        // Lens spans x in [-0.5, 0.5]
        assert!((node.intersect(&along_x()) - 9.5).abs() < 1e-9);

        let apart = CsgNode::new(CsgOp::Intersect, sphere(-3.0, 1.0, 0), sphere(3.0, 1.0, 0));
        assert!(apart.intersect(&along_x()) < 0.0);
    }

    #[test]
    fn test_intersect_surface_point_matches_intersect_for_unit_rays() {
        let a = CsgNode::new(CsgOp::Intersect, sphere(-0.5, 1.0, 0), sphere(0.5, 1.0, 0));
        let b = CsgNode::new(
            CsgOp::IntersectSurfacePoint,
            sphere(-0.5, 1.0, 0),
            sphere(0.5, 1.0, 0),
        );
        let ray = along_x();

        assert!((a.intersect(&ray) - b.intersect(&ray)).abs() < 1e-9);
    }

    #[test]
    fn test_difference_when_right_contains_left() {
        let node = CsgNode::new(CsgOp::Difference, sphere(0.0, 1.0, 0), sphere(0.0, 2.0, 1));

        for origin in [
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.5, 10.0),
            Vec3::new(7.0, -3.0, 2.0),
        ] {
            let ray = Ray::new(origin, -origin.normalize());
            assert!(node.intersect(&ray) < 0.0, "origin {:?}", origin);
        }
    }

    #[test]
    fn test_difference_with_disjoint_sphere_is_identity() {
        let left = sphere(-3.0, 1.0, 0);
        let node = CsgNode::new(CsgOp::Difference, left.clone(), sphere(3.0, 1.0, 0));

        for ray in [
            along_x(),
            Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_X),
            Ray::new(Vec3::new(-3.0, 0.5, 10.0), Vec3::NEG_Z),
            Ray::new(Vec3::new(3.0, 0.0, 10.0), Vec3::NEG_Z),
        ] {
            let expected = left.intersect(&ray);
            let got = node.intersect(&ray);
            if expected > 0.0 {
                assert!((got - expected).abs() < 1e-9);
            } else {
                assert!(got < 0.0);
            }
        }
    }

    #[test]
    fn test_difference_partial_overlap() {
        // Bite out of the near side: left entry 9, right span [8.5, 9.5]
        let near = CsgNode::new(CsgOp::Difference, sphere(0.0, 1.0, 0), sphere(-1.0, 0.5, 0));
        assert!((near.intersect(&along_x()) - 9.0).abs() < 1e-9);

        // Bite out of the far side: right span [10.5, 11.5] starts after the
        // left entry, so the left exit is reported
        let far = CsgNode::new(CsgOp::Difference, sphere(0.0, 1.0, 0), sphere(1.0, 0.5, 0));
        assert!((far.intersect(&along_x()) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_csg_normal_and_material() {
        let node = CsgNode::new(CsgOp::Union, sphere(-3.0, 1.0, 2), sphere(3.0, 1.0, 5));

        assert_eq!(node.material(), 5);
        assert!((node.normal_at(Vec3::new(-4.0, 0.0, 0.0)) - Vec3::NEG_X).length() < 1e-12);
        assert!((node.normal_at(Vec3::new(4.0, 0.0, 0.0)) - Vec3::X).length() < 1e-12);
        assert_eq!(node.normal_at(Vec3::ZERO), Vec3::Y);
    }

    #[test]
    fn test_nested_csg_membership() {
        let inner = CsgNode::new(CsgOp::Union, sphere(0.0, 1.0, 0), sphere(5.0, 1.0, 0));
        let outer = CsgNode::new(
            CsgOp::Union,
            inner,
            Cuboid::new(Vec3::new(10.0, -1.0, -1.0), Vec3::new(12.0, 1.0, 1.0), 1),
        );

        assert!(outer.contains_surface_point(Vec3::new(6.0, 0.0, 0.0)));
        assert!(outer.contains_surface_point(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(outer.normal_at(Vec3::new(10.0, 0.0, 0.0)), Vec3::NEG_X);
        assert!(!outer.contains_surface_point(Vec3::new(2.5, 0.0, 0.0)));
    }

    #[test]
    fn test_csg_exit() {
        let node = CsgNode::new(CsgOp::Union, sphere(-3.0, 1.0, 0), sphere(3.0, 1.0, 0));
        let ray = along_x();

        assert!((node.exit_distance(&ray) - 14.0).abs() < 1e-9);
        assert!((node.intersect_exit(&ray) - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-9);
    }
}
