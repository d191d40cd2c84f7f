// Re-export glam for convenience
pub use glam::{DVec2, DVec3};

/// Double precision is used throughout: the intersection tolerances are
/// tuned for `f64` and break down in single precision.
pub type Vec3 = DVec3;
pub type Vec2 = DVec2;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Project `v` onto `onto`. Returns zero when `onto` is the zero vector.
#[inline]
pub fn project(v: Vec3, onto: Vec3) -> Vec3 {
    let len_sq = onto.length_squared();
    if len_sq == 0.0 {
        return Vec3::ZERO;
    }
    onto * (v.dot(onto) / len_sq)
}

/// Mirror `v` about the axis `around`: `2 * proj(v, around) - v`.
///
/// The result stays on the same side of the surface as `v`, so reflecting
/// the direction towards the viewer gives the outgoing mirror direction.
#[inline]
pub fn reflect(v: Vec3, around: Vec3) -> Vec3 {
    let p = project(v, around);
    p + (p - v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_project() {
        let p = project(Vec3::new(3.0, 4.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(p, Vec3::new(3.0, 0.0, 0.0));

        // Degenerate axis
        assert_eq!(project(Vec3::ONE, Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_reflect_about_normal() {
        // Viewer direction up and to the left, surface normal +Y
        let v = Vec3::new(-1.0, 1.0, 0.0);
        let r = reflect(v, Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_reflect_about_zero_axis() {
        // No axis to mirror around: the vector flips
        let v = Vec3::new(0.3, -0.2, 0.9);
        assert_eq!(reflect(v, Vec3::ZERO), -v);
    }
}
