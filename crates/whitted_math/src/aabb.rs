use crate::{Interval, Ray, Vec2, Vec3};

/// Axis-aligned box given by two opposite corners.
///
/// Used both as a solid (the box primitive) and as the bounding volume that
/// gates triangle mesh intersection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// For each axis, the two remaining axes in (u, v) order.
const OTHER_AXES: [(usize, usize); 3] = [(1, 2), (0, 2), (0, 1)];

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points.
    ///
    /// The corners may be given in any order; each axis is sorted.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self { x, y, z }
    }

    /// The smallest box holding every point. Returns `None` for an empty slice.
    pub fn enclosing(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self::from_points(min, max))
    }

    /// Corner with the smallest coordinates.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Corner with the largest coordinates.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    /// True if `p` lies inside the box grown by `tolerance` on every side.
    pub fn contains_point(&self, p: Vec3, tolerance: f64) -> bool {
        (0..3).all(|axis| {
            let slab = self.axis_interval(axis);
            p[axis] >= slab.min - tolerance && p[axis] <= slab.max + tolerance
        })
    }

    /// Distance along `ray` to the face through which it enters the box.
    ///
    /// Axes are tried in x, y, z order. An axis is skipped when the ray is
    /// nearly parallel to its slabs (`|component| <= eps`). For the others
    /// the near face is the one facing the ray; the first face whose hit
    /// distance exceeds `eps` and whose hit point lies within the face's
    /// extent wins. Rays starting inside the box see no near face in front
    /// of them and report no entry.
    pub fn entry_distance(&self, ray: &Ray, eps: f64) -> Option<f64> {
        for (axis, &(a, b)) in OTHER_AXES.iter().enumerate() {
            let d = ray.direction[axis];
            if d.abs() <= eps {
                continue;
            }

            let slab = self.axis_interval(axis);
            let plane = if d > 0.0 { slab.min } else { slab.max };
            let t = (plane - ray.origin[axis]) / d;
            if t <= eps {
                continue;
            }

            let p = ray.at(t);
            if self.axis_interval(a).contains(p[a]) && self.axis_interval(b).contains(p[b]) {
                return Some(t);
            }
        }
        None
    }

    /// Index of the face `p` lies on, within `eps`.
    ///
    /// Faces are checked in the order -x, +x, -y, +y, -z, +z and encoded as
    /// `2 * axis + (0 for min, 1 for max)`.
    fn face_of(&self, p: Vec3, eps: f64) -> Option<usize> {
        (0..3)
            .flat_map(|axis| {
                let slab = self.axis_interval(axis);
                [(2 * axis, slab.min), (2 * axis + 1, slab.max)]
                    .into_iter()
                    .map(move |(face, plane)| (face, axis, plane))
            })
            .find(|&(_, axis, plane)| (p[axis] - plane).abs() < eps)
            .map(|(face, _, _)| face)
    }

    /// Outward axis-aligned normal of the face `p` lies on.
    ///
    /// Returns the zero vector when `p` is on none of the faces.
    pub fn face_normal(&self, p: Vec3, eps: f64) -> Vec3 {
        match self.face_of(p, eps) {
            Some(0) => Vec3::NEG_X,
            Some(1) => Vec3::X,
            Some(2) => Vec3::NEG_Y,
            Some(3) => Vec3::Y,
            Some(4) => Vec3::NEG_Z,
            Some(_) => Vec3::Z,
            None => Vec3::ZERO,
        }
    }

    /// Planar (u, v) coordinates of `p` across the face it lies on.
    ///
    /// `u` runs along the lower-numbered remaining axis and `v` along the
    /// other, both from 0 at the min corner to 1 at the max corner.
    pub fn face_coordinates(&self, p: Vec3, eps: f64) -> Option<Vec2> {
        let axis = self.face_of(p, eps)? / 2;
        let (a, b) = OTHER_AXES[axis];
        Some(Vec2::new(
            self.axis_interval(a).fraction(p[a]),
            self.axis_interval(b).fraction(p[b]),
        ))
    }

    /// True if `p` lies on one of the box's faces, within `eps`.
    pub fn on_surface(&self, p: Vec3, eps: f64) -> bool {
        self.face_of(p, eps).is_some() && self.contains_point(p, eps)
    }
}
