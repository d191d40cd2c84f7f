//! The primitive enum and the intersection contract shared by all shapes.
//!
//! Distances are parametric along the ray (`origin + t * direction`) and
//! negative values mean "no hit". Callers decide which positive distances
//! they accept: the tracer wants `t > 0.001`, shadow rays `t > 0.1`.

use whitted_core::MaterialId;
use whitted_math::{Ray, Vec2, Vec3};

use crate::{CsgNode, Cuboid, Sphere, Triangle, TriangleMesh};

/// Tolerance for discriminants, box faces and surface membership.
pub const EPSILON: f64 = 1e-3;

/// Triangle hits closer than this are rejected as self-intersections.
pub const MIN_TRIANGLE_DISTANCE: f64 = 1e-4;

/// Sentinel distance for a ray that misses.
pub const NO_HIT: f64 = -1.0;

/// Any object that can be placed in a scene.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
    Cuboid(Cuboid),
    Mesh(TriangleMesh),
    Csg(CsgNode),
}

impl Primitive {
    /// Distance to where `ray` enters the object, negative on a miss.
    pub fn intersect(&self, ray: &Ray) -> f64 {
        match self {
            Self::Sphere(s) => s.intersect(ray),
            Self::Triangle(t) => t.intersect(ray),
            Self::Cuboid(b) => b.intersect(ray),
            Self::Mesh(m) => m.intersect(ray),
            Self::Csg(c) => c.intersect(ray),
        }
    }

    /// Distance to where `ray` leaves the object.
    ///
    /// Only spheres define an exit; flat and box-like shapes report `0.0`.
    pub fn exit_distance(&self, ray: &Ray) -> f64 {
        match self {
            Self::Sphere(s) => s.exit_distance(ray),
            Self::Triangle(_) | Self::Cuboid(_) | Self::Mesh(_) => 0.0,
            Self::Csg(c) => c.exit_distance(ray),
        }
    }

    /// Point where `ray` leaves the object. Shapes without an exit return
    /// the ray origin.
    pub fn intersect_exit(&self, ray: &Ray) -> Vec3 {
        match self {
            Self::Sphere(s) => s.intersect_exit(ray),
            Self::Triangle(_) | Self::Cuboid(_) | Self::Mesh(_) => ray.origin,
            Self::Csg(c) => c.intersect_exit(ray),
        }
    }

    /// Surface normal at a point on the object. Not necessarily unit length.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            Self::Sphere(s) => s.normal_at(point),
            Self::Triangle(t) => t.normal_at(point),
            Self::Cuboid(b) => b.normal_at(point),
            Self::Mesh(m) => m.normal_at(point),
            Self::Csg(c) => c.normal_at(point),
        }
    }

    pub fn texture_coordinate_at(&self, point: Vec3) -> Vec2 {
        match self {
            Self::Sphere(s) => s.texture_coordinate_at(point),
            Self::Triangle(t) => t.texture_coordinate_at(point),
            Self::Cuboid(b) => b.texture_coordinate_at(point),
            Self::Mesh(_) => Vec2::ZERO,
            Self::Csg(c) => c.texture_coordinate_at(point),
        }
    }

    /// True if `point` lies on the object's boundary, within [`EPSILON`].
    pub fn contains_surface_point(&self, point: Vec3) -> bool {
        match self {
            Self::Sphere(s) => s.contains_surface_point(point),
            Self::Triangle(t) => t.contains_surface_point(point),
            Self::Cuboid(b) => b.contains_surface_point(point),
            Self::Mesh(m) => m.contains_surface_point(point),
            Self::Csg(c) => c.contains_surface_point(point),
        }
    }

    /// Material used to shade this object. CSG nodes use the larger of
    /// their operands' material ids.
    pub fn material(&self) -> MaterialId {
        match self {
            Self::Sphere(s) => s.material(),
            Self::Triangle(t) => t.material(),
            Self::Cuboid(b) => b.material(),
            Self::Mesh(m) => m.material(),
            Self::Csg(c) => c.material(),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Self::Sphere(s)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Self::Triangle(t)
    }
}

impl From<Cuboid> for Primitive {
    fn from(b: Cuboid) -> Self {
        Self::Cuboid(b)
    }
}

impl From<TriangleMesh> for Primitive {
    fn from(m: TriangleMesh) -> Self {
        Self::Mesh(m)
    }
}

impl From<CsgNode> for Primitive {
    fn from(c: CsgNode) -> Self {
        Self::Csg(c)
    }
}
