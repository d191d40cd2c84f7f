//! Triangle mesh primitive.
//!
//! A mesh lives inside an axis-aligned box. Rays are first tested against
//! the box; only rays that enter it scan the triangle list.

use serde::{Deserialize, Serialize};
use whitted_core::{MaterialId, MeshData};
use whitted_math::{Aabb, Ray, Vec3};

use crate::primitive::{EPSILON, NO_HIT};
use crate::triangle;

/// Which triangle a mesh reports when a ray crosses several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshHitMode {
    /// The first triangle in file order that the ray hits
    #[default]
    FirstHit,
    /// The closest triangle along the ray
    Nearest,
}

/// An indexed triangle mesh with a bounding box.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    bounds: Aabb,
    positions: Vec<Vec3>,
    triangles: Vec<[usize; 3]>,
    material: MaterialId,
    hit_mode: MeshHitMode,
}

impl TriangleMesh {
    /// Build a mesh whose vertices are rescaled to span the box between
    /// `min` and `max`.
    pub fn new(mut data: MeshData, min: Vec3, max: Vec3, material: MaterialId) -> Self {
        let bounds = Aabb::from_points(min, max);
        data.fit_to(&bounds);

        // Drop faces that reference missing vertices
        let count = data.positions.len();
        data.triangles.retain(|t| t.iter().all(|&i| i < count));

        Self {
            bounds,
            positions: data.positions,
            triangles: data.triangles,
            material,
            hit_mode: MeshHitMode::default(),
        }
    }

    pub fn with_hit_mode(mut self, hit_mode: MeshHitMode) -> Self {
        self.hit_mode = hit_mode;
        self
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn hit_mode(&self) -> MeshHitMode {
        self.hit_mode
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    fn faces(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles
            .iter()
            .map(|&[a, b, c]| [self.positions[a], self.positions[b], self.positions[c]])
    }

    pub fn intersect(&self, ray: &Ray) -> f64 {
        if self.bounds.entry_distance(ray, EPSILON).is_none() {
            return NO_HIT;
        }

        let hit = match self.hit_mode {
            MeshHitMode::FirstHit => self
                .faces()
                .find_map(|face| triangle::hit_distance(&face, ray)),
            MeshHitMode::Nearest => self
                .faces()
                .filter_map(|face| triangle::hit_distance(&face, ray))
                .min_by(f64::total_cmp),
        };

        hit.unwrap_or(NO_HIT)
    }

    /// In `FirstHit` mode the normal comes from the bounding box faces. In
    /// `Nearest` mode it is the face normal of the triangle under the point,
    /// falling back to the box.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        if self.hit_mode == MeshHitMode::Nearest {
            if let Some(face) = self
                .faces()
                .find(|face| triangle::contains_point(face, point))
            {
                return triangle::face_normal(&face);
            }
        }
        self.bounds.face_normal(point, EPSILON)
    }

    pub fn contains_surface_point(&self, point: Vec3) -> bool {
        self.bounds.contains_point(point, EPSILON)
            && self
                .faces()
                .any(|face| triangle::contains_point(&face, point))
    }
}
