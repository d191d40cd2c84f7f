//! Whitted Renderer - recursive ray tracing.
//!
//! A classic Whitted-style ray tracer: rays are shot from the camera, the
//! nearest surface is shaded with the Phong model, and mirror reflection and
//! refraction are followed recursively up to a fixed depth.
//!
//! Scenes are built from spheres, triangles, axis-aligned boxes and triangle
//! meshes, combined with CSG union, intersection and difference.

mod bucket;
mod csg;
mod cuboid;
mod mesh;
mod primitive;
mod renderer;
mod scene;
mod sphere;
mod tracer;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use csg::CsgNode;
pub use cuboid::Cuboid;
pub use mesh::{MeshHitMode, TriangleMesh};
pub use primitive::{Primitive, EPSILON, MIN_TRIANGLE_DISTANCE, NO_HIT};
pub use renderer::{
    render, render_parallel, render_pixel, render_scanline, render_sequential, ImageBuffer,
    RenderConfig,
};
pub use scene::{Scene, SceneError, SceneResult};
pub use sphere::Sphere;
pub use tracer::{
    is_in_shadow, nearest_hit, ray_trace, shade, trace, CONTRIBUTION_EPSILON, HIT_EPSILON,
    MAX_DEPTH, SHADOW_EPSILON,
};
pub use triangle::Triangle;

/// Re-export the scene-description and math types used in this crate's API
pub use whitted_core::{Camera, Color, CsgOp, Light, Material, MaterialId};
pub use whitted_math::{Ray, Vec2, Vec3};
