//! Whitted Core - scene description for the Whitted ray tracer.
//!
//! This crate provides:
//!
//! - **Scene data types**: `Camera`, `Light`, `Material`, `Texture`
//! - **Mesh files**: vertex/triangle lists rescaled into a bounding box
//! - **Scene files**: line-oriented `.rt` parsing into a `SceneDescription`
//!
//! Geometry and shading live in `whitted_renderer`; this crate only knows
//! how scenes are described and loaded.
//!
//! # Example
//!
//! ```ignore
//! use whitted_core::scene_file::load_scene_file;
//!
//! let description = load_scene_file("scenes/spheres.rt")?;
//! println!("{} materials, {} objects",
//!     description.materials.len(),
//!     description.object_count());
//! ```

pub mod camera;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene_file;
pub mod texture;

// Re-export commonly used types
pub use camera::{Camera, FarPlane};
pub use light::Light;
pub use material::{Color, Material, MaterialId};
pub use mesh::{MeshData, MeshError};
pub use scene_file::{load_scene_file, CsgOp, ObjectDesc, SceneDescription, SceneFileError};
pub use texture::{Texture, TextureCache, TextureError};
