//! Runtime scene: everything the tracer queries while rendering.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use whitted_core::{
    load_scene_file, Camera, Color, Light, Material, MaterialId, MeshData, MeshError,
    ObjectDesc, SceneDescription, SceneFileError, Texture, TextureCache, TextureError,
};
use whitted_math::Ray;

use crate::{CsgNode, Cuboid, MeshHitMode, Primitive, Sphere, Triangle, TriangleMesh};

/// Rays closer than this to parallel with the far plane show the flat
/// background color.
const FAR_PLANE_EPSILON: f64 = 1e-10;

/// Errors that can occur while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Object uses material {material}, but the scene has {count} materials")]
    InvalidMaterial { material: MaterialId, count: usize },

    #[error(transparent)]
    SceneFile(#[from] SceneFileError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Camera, lights, materials and objects of a renderable scene.
///
/// Objects and lights are scanned linearly in insertion order. The scene is
/// immutable while rendering, so it can be shared across threads.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: Option<Camera>,
    background: Color,
    background_image: Option<Arc<Texture>>,
    ambient: Color,
    materials: Vec<Material>,
    objects: Vec<Primitive>,
    lights: Vec<Light>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene with a black background and no ambient light.
    pub fn new() -> Self {
        Self {
            camera: None,
            background: Color::ZERO,
            background_image: None,
            ambient: Color::ZERO,
            materials: Vec::new(),
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Load a scene file and everything it references.
    pub fn load(path: impl AsRef<Path>, hit_mode: MeshHitMode) -> SceneResult<Self> {
        let description = load_scene_file(path)?;
        Self::from_description(&description, hit_mode)
    }

    /// Build a scene from a parsed description, loading textures, the
    /// background image and mesh files.
    pub fn from_description(desc: &SceneDescription, hit_mode: MeshHitMode) -> SceneResult<Self> {
        let mut textures = TextureCache::new();
        let mut scene = Scene::new();

        scene.camera = desc.camera.clone();
        scene.background = desc.background;
        scene.ambient = desc.ambient;
        if let Some(path) = &desc.background_image {
            scene.background_image = Some(textures.load(&path.to_string_lossy())?);
        }

        for m in &desc.materials {
            let mut material = Material::new(m.diffuse)
                .with_specular(m.specular, m.specular_exponent)
                .with_reflection(m.reflection)
                .with_refraction(m.refraction_index, m.opacity);
            if let Some(path) = &m.texture {
                material = material.with_texture(textures.load(&path.to_string_lossy())?);
            }
            scene.add_material(material);
        }

        for light in &desc.lights {
            scene.add_light(*light);
        }

        for object in &desc.objects {
            let primitive = build_primitive(object, hit_mode)?;
            scene.add_object(primitive)?;
        }

        log::debug!(
            "Scene ready: {} objects, {} lights, {} materials, {} textures",
            scene.object_count(),
            scene.light_count(),
            scene.materials.len(),
            textures.len()
        );

        Ok(scene)
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn set_background_image(&mut self, image: Arc<Texture>) {
        self.background_image = Some(image);
    }

    pub fn set_ambient_light(&mut self, color: Color) {
        self.ambient = color;
    }

    /// Append a material and return its id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Append an object. Every material it uses must already exist.
    pub fn add_object(&mut self, object: impl Into<Primitive>) -> SceneResult<()> {
        let object = object.into();

        // CSG nodes report their largest material id
        let material = object.material();
        if material >= self.materials.len() {
            return Err(SceneError::InvalidMaterial {
                material,
                count: self.materials.len(),
            });
        }

        self.objects.push(object);
        Ok(())
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn ambient_light(&self) -> Color {
        self.ambient
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn object(&self, index: usize) -> Option<&Primitive> {
        self.objects.get(index)
    }

    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn light(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    /// Mutable access for moving or recoloring a light between frames.
    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Color seen by a ray that hits nothing.
    ///
    /// With a background image and a camera, the ray is intersected with the
    /// camera's far plane and the image is looked up where it lands. Rays
    /// that run parallel to the plane, point away from it, or land outside
    /// the image get the flat background color.
    pub fn background_color(&self, ray: &Ray) -> Color {
        let (Some(image), Some(camera)) = (&self.background_image, &self.camera) else {
            return self.background;
        };

        let plane = camera.far_plane();
        let divisor = ray.direction.dot(plane.normal);
        if divisor > 0.0 || -divisor < FAR_PLANE_EPSILON {
            return self.background;
        }

        let distance = (plane.origin - ray.origin).dot(plane.normal) / divisor;
        if distance < 0.0 {
            return self.background;
        }

        let offset = ray.at(distance) - plane.origin;
        let su = offset.dot(plane.u) / plane.u.length_squared();
        let sv = offset.dot(plane.v) / plane.v.length_squared();
        if !(0.0..=1.0).contains(&su) || !(0.0..=1.0).contains(&sv) {
            return self.background;
        }

        image.sample_nearest(su, sv)
    }
}

fn build_primitive(desc: &ObjectDesc, hit_mode: MeshHitMode) -> SceneResult<Primitive> {
    let primitive = match desc {
        ObjectDesc::Sphere {
            material,
            center,
            radius,
        } => Sphere::new(*center, *radius, *material).into(),
        ObjectDesc::Triangle {
            material,
            vertices,
            tex_coords,
        } => Triangle::new(*vertices, *tex_coords, *material).into(),
        ObjectDesc::Cuboid { material, min, max } => Cuboid::new(*min, *max, *material).into(),
        ObjectDesc::Mesh {
            material,
            min,
            max,
            path,
        } => {
            let data = MeshData::load(path)?;
            TriangleMesh::new(data, *min, *max, *material)
                .with_hit_mode(hit_mode)
                .into()
        }
        ObjectDesc::Csg { op, left, right } => CsgNode::new(
            *op,
            build_primitive(left, hit_mode)?,
            build_primitive(right, hit_mode)?,
        )
        .into(),
    };

    Ok(primitive)
}
