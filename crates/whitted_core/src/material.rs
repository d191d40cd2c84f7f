//! Surface materials for Phong shading.

use std::sync::Arc;

use whitted_math::{Vec2, Vec3};

use crate::Texture;

/// Color type alias (RGB, nominally 0-1 but unclamped during shading)
pub type Color = Vec3;

/// Index of a material in the scene's material table.
pub type MaterialId = usize;

/// Phong material with optional diffuse texture, reflection and refraction.
///
/// Materials are immutable once added to a scene. The texture is shared with
/// other materials that reference the same file.
#[derive(Debug, Clone)]
pub struct Material {
    texture: Option<Arc<Texture>>,
    diffuse: Color,
    specular: Color,
    specular_exponent: f64,
    reflection: f64,
    refraction_index: f64,
    opacity: f64,
}

impl Material {
    pub fn new(diffuse: Color) -> Self {
        Self {
            diffuse,
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set the specular highlight color and Phong exponent.
    pub fn with_specular(mut self, specular: Color, exponent: f64) -> Self {
        self.specular = specular;
        self.specular_exponent = exponent;
        self
    }

    pub fn with_reflection(mut self, reflection: f64) -> Self {
        self.reflection = reflection;
        self
    }

    /// Set the refraction index and opacity. Fully opaque materials (opacity
    /// 1) never spawn refracted rays.
    pub fn with_refraction(mut self, refraction_index: f64, opacity: f64) -> Self {
        self.refraction_index = refraction_index;
        self.opacity = opacity;
        self
    }

    /// Diffuse color at a texture coordinate.
    ///
    /// Without a texture this is the flat diffuse color.
    pub fn diffuse_at(&self, uv: Vec2) -> Color {
        match &self.texture {
            Some(texture) => texture.sample_wrapped(uv),
            None => self.diffuse,
        }
    }

    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }

    pub fn diffuse(&self) -> Color {
        self.diffuse
    }

    pub fn specular(&self) -> Color {
        self.specular
    }

    pub fn specular_exponent(&self) -> f64 {
        self.specular_exponent
    }

    pub fn reflection(&self) -> f64 {
        self.reflection
    }

    pub fn refraction_index(&self) -> f64 {
        self.refraction_index
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }
}

impl Default for Material {
    /// Opaque light gray with no highlight.
    fn default() -> Self {
        Self {
            texture: None,
            diffuse: Color::splat(0.8),
            specular: Color::ZERO,
            specular_exponent: 1.0,
            reflection: 0.0,
            refraction_index: 1.0,
            opacity: 1.0,
        }
    }
}
