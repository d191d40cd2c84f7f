//! Texture loading and caching for materials and background images.
//!
//! Images are decoded with the `image` crate and kept as floating point RGB.
//! Rows are stored bottom-up, so `v = 0` addresses the lowest row of the
//! picture and `v` grows upward like the camera's image plane.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use whitted_math::Vec2;

use crate::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded RGB image with channels in the 0-1 range.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data, row-major with row 0 at the bottom of the image
    pub pixels: Vec<Color>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a texture from bottom-up pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self::new(1, 1, vec![color], "<solid>")
    }

    /// Material lookup: `floor(u * (w - 1))` and `floor(v * (h - 1))`,
    /// wrapped into range so any coordinate maps to a pixel.
    pub fn sample_wrapped(&self, uv: Vec2) -> Color {
        let w = self.width as i64;
        let h = self.height as i64;
        let x = (uv.x * (w - 1) as f64).floor() as i64;
        let y = (uv.y * (h - 1) as f64).floor() as i64;

        self.pixel(x.rem_euclid(w.max(1)) as u32, y.rem_euclid(h.max(1)) as u32)
    }

    /// Nearest-neighbour lookup at normalized coordinates in [0, 1].
    ///
    /// Coordinates outside the unit square are clamped to the border.
    pub fn sample_nearest(&self, su: f64, sv: f64) -> Color {
        let x = (su.clamp(0.0, 1.0) * self.width as f64).floor() as u32;
        let y = (sv.clamp(0.0, 1.0) * self.height as f64).floor() as u32;

        self.pixel(
            x.min(self.width.saturating_sub(1)),
            y.min(self.height.saturating_sub(1)),
        )
    }

    /// Pixel at integer coordinates, with `y = 0` at the bottom row.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels.get(idx).copied().unwrap_or(Color::ZERO)
    }
}

/// Cache for loaded textures.
///
/// A file referenced by several materials is decoded once and shared.
#[derive(Debug, Default)]
pub struct TextureCache {
    /// Cached textures by the path they were requested with
    textures: HashMap<String, Arc<Texture>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a texture from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let texture = Arc::new(load_texture_file(Path::new(path))?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{})",
            path,
            texture.width,
            texture.height
        );

        Ok(texture)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Decode an image file into a bottom-up texture.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path).map_err(|source| TextureError::Load {
        path: path.display().to_string(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty(path.display().to_string()));
    }

    // Image rows come top-down; flip them so row 0 is the bottom
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in (0..height).rev() {
        for x in 0..width {
            let p = rgb.get_pixel(x, y);
            pixels.push(Color::new(
                p[0] as f64 / 255.0,
                p[1] as f64 / 255.0,
                p[2] as f64 / 255.0,
            ));
        }
    }

    Ok(Texture::new(
        width,
        height,
        pixels,
        path.to_string_lossy().to_string(),
    ))
}
