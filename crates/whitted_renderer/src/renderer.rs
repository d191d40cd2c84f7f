//! Image drivers: per-pixel sampling, scanlines, and whole frames.
//!
//! A pixel is traced through its lower-left corner, or jittered inside the
//! pixel when several samples are requested. Jitter is seeded per pixel, so
//! the sequential and parallel drivers produce identical images.

use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use whitted_core::{Camera, Color};
use whitted_math::Interval;

use crate::bucket::{generate_buckets, render_bucket, DEFAULT_BUCKET_SIZE};
use crate::{trace, MeshHitMode, Scene};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel; 1 traces a single ray through the pixel corner
    pub samples_per_pixel: u32,
    /// Render buckets on the rayon thread pool
    pub parallel: bool,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Seed for sample jitter
    pub seed: u64,
    /// Triangle selection for mesh objects
    pub mesh_hit_mode: MeshHitMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 1,
            parallel: true,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: 0,
            mesh_hit_mode: MeshHitMode::FirstHit,
        }
    }
}

/// Deterministic RNG for one pixel.
fn pixel_rng(seed: u64, x: u32, y: u32) -> StdRng {
    let key = ((y as u64) << 32) | x as u64;
    StdRng::seed_from_u64(seed ^ key.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Render a single pixel, averaging `samples_per_pixel` rays.
pub fn render_pixel(scene: &Scene, camera: &Camera, x: u32, y: u32, config: &RenderConfig) -> Color {
    let eye = camera.eye();

    if config.samples_per_pixel <= 1 {
        return trace(scene, eye, camera.ray_direction(x as f64, y as f64));
    }

    let mut rng = pixel_rng(config.seed, x, y);
    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let sx = x as f64 + rng.gen::<f64>();
        let sy = y as f64 + rng.gen::<f64>();
        pixel_color += trace(scene, eye, camera.ray_direction(sx, sy));
    }

    pixel_color / config.samples_per_pixel as f64
}

/// Render one row of pixels, `y = 0` being the bottom row.
pub fn render_scanline(scene: &Scene, camera: &Camera, y: u32, config: &RenderConfig) -> Vec<Color> {
    (0..camera.screen_width())
        .map(|x| render_pixel(scene, camera, x, y, config))
        .collect()
}

/// Render the full frame one scanline at a time, bottom to top.
pub fn render_sequential(scene: &Scene, camera: &Camera, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.screen_width(), camera.screen_height());

    for y in 0..image.height {
        let row = render_scanline(scene, camera, y, config);
        for (x, color) in row.into_iter().enumerate() {
            image.set(x as u32, y, color);
        }
        log::debug!("Rendered scanline {}/{}", y + 1, image.height);
    }

    image
}

/// Render the full frame as buckets on the rayon thread pool.
pub fn render_parallel(scene: &Scene, camera: &Camera, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.screen_width(), camera.screen_height());
    let buckets = generate_buckets(image.width, image.height, config.bucket_size);
    let total = buckets.len();

    let results: Vec<_> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, scene, camera, config);
            log::debug!("Rendered bucket {}/{}", bucket.index + 1, total);
            result
        })
        .collect();

    for result in results {
        let bucket = result.bucket;
        for (i, color) in result.pixels.into_iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            image.set(bucket.x + local_x, bucket.y + local_y, color);
        }
    }

    image
}

/// Render the full frame with the driver selected by `config.parallel`.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();

    let image = if config.parallel {
        render_parallel(scene, camera, config)
    } else {
        render_sequential(scene, camera, config)
    };

    log::info!(
        "Rendered {}x{} ({} spp, {}) in {:.2?}",
        image.width,
        image.height,
        config.samples_per_pixel.max(1),
        if config.parallel { "parallel" } else { "sequential" },
        start.elapsed()
    );

    image
}

/// Clamp a channel to [0, 1] and scale to a byte.
#[inline]
fn to_byte(channel: f64) -> u8 {
    (255.0 * Interval::UNIT.clamp(channel)) as u8
}

/// Render output, stored bottom row first like the camera's screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y), `y = 0` being the bottom row.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Convert to an 8-bit image with the top row first, clamping channels.
    pub fn to_rgb8(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, row| {
            let c = self.get(x, self.height - 1 - row);
            image::Rgb([to_byte(c.x), to_byte(c.y), to_byte(c.z)])
        })
    }

    /// Save as an image file; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.to_rgb8().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use whitted_core::{Light, Material};
    use whitted_math::Vec3;

    fn small_scene() -> (Scene, Camera) {
        let mut scene = Scene::new();
        scene.set_background(Color::new(0.0, 0.0, 0.3));
        scene.set_ambient_light(Color::splat(0.1));
        let red = scene.add_material(
            Material::new(Color::new(1.0, 0.0, 0.0)).with_specular(Color::ONE, 20.0),
        );
        scene.add_object(Sphere::new(Vec3::ZERO, 1.0, red)).unwrap();
        scene.add_light(Light::new(Vec3::new(2.0, 3.0, 5.0), Color::ONE));

        let camera = Camera::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            60.0,
            1.0,
            100.0,
            24,
            16,
        );
        (scene, camera)
    }

    #[test]
    fn test_render_config_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "samples_per_pixel": 4, "mesh_hit_mode": "nearest" }"#)
                .unwrap();

        assert_eq!(config.samples_per_pixel, 4);
        assert_eq!(config.mesh_hit_mode, MeshHitMode::Nearest);
        // Missing fields keep their defaults
        assert!(config.parallel);
        assert_eq!(config.bucket_size, DEFAULT_BUCKET_SIZE);
    }

    #[test]
    fn test_render_pixel_center_hits_sphere() {
        let (scene, camera) = small_scene();
        let config = RenderConfig::default();

        let center = render_pixel(&scene, &camera, 12, 8, &config);
        assert!(center.x > center.z);

        let corner = render_pixel(&scene, &camera, 0, 0, &config);
        assert_eq!(corner, Color::new(0.0, 0.0, 0.3));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (scene, camera) = small_scene();
        let config = RenderConfig {
            samples_per_pixel: 3,
            bucket_size: 5,
            seed: 7,
            ..Default::default()
        };

        let sequential = render_sequential(&scene, &camera, &config);
        let parallel = render_parallel(&scene, &camera, &config);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_render_scanline_width() {
        let (scene, camera) = small_scene();
        let row = render_scanline(&scene, &camera, 3, &RenderConfig::default());
        assert_eq!(row.len(), 24);
    }

    #[test]
    fn test_to_rgb8_flips_and_clamps() {
        let mut image = ImageBuffer::new(1, 2);
        image.set(0, 0, Color::new(2.0, -1.0, 0.5));
        image.set(0, 1, Color::ONE);

        let rgb = image.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(0, 1).0, [255, 0, 127]);
    }
}
