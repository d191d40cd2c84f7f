//! Recursive Whitted shading.
//!
//! [`ray_trace`] finds the nearest object along a ray and hands the hit to
//! [`shade`], which sums ambient, diffuse and specular terms from every
//! unshadowed light and recurses for mirror reflection and refraction.
//! Recursion stops once [`MAX_DEPTH`] levels have been shaded.

use whitted_core::Color;
use whitted_math::{project, reflect, Ray, Vec3};

use crate::{Primitive, Scene};

/// Maximum number of shading levels along one primary ray.
pub const MAX_DEPTH: u32 = 6;

/// Hits closer than this are treated as self-intersections.
pub const HIT_EPSILON: f64 = 0.001;

/// Occluders closer than this to the shaded point do not cast shadows.
pub const SHADOW_EPSILON: f64 = 0.1;

/// Reflection and transmission weights at or below this are skipped.
pub const CONTRIBUTION_EPSILON: f64 = 0.001;

/// Color seen from `origin` looking along `direction`.
pub fn trace(scene: &Scene, origin: Vec3, direction: Vec3) -> Color {
    ray_trace(scene, &Ray::new(origin, direction), 0)
}

/// Nearest object whose entry distance exceeds [`HIT_EPSILON`].
///
/// Ties keep the object that was added first.
pub fn nearest_hit<'a>(scene: &'a Scene, ray: &Ray) -> Option<(&'a Primitive, f64)> {
    let mut closest: Option<(&Primitive, f64)> = None;

    for object in scene.objects() {
        let distance = object.intersect(ray);
        if distance > HIT_EPSILON && closest.map_or(true, |(_, best)| distance < best) {
            closest = Some((object, distance));
        }
    }

    closest
}

/// Color carried by `ray` at recursion level `depth`.
pub fn ray_trace(scene: &Scene, ray: &Ray, depth: u32) -> Color {
    match nearest_hit(scene, ray) {
        Some((object, distance)) => {
            let point = ray.at(distance);
            let normal = object.normal_at(point);
            shade(scene, ray, object, point, normal, depth)
        }
        None => scene.background_color(ray),
    }
}

/// Phong shading plus recursive reflection and refraction at a hit point.
///
/// The returned color is not clamped.
pub fn shade(
    scene: &Scene,
    ray: &Ray,
    object: &Primitive,
    point: Vec3,
    normal: Vec3,
    depth: u32,
) -> Color {
    let Some(material) = scene.material(object.material()) else {
        return Color::ZERO;
    };

    let n = normal.normalize_or_zero();
    let diffuse = material.diffuse_at(object.texture_coordinate_at(point));
    let specular = material.specular();

    let mut color = diffuse * scene.ambient_light();

    // Shadow tests are shared by the diffuse and specular passes
    let mut visible: Vec<Option<bool>> = vec![None; scene.light_count()];
    let mut lit = |i: usize, to_light: Vec3, light_pos: Vec3| -> bool {
        *visible[i].get_or_insert_with(|| !is_in_shadow(scene, point, to_light, light_pos))
    };

    for (i, light) in scene.lights().iter().enumerate() {
        let to_light = (light.position() - point).normalize_or_zero();
        let cos = to_light.dot(n);
        if cos > 0.0 && lit(i, to_light, light.position()) {
            color += cos * light.color() * diffuse;
        }
    }

    let view = (-ray.direction).normalize_or_zero();
    for (i, light) in scene.lights().iter().enumerate() {
        let to_light = (light.position() - point).normalize_or_zero();
        let cos = reflect(to_light, n).dot(view);
        if cos > 0.0 && lit(i, to_light, light.position()) {
            color += cos.powf(material.specular_exponent()) * light.color() * specular;
        }
    }

    let depth = depth + 1;

    let reflection = material.reflection();
    if reflection > CONTRIBUTION_EPSILON && depth < MAX_DEPTH {
        let reflected = Ray::new(point, reflect(view, n));
        color += reflection * ray_trace(scene, &reflected, depth);
    }

    let transmission = 1.0 - material.opacity();
    if transmission > CONTRIBUTION_EPSILON && depth < MAX_DEPTH {
        if let Some(direction) = refract(view, n, material.refraction_index()) {
            let refracted = Ray::new(point, direction);
            color += transmission * ray_trace(scene, &refracted, depth);
        }
    }

    color
}

/// Transmitted direction for a view vector through a surface with the
/// given refraction index, or `None` past the critical angle.
fn refract(view: Vec3, n: Vec3, index: f64) -> Option<Vec3> {
    let tangent = project(view, n) - view;
    let sin = tangent.length() / index;

    // Also rejects NaN from a zero index
    if !(sin <= 1.0) {
        return None;
    }

    let cos = (1.0 - sin * sin).sqrt();
    Some(sin * tangent.normalize_or_zero() - cos * n)
}

/// True if an object blocks the segment from `point` to the light.
///
/// `to_light` is the unit direction towards `light_pos`. Occluders within
/// [`SHADOW_EPSILON`] of the point are ignored.
pub fn is_in_shadow(scene: &Scene, point: Vec3, to_light: Vec3, light_pos: Vec3) -> bool {
    let max_distance = (light_pos - point).length();
    let ray = Ray::new(point, to_light);

    scene.objects().iter().any(|object| {
        let distance = object.intersect(&ray);
        distance > SHADOW_EPSILON && distance < max_distance
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cuboid, Sphere};
    use whitted_core::{Light, Material};

    fn glass_scene(index: f64) -> Scene {
        let mut scene = Scene::new();
        scene.set_background(Color::new(0.0, 0.0, 1.0));
        let glass = scene.add_material(
            Material::new(Color::ZERO).with_refraction(index, 0.0),
        );
        scene
            .add_object(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, glass))
            .unwrap();
        scene
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = glass_scene(1.0);
        let color = trace(&scene, Vec3::ZERO, Vec3::Y);
        assert_eq!(color, Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_refraction_passes_through() {
        let scene = glass_scene(1.0);

        // Index 1 bends nothing; the ray leaves the sphere and sees the sky
        let color = trace(&scene, Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Z);
        assert!(color.z > 0.5);
        assert!(color.is_finite());
    }

    #[test]
    fn test_total_internal_reflection_guard() {
        let scene = glass_scene(0.1);

        // sin = 0.5 / 0.1 exceeds 1, so no transmitted ray is traced
        let color = trace(&scene, Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Z);
        assert!(color.is_finite());
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_refract_straight_through() {
        let dir = refract(Vec3::Z, Vec3::Z, 1.5).unwrap();
        assert!((dir - Vec3::NEG_Z).length() < 1e-12);

        assert!(refract(Vec3::new(1.0, 0.0, 1.0).normalize(), Vec3::Z, 0.5).is_none());
        assert!(refract(Vec3::new(1.0, 0.0, 1.0).normalize(), Vec3::Z, 0.0).is_none());
    }

    #[test]
    fn test_facing_mirrors_terminate() {
        let mut scene = Scene::new();
        scene.set_ambient_light(Color::splat(0.1));
        let mirror = scene.add_material(Material::new(Color::ONE).with_reflection(1.0));
        scene
            .add_object(Cuboid::new(
                Vec3::new(-100.0, -100.0, -11.0),
                Vec3::new(100.0, 100.0, -10.0),
                mirror,
            ))
            .unwrap();
        scene
            .add_object(Cuboid::new(
                Vec3::new(-100.0, -100.0, 10.0),
                Vec3::new(100.0, 100.0, 11.0),
                mirror,
            ))
            .unwrap();

        // One ambient term per shaded level
        let color = trace(&scene, Vec3::ZERO, Vec3::NEG_Z);
        assert!((color - Color::splat(0.1 * MAX_DEPTH as f64)).length() < 1e-9);
    }

    #[test]
    fn test_shadow_occlusion() {
        let mut scene = Scene::new();
        let white = scene.add_material(Material::default());
        scene
            .add_object(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5, white))
            .unwrap();

        let point = Vec3::ZERO;
        let light = Vec3::new(0.0, 5.0, 0.0);
        assert!(is_in_shadow(&scene, point, Vec3::Y, light));

        // Light in front of the occluder
        assert!(!is_in_shadow(&scene, point, Vec3::Y, Vec3::new(0.0, 1.0, 0.0)));

        // Light off to the side
        let side = Vec3::new(5.0, 0.0, 0.0);
        assert!(!is_in_shadow(&scene, point, Vec3::X, side));
    }

    #[test]
    fn test_shadowed_point_gets_ambient_only() {
        let mut scene = Scene::new();
        scene.set_ambient_light(Color::splat(0.2));
        let white = scene.add_material(Material::new(Color::ONE).with_specular(Color::ONE, 10.0));
        scene
            .add_object(Cuboid::new(
                Vec3::new(-10.0, -2.0, -10.0),
                Vec3::new(10.0, -1.0, 10.0),
                white,
            ))
            .unwrap();
        scene
            .add_object(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 0.5, white))
            .unwrap();
        scene.add_light(Light::new(Vec3::new(0.0, 5.0, 0.0), Color::ONE));

        // Looks straight down at the floor under the sphere
        let color = trace(&scene, Vec3::new(0.0, 0.0, 0.0), Vec3::NEG_Y);
        assert!((color - Color::splat(0.2)).length() < 1e-9);

        // A floor point out of the sphere's shadow is lit
        let lit = trace(&scene, Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_Y);
        assert!(lit.x > 0.2);
    }
}
