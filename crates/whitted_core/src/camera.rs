//! Pinhole camera with near and far projection planes.

use whitted_math::Vec3;

/// The far plane of a camera's frustum, used to project background images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarPlane {
    /// Lower-left corner of the plane
    pub origin: Vec3,
    /// Unit normal, pointing back towards the eye
    pub normal: Vec3,
    /// Edge vector spanning the plane's width
    pub u: Vec3,
    /// Edge vector spanning the plane's height
    pub v: Vec3,
}

/// Camera for generating primary rays.
///
/// Pixel coordinates passed to [`Camera::ray_direction`] have their origin
/// at the lower-left corner of the screen; `y` grows upward.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    at: Vec3,
    up: Vec3,

    /// Vertical field of view in degrees
    fovy: f64,
    near: f64,
    far: f64,

    screen_width: u32,
    screen_height: u32,

    // Derived state (set by resize())
    x_axis: Vec3,
    y_axis: Vec3,
    z_axis: Vec3,
    near_origin: Vec3,
    near_u: Vec3,
    near_v: Vec3,
    far_plane: FarPlane,
}

impl Camera {
    /// Create a camera looking from `eye` towards `at`.
    ///
    /// `fovy` is the vertical field of view in degrees. `near` and `far` are
    /// the distances from the eye to the projection and background planes.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eye: Vec3,
        at: Vec3,
        up: Vec3,
        fovy: f64,
        near: f64,
        far: f64,
        screen_width: u32,
        screen_height: u32,
    ) -> Self {
        let z_axis = (eye - at).normalize_or_zero();
        let x_axis = up.cross(z_axis).normalize_or_zero();
        let y_axis = z_axis.cross(x_axis);

        let mut camera = Self {
            eye,
            at,
            up,
            fovy,
            near,
            far,
            screen_width,
            screen_height,
            x_axis,
            y_axis,
            z_axis,
            near_origin: Vec3::ZERO,
            near_u: Vec3::ZERO,
            near_v: Vec3::ZERO,
            far_plane: FarPlane {
                origin: Vec3::ZERO,
                normal: Vec3::ZERO,
                u: Vec3::ZERO,
                v: Vec3::ZERO,
            },
        };
        camera.resize(screen_width, screen_height);
        camera
    }

    /// Same camera rendering at a different resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resize(width, height);
        self
    }

    /// Recompute the near and far planes for a new screen size.
    fn resize(&mut self, width: u32, height: u32) {
        self.screen_width = width;
        self.screen_height = height;

        let sz = self.near;
        let sy = sz * (self.fovy.to_radians() / 2.0).tan();
        let sx = sy * width as f64 / height.max(1) as f64;

        self.near_origin = self.eye - sz * self.z_axis - sy * self.y_axis - sx * self.x_axis;
        self.near_u = 2.0 * sx * self.x_axis;
        self.near_v = 2.0 * sy * self.y_axis;

        let scale = self.far / self.near;
        let (sz, sy, sx) = (sz * scale, sy * scale, sx * scale);
        let far_u = 2.0 * sx * self.x_axis;
        let far_v = 2.0 * sy * self.y_axis;
        self.far_plane = FarPlane {
            origin: self.eye - sz * self.z_axis - sy * self.y_axis - sx * self.x_axis,
            normal: far_u.cross(far_v).normalize_or_zero(),
            u: far_u,
            v: far_v,
        };
    }

    /// Unit direction from the eye through screen position (x, y).
    ///
    /// Integer coordinates address the lower-left corner of a pixel.
    pub fn ray_direction(&self, x: f64, y: f64) -> Vec3 {
        let u = self.near_u * (x / self.screen_width as f64);
        let v = self.near_v * (y / self.screen_height as f64);
        let point = self.near_origin + u + v;
        (point - self.eye).normalize_or_zero()
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn at(&self) -> Vec3 {
        self.at
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Vertical field of view in degrees.
    pub fn fovy(&self) -> f64 {
        self.fovy
    }

    pub fn near(&self) -> f64 {
        self.near
    }

    pub fn far(&self) -> f64 {
        self.far
    }

    pub fn screen_width(&self) -> u32 {
        self.screen_width
    }

    pub fn screen_height(&self) -> u32 {
        self.screen_height
    }

    pub fn far_plane(&self) -> FarPlane {
        self.far_plane
    }
}
