//! Point lights.

use whitted_math::Vec3;

use crate::Color;

/// A point light with position and RGB intensity.
///
/// Lights stay mutable after creation so a driver can animate them between
/// frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    position: Vec3,
    color: Color,
}

impl Light {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}
