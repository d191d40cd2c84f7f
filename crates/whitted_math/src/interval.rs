/// A closed range of scalar values along one axis or along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Position of x inside the interval, 0 at min and 1 at max.
    ///
    /// Zero-width intervals map everything to 0.
    pub fn fraction(&self, x: f64) -> f64 {
        let size = self.size();
        if size == 0.0 {
            0.0
        } else {
            (x - self.min) / size
        }
    }

    /// The unit interval [0, 1] of displayable color channel values.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}
