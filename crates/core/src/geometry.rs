use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A 3D position or displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ZERO: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Scale this vector so its length does not exceed `max_length`.
    pub fn clamped(self, max_length: f32) -> Self {
        let len = self.length();
        if len > max_length && len > 0.0 {
            self * (max_length / len)
        } else {
            self
        }
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Point3 {
    fn add_assign(&mut self, rhs: Point3) {
        *self = *self + rhs;
    }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Point3 {
    fn sub_assign(&mut self, rhs: Point3) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Point3 {
    type Output = Point3;
    fn mul(self, rhs: f32) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Point3 {
    type Output = Point3;
    fn neg(self) -> Point3 {
        Point3::new(-self.x, -self.y, -self.z)
    }
}

/// Axis-aligned bounding box, used for view-fitting laid-out components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    min: Point3,
    max: Point3,
}

impl BoundingBox {
    /// A degenerate box containing a single point.
    pub fn at(point: Point3) -> Self {
        Self { min: point, max: point }
    }

    pub fn min(&self) -> Point3 {
        self.min
    }

    pub fn max(&self) -> Point3 {
        self.max
    }

    /// Grow the box so it contains `point`.
    pub fn expand_to_include(&mut self, point: Point3) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn centre(&self) -> Point3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis.
    pub fn extents(&self) -> Point3 {
        self.max - self.min
    }

    /// Longest edge length, handy for choosing a camera distance.
    pub fn max_extent(&self) -> f32 {
        let e = self.extents();
        e.x.max(e.y).max(e.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Point3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Point3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Point3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn length_and_clamp() {
        let v = Point3::new(3.0, 4.0, 0.0);
        assert_eq!(v.length(), 5.0);

        let clamped = v.clamped(1.0);
        assert!((clamped.length() - 1.0).abs() < 1e-6);

        // Already short enough: unchanged.
        assert_eq!(v.clamped(10.0), v);

        // Zero vector must not produce NaN.
        let z = Point3::ZERO.clamped(1.0);
        assert_eq!(z, Point3::ZERO);
    }

    #[test]
    fn bounding_box_expansion() {
        let mut bb = BoundingBox::at(Point3::new(1.0, 1.0, 1.0));
        bb.expand_to_include(Point3::new(-1.0, 3.0, 0.0));
        bb.expand_to_include(Point3::new(2.0, -2.0, 5.0));

        assert_eq!(bb.min(), Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(bb.max(), Point3::new(2.0, 3.0, 5.0));
        assert_eq!(bb.extents(), Point3::new(3.0, 5.0, 5.0));
        assert_eq!(bb.max_extent(), 5.0);
        assert_eq!(bb.centre(), Point3::new(0.5, 0.5, 2.5));
    }
}
