use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A simple 3D vector struct.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a new Vector3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// Creates a zero vector.
    pub fn zero() -> Self {
        Self::ZERO
    }

    /// True when every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Calculates the squared length (magnitude) of the vector.
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Calculates the length (magnitude) of the vector.
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Calculates the distance to another vector (point).
    pub fn distance(&self, other: Vector3) -> f64 {
        (other - *self).magnitude()
    }

    /// Scales the vector by a scalar value.
    pub fn scale(&self, factor: f64) -> Self {
        Vector3 { x: self.x * factor, y: self.y * factor, z: self.z * factor }
    }

    /// Adds another vector to this vector.
    pub fn add(&self, other: Vector3) -> Self {
        Vector3 { x: self.x + other.x, y: self.y + other.y, z: self.z + other.z }
    }

    /// Subtracts another vector from this vector.
    pub fn subtract(&self, other: Vector3) -> Self {
        Vector3 { x: self.x - other.x, y: self.y - other.y, z: self.z - other.z }
    }

    /// Linear interpolation towards `target`: `alpha = 0` keeps `self`, `alpha = 1` lands on `target`.
    pub fn lerp(&self, target: Vector3, alpha: f64) -> Self {
        Vector3 {
            x: self.x + (target.x - self.x) * alpha,
            y: self.y + (target.y - self.y) * alpha,
            z: self.z + (target.z - self.z) * alpha,
        }
    }

    /// Returns a normalized version of the vector (unit vector).
    /// Returns a zero vector if the original vector's length is zero.
    pub fn normalize_or_zero(&self) -> Self {
        let len_sq = self.magnitude_squared();
        if len_sq > 0.0 {
            self.scale(1.0 / len_sq.sqrt())
        } else {
            Vector3::zero()
        }
    }

    /// Rotates the vector by Euler angles (radians), applied about z, then y, then x.
    pub fn rotate(&self, rotation: Vector3) -> Self {
        let mut v = *self;
        rotate_pair(&mut v.x, &mut v.y, rotation.z);
        rotate_pair(&mut v.x, &mut v.z, rotation.y);
        rotate_pair(&mut v.y, &mut v.z, rotation.x);
        v
    }
}

// Rotation within the plane spanned by two components.
fn rotate_pair(a: &mut f64, b: &mut f64, angle: f64) {
    if angle == 0.0 || angle % TAU == 0.0 {
        return;
    }
    let (sin, cos) = angle.sin_cos();
    let (a0, b0) = (*a, *b);
    *a = a0 * cos - b0 * sin;
    *b = b0 * cos + a0 * sin;
}

// Implement standard operators for convenience
impl Add for Vector3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Vector3::add(&self, other)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vector3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        self.subtract(other)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Neg for Vector3 {
    type Output = Self;
    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

/// Clamps a value between a minimum and maximum.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx(a: Vector3, b: Vector3) -> bool {
        (a - b).magnitude() < 1e-12
    }

    #[test]
    fn lerp_toward_origin_shrinks_by_alpha() {
        let v = Vector3::new(10.0, -20.0, 40.0);
        let moved = v.lerp(Vector3::ZERO, 0.25);
        assert_eq!(moved, Vector3::new(7.5, -15.0, 30.0));
        assert_eq!(v.lerp(Vector3::ZERO, 0.0), v);
    }

    #[test]
    fn rotate_quarter_turns() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        assert!(approx(x.rotate(Vector3::new(0.0, 0.0, FRAC_PI_2)), Vector3::new(0.0, 1.0, 0.0)));
        assert!(approx(x.rotate(Vector3::new(0.0, FRAC_PI_2, 0.0)), Vector3::new(0.0, 0.0, 1.0)));
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert!(approx(y.rotate(Vector3::new(FRAC_PI_2, 0.0, 0.0)), Vector3::new(0.0, 0.0, 1.0)));
        // Full turns are skipped exactly.
        assert_eq!(x.rotate(Vector3::new(TAU, 0.0, 0.0)), x);
    }

    #[test]
    fn normalize_zero_vector_stays_zero() {
        assert_eq!(Vector3::ZERO.normalize_or_zero(), Vector3::ZERO);
        let n = Vector3::new(3.0, 0.0, 4.0).normalize_or_zero();
        assert!((n.magnitude() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn operators_match_methods() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-4.0, 0.5, 2.0);
        assert_eq!(a + b, a.add(b));
        assert_eq!(a - b, a.subtract(b));
        assert_eq!(a * 2.0, a.scale(2.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
    }
}
