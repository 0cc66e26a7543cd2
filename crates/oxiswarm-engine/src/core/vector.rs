use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// An immutable 2-D vector of finite reals.
///
/// Used for positions, velocities, and headings throughout the engine. All
/// operations return new values; none mutate. Degenerate inputs never panic:
/// the unit of the zero vector is the zero vector, and angles involving a
/// zero-length operand are zero.
///
/// # Example
///
/// ```
/// use oxiswarm_engine::Vec2;
///
/// let v = Vec2::new(3.0, 4.0);
/// assert_eq!(v.length(), 5.0);
/// assert!((v.unit().length() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean norm.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or the zero vector when the length
    /// is zero.
    #[must_use]
    pub fn unit(self) -> Self {
        let len = self.length();
        if len > 0.0 { self * (1.0 / len) } else { Self::ZERO }
    }

    /// Unit vector rotated 90° counter-clockwise from this vector's
    /// direction. Zero for the zero vector.
    #[must_use]
    pub fn orthogonal(self) -> Self {
        let u = self.unit();
        Self::new(-u.y, u.x)
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Unsigned angle between the directions of two vectors, in radians in
    /// [0, π].
    ///
    /// Floating-point error can push the cosine slightly outside [-1, 1], so
    /// the argument is clamped before the inverse cosine. If either vector
    /// has zero length the angle is 0.
    #[must_use]
    pub fn angle(self, other: Self) -> f64 {
        let u = self.unit();
        let v = other.unit();
        if u == Self::ZERO || v == Self::ZERO {
            return 0.0;
        }
        u.dot(v).clamp(-1.0, 1.0).acos()
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Rescales to `max` length if longer, preserving direction.
    #[must_use]
    pub fn clamp_length(self, max: f64) -> Self {
        if self.length() > max {
            self.unit() * max
        } else {
            self
        }
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_unit_has_unit_length() {
        for v in [
            Vec2::new(3.0, 4.0),
            Vec2::new(-1.0, 2.5),
            Vec2::new(0.0, 17.0),
            Vec2::new(1e-7, -1e-7),
        ] {
            assert!((v.unit().length() - 1.0).abs() < EPS, "unit of {v:?}");
        }
    }

    #[test]
    fn test_zero_vector_unit_is_zero() {
        assert_eq!(Vec2::ZERO.unit(), Vec2::ZERO);
    }

    #[test]
    fn test_orthogonal_is_perpendicular_and_unit() {
        for v in [Vec2::new(3.0, 4.0), Vec2::new(-2.0, 7.0), Vec2::new(0.0, 1.0)] {
            let o = v.orthogonal();
            assert!(v.dot(o).abs() < EPS);
            assert!((o.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_angle_is_symmetric() {
        let a = Vec2::new(2.0, 4.0);
        let b = Vec2::new(0.0, 1.0);
        assert!((a.angle(b) - b.angle(a)).abs() < EPS);
    }

    #[test]
    fn test_angle_with_self_is_zero() {
        let a = Vec2::new(2.0, 4.0);
        assert!(a.angle(a).abs() < EPS);
        // Parallel vectors of different magnitude are also at angle zero.
        assert!(a.angle(a * 3.0).abs() < EPS);
    }

    #[test]
    fn test_angle_antiparallel_is_pi() {
        let a = Vec2::new(1.0, 0.0);
        assert!((a.angle(-a) - PI).abs() < EPS);
    }

    #[test]
    fn test_angle_perpendicular_is_half_pi() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, -3.0);
        assert!((a.angle(b) - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_angle_degenerate_is_zero() {
        let a = Vec2::new(1.0, 1.0);
        assert_eq!(a.angle(Vec2::ZERO), 0.0);
        assert_eq!(Vec2::ZERO.angle(a), 0.0);
    }

    #[test]
    fn test_distance() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);
        assert!((a.distance(b) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec2::new(30.0, 40.0);
        let clamped = v.clamp_length(10.0);
        assert!((clamped.length() - 10.0).abs() < EPS);
        assert!(v.angle(clamped).abs() < EPS);

        let short = Vec2::new(1.0, 1.0);
        assert_eq!(short.clamp_length(10.0), short);
    }
}
