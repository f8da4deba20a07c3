// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::EPSILON;

/// Euclidean 3-vector used for dehomogenized points and directions.
///
/// * Components may represent either points or directions depending on the
///   calling context; use [`crate::Vec4`] when the distinction must travel
///   with the value.
/// * Use [`crate::Mat4::transform_point`] for points (homogeneous `w = 1`)
///   and [`crate::Mat4::transform_direction`] for directions (`w = 0`).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec3 {
    data: [f64; 3],
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit vector pointing along the positive X axis.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit vector pointing along the positive Y axis.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit vector pointing along the positive Z axis.
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a vector from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { data: [x, y, z] }
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f64; 3] {
        self.data
    }

    /// Component `idx` (0 = x, 1 = y, 2 = z).
    pub fn component(&self, idx: usize) -> f64 {
        self.data[idx]
    }

    /// X component.
    pub fn x(&self) -> f64 {
        self.data[0]
    }

    /// Y component.
    pub fn y(&self) -> f64 {
        self.data[1]
    }

    /// Z component.
    pub fn z(&self) -> f64 {
        self.data[2]
    }

    /// Adds two vectors.
    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.data[0] + other.data[0],
            self.data[1] + other.data[1],
            self.data[2] + other.data[2],
        )
    }

    /// Subtracts another vector.
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            self.data[0] - other.data[0],
            self.data[1] - other.data[1],
            self.data[2] - other.data[2],
        )
    }

    /// Scales the vector by a scalar.
    pub fn scale(&self, scalar: f64) -> Self {
        Self::new(self.data[0] * scalar, self.data[1] * scalar, self.data[2] * scalar)
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Self) -> f64 {
        self.data[0] * other.data[0] + self.data[1] * other.data[1] + self.data[2] * other.data[2]
    }

    /// Cross product with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.data;
        let [bx, by, bz] = other.data;
        Self::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Vector length (magnitude).
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Squared magnitude of the vector.
    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        self.sub(other).length()
    }

    /// Unsigned euclidean angle in `[0, π]` between two vectors.
    ///
    /// Returns `0` when either vector is degenerate.
    pub fn angle(&self, other: &Self) -> f64 {
        let denom = self.length() * other.length();
        if denom <= EPSILON {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }

    /// Normalises the vector, returning the zero vector if length ≤ `EPSILON`.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len <= EPSILON {
            return Self::ZERO;
        }
        self.scale(1.0 / len)
    }

    /// Component-wise minimum.
    pub fn min(&self, other: &Self) -> Self {
        Self::new(
            self.data[0].min(other.data[0]),
            self.data[1].min(other.data[1]),
            self.data[2].min(other.data[2]),
        )
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Self) -> Self {
        Self::new(
            self.data[0].max(other.data[0]),
            self.data[1].max(other.data[1]),
            self.data[2].max(other.data[2]),
        )
    }

    /// `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|c| c.is_finite())
    }
}

/// Converts a 3-element array into a `Vec3` interpreted as `(x, y, z)`.
///
/// # Examples
/// ```
/// use orrery_math::Vec3;
/// let v = Vec3::from([1.0, 2.0, 3.0]);
/// assert_eq!(v.to_array(), [1.0, 2.0, 3.0]);
/// ```
impl From<[f64; 3]> for Vec3 {
    fn from(value: [f64; 3]) -> Self {
        Self { data: value }
    }
}

impl core::ops::Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl core::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}
