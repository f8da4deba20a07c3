// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::Vec3;

/// Homogeneous 4-vector `(x, y, z, w)`.
///
/// * `w = 1` encodes a finite point in affine chart coordinates.
/// * `w = 0` encodes a point at infinity, i.e. a direction.
/// * Any non-zero scalar multiple names the same projective point; use
///   [`Vec4::dehomogenize`] to return to the `w = 1` representative.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec4 {
    data: [f64; 4],
}

impl Vec4 {
    /// The origin `(0, 0, 0, 1)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// The point at infinity in the `+z` direction.
    pub const Z_DIRECTION: Self = Self::new(0.0, 0.0, 1.0, 0.0);

    /// Creates a vector from raw homogeneous components.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// A finite point `(x, y, z, 1)`.
    pub const fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// A point at infinity `(x, y, z, 0)`.
    pub const fn direction(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// Homogenizes a 3-vector by appending `w = 1`.
    pub fn from_vec3(v: &Vec3) -> Self {
        let [x, y, z] = v.to_array();
        Self::point(x, y, z)
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f64; 4] {
        self.data
    }

    /// Component `idx` (0 = x, …, 3 = w).
    pub fn component(&self, idx: usize) -> f64 {
        self.data[idx]
    }

    /// Homogeneous coordinate.
    pub fn w(&self) -> f64 {
        self.data[3]
    }

    /// `true` for points at infinity (`w == 0`).
    pub fn is_at_infinity(&self) -> bool {
        self.data[3] == 0.0
    }

    /// The first three components, without dividing by `w`.
    pub fn xyz(&self) -> Vec3 {
        Vec3::new(self.data[0], self.data[1], self.data[2])
    }

    /// Divides by `w` so that the result has `w = 1`.
    ///
    /// Vectors with `w` equal to `0` or `1` are returned unchanged.
    pub fn dehomogenize(&self) -> Self {
        let w = self.data[3];
        if w == 1.0 || w == 0.0 {
            return *self;
        }
        let inv = 1.0 / w;
        Self::new(self.data[0] * inv, self.data[1] * inv, self.data[2] * inv, 1.0)
    }

    /// Dehomogenizes and drops `w`.
    ///
    /// Points at infinity keep their direction components.
    pub fn dehomogenize_vec3(&self) -> Vec3 {
        self.dehomogenize().xyz()
    }

    /// Plain `R⁴` dot product (no metric).
    pub fn dot(&self, other: &Self) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Self) -> Self {
        Self::linear_combination(1.0, self, 1.0, other)
    }

    /// Component-wise difference.
    pub fn sub(&self, other: &Self) -> Self {
        Self::linear_combination(1.0, self, -1.0, other)
    }

    /// Scales all four components.
    pub fn scale(&self, s: f64) -> Self {
        Self::new(self.data[0] * s, self.data[1] * s, self.data[2] * s, self.data[3] * s)
    }

    /// `a * u + b * v`.
    pub fn linear_combination(a: f64, u: &Self, b: f64, v: &Self) -> Self {
        Self::new(
            a * u.data[0] + b * v.data[0],
            a * u.data[1] + b * v.data[1],
            a * u.data[2] + b * v.data[2],
            a * u.data[3] + b * v.data[3],
        )
    }

    /// Euclidean distance between the dehomogenized representatives.
    ///
    /// Both vectors are expected to be finite points.
    pub fn euclidean_distance(&self, other: &Self) -> f64 {
        self.dehomogenize_vec3().distance(&other.dehomogenize_vec3())
    }

    /// `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|c| c.is_finite())
    }
}

impl From<[f64; 4]> for Vec4 {
    fn from(value: [f64; 4]) -> Self {
        Self { data: value }
    }
}

impl From<Vec3> for Vec4 {
    fn from(value: Vec3) -> Self {
        Self::from_vec3(&value)
    }
}
