// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::{pn, MathError, Metric, Vec3, Vec4};

/// Inversion threshold on the determinant.
const SINGULAR_DETERMINANT: f64 = 1e-12;

/// Column‑major 4×4 matrix acting on homogeneous column vectors.
///
/// - Stored in column‑major order (`data[col * 4 + row]`).
/// - Represents projective transforms in general; [`Mat4::transform_point`]
///   and [`Mat4::transform_direction`] are the affine shortcuts, while
///   [`Mat4::transform`] applies the full matrix to a [`Vec4`].
///
/// # Examples
/// ```
/// use orrery_math::{Mat4, Vec3};
/// let t = Mat4::translation(5.0, -3.0, 2.0);
/// let p = Vec3::new(2.0, 4.0, -1.0);
/// assert_eq!(t.transform_point(&p).to_array(), [7.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    data: [f64; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, 0.0, // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Builds a translation matrix.
    ///
    /// Column-major layout: translation occupies the last column.
    pub const fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, 0.0, // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                tx, ty, tz, 1.0, // col 3 (translation)
            ],
        }
    }

    /// Builds a non-uniform scale matrix.
    pub const fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            data: [
                sx, 0.0, 0.0, 0.0, // col 0
                0.0, sy, 0.0, 0.0, // col 1
                0.0, 0.0, sz, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Builds a rotation matrix from an axis and angle in radians.
    ///
    /// A zero-length axis yields the identity rotation.
    #[rustfmt::skip]
    pub fn rotation_axis_angle(axis: Vec3, angle: f64) -> Self {
        let a = axis.normalize();
        if a.length_squared() == 0.0 {
            return Self::identity();
        }
        let [x, y, z] = a.to_array();
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Self::new([
            t * x * x + c,     t * x * y + s * z, t * x * z - s * y, 0.0,
            t * x * y - s * z, t * y * y + c,     t * y * z + s * x, 0.0,
            t * x * z + s * y, t * y * z - s * x, t * z * z + c,     0.0,
            0.0,               0.0,               0.0,               1.0,
        ])
    }

    /// Builds a rotation matrix around the X axis by `angle` radians.
    #[rustfmt::skip]
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Builds a rotation matrix around the Y axis by `angle` radians.
    #[rustfmt::skip]
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            c,   0.0, -s,  0.0,
            0.0, 1.0, 0.0, 0.0,
            s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Builds a rotation matrix around the Z axis by `angle` radians.
    #[rustfmt::skip]
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// OpenGL-style perspective projection.
    ///
    /// Maps the frustum of a camera looking down `-z` with vertical field of
    /// view `fov_y` (radians), `aspect = width / height`, and positive `near` /
    /// `far` distances onto the normalized device cube `[-1, 1]³`. The near
    /// plane maps to `z = -1`.
    #[rustfmt::skip]
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (fov_y * 0.5).tan();
        let nf = 1.0 / (near - far);
        Self::new([
            f / aspect, 0.0, 0.0,                    0.0,
            0.0,        f,   0.0,                    0.0,
            0.0,        0.0, (far + near) * nf,      -1.0,
            0.0,        0.0, 2.0 * far * near * nf,  0.0,
        ])
    }

    /// OpenGL-style orthographic projection of the box
    /// `[left, right] × [bottom, top] × [-near, -far]` onto `[-1, 1]³`.
    #[rustfmt::skip]
    pub fn orthographic(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (far - near);
        Self::new([
            2.0 * rl,              0.0,                   0.0,                 0.0,
            0.0,                   2.0 * tb,              0.0,                 0.0,
            0.0,                   0.0,                   -2.0 * nf,           0.0,
            -(right + left) * rl,  -(top + bottom) * tb,  -(far + near) * nf,  1.0,
        ])
    }

    /// Creates a matrix from column-major array data.
    pub const fn new(data: [f64; 16]) -> Self {
        Self { data }
    }

    /// Returns the matrix as a column‑major array.
    pub fn to_array(self) -> [f64; 16] {
        self.data
    }

    /// Entry at `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[col * 4 + row]
    }

    /// Multiplies the matrix with another matrix (`self * rhs`).
    ///
    /// `rhs` acts first on column vectors.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                out[col * 4 + row] = sum;
            }
        }
        Self::new(out)
    }

    /// Applies the full matrix to a homogeneous vector.
    pub fn transform(&self, v: &Vec4) -> Vec4 {
        let mut out = [0.0; 4];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|k| self.at(row, k) * v.component(k)).sum();
        }
        Vec4::from(out)
    }

    /// Transforms a point (assumes `w = 1`, no perspective divide).
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        let [x, y, z] = point.to_array();
        Vec3::new(
            self.at(0, 0) * x + self.at(0, 1) * y + self.at(0, 2) * z + self.at(0, 3),
            self.at(1, 0) * x + self.at(1, 1) * y + self.at(1, 2) * z + self.at(1, 3),
            self.at(2, 0) * x + self.at(2, 1) * y + self.at(2, 2) * z + self.at(2, 3),
        )
    }

    /// Transforms a direction vector (ignores translation, `w = 0`).
    pub fn transform_direction(&self, direction: &Vec3) -> Vec3 {
        let [x, y, z] = direction.to_array();
        Vec3::new(
            self.at(0, 0) * x + self.at(0, 1) * y + self.at(0, 2) * z,
            self.at(1, 0) * x + self.at(1, 1) * y + self.at(1, 2) * z,
            self.at(2, 0) * x + self.at(2, 1) * y + self.at(2, 2) * z,
        )
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = self.at(row, col);
            }
        }
        Self::new(out)
    }

    /// Cofactor matrix (transposed adjugate layout) and determinant.
    #[allow(clippy::too_many_lines)]
    fn adjugate(&self) -> ([f64; 16], f64) {
        let m = &self.data;
        let mut inv = [0.0; 16];
        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];
        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        (inv, det)
    }

    /// Determinant of the matrix.
    pub fn determinant(&self) -> f64 {
        self.adjugate().1
    }

    /// Inverse matrix.
    ///
    /// # Errors
    /// [`MathError::Singular`] when `|det|` is below `1e-12`.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let (adj, det) = self.adjugate();
        if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
            return Err(MathError::Singular { determinant: det });
        }
        let inv_det = 1.0 / det;
        let mut out = [0.0; 16];
        for (o, a) in out.iter_mut().zip(adj.iter()) {
            *o = a * inv_det;
        }
        Ok(Self::new(out))
    }

    /// Mean stretch of the matrix at the object origin, measured in `metric`.
    ///
    /// The isometry of `metric` carrying the origin to its image is factored
    /// out first; the remaining linear block `A` is polar-decomposed and the
    /// result is the mean of the singular values of `A`. For `M = T * R * S`
    /// this is `(sx + sy + sz) / 3`, and for shears it is smaller than the
    /// mean column length. Used to convert radii given in world units into
    /// object units.
    pub fn scaling_factor(&self, metric: Metric) -> f64 {
        let local = translation_to(&self.transform(&Vec4::ORIGIN), metric)
            .and_then(|t| t.inverse().ok())
            .map_or(*self, |t_inv| t_inv * *self);
        let w = local.at(3, 3);
        let scale = if w == 0.0 { 1.0 } else { 1.0 / w };
        let a: Mat3 = core::array::from_fn(|r| core::array::from_fn(|c| local.at(r, c) * scale));
        singular_value_sum(&a) / 3.0
    }

    /// `true` if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|c| c.is_finite())
    }
}

/// Isometry of `metric` carrying the origin to `p`; `None` when `p` has no
/// such translation (a Euclidean point at infinity, a hyperbolic point on or
/// outside the absolute).
#[rustfmt::skip]
fn translation_to(p: &Vec4, metric: Metric) -> Option<Mat4> {
    match metric {
        Metric::Euclidean => {
            if p.is_at_infinity() {
                return None;
            }
            let t = p.dehomogenize_vec3();
            Some(Mat4::translation(t.x(), t.y(), t.z()))
        }
        Metric::Hyperbolic | Metric::Elliptic => {
            let n2 = pn::norm_squared(p, metric);
            let n = match metric {
                Metric::Hyperbolic if n2 < 0.0 => (-n2).sqrt(),
                Metric::Elliptic if n2 > 0.0 => n2.sqrt(),
                _ => return None,
            };
            let n = if p.w() < 0.0 { -n } else { n };
            let [x, y, z, w] = p.scale(1.0 / n).to_array();
            // Boost (hyperbolic) or rotation of R⁴ (elliptic) taking e₄ to p.
            let sign = if metric == Metric::Hyperbolic { 1.0 } else { -1.0 };
            let f = sign / (1.0 + w);
            Some(Mat4::new([
                1.0 + f * x * x, f * x * y,       f * x * z,       sign * x,
                f * y * x,       1.0 + f * y * y, f * y * z,       sign * y,
                f * z * x,       f * z * y,       1.0 + f * z * z, sign * z,
                x,               y,               z,               w,
            ]))
        }
    }
}

type Mat3 = [[f64; 3]; 3];

fn cofactor3(m: &Mat3, r: usize, c: usize) -> f64 {
    let (r1, r2) = ((r + 1) % 3, (r + 2) % 3);
    let (c1, c2) = ((c + 1) % 3, (c + 2) % 3);
    m[r1][c1] * m[r2][c2] - m[r1][c2] * m[r2][c1]
}

/// Inverse transpose of `m` (cofactors over the determinant), or `None` when
/// `m` is singular.
fn inverse_transpose3(m: &Mat3) -> Option<Mat3> {
    let det: f64 = (0..3).map(|c| m[0][c] * cofactor3(m, 0, c)).sum();
    if det.abs() < SINGULAR_DETERMINANT {
        return None;
    }
    Some(core::array::from_fn(|r| core::array::from_fn(|c| cofactor3(m, r, c) / det)))
}

fn frobenius_dot(a: &Mat3, b: &Mat3) -> f64 {
    a.iter().flatten().zip(b.iter().flatten()).map(|(x, y)| x * y).sum()
}

/// Sum of the singular values of `a`: `trace(S)` for the polar decomposition
/// `a = Q S`, with `Q` found by Newton iteration `Q <- (Q + Q⁻ᵀ) / 2`.
///
/// Singular blocks fall back to the sum of column lengths.
fn singular_value_sum(a: &Mat3) -> f64 {
    if inverse_transpose3(a).is_none() {
        return (0..3)
            .map(|c| (0..3).map(|r| a[r][c] * a[r][c]).sum::<f64>().sqrt())
            .sum();
    }
    let mut q = *a;
    for _ in 0..32 {
        let Some(q_it) = inverse_transpose3(&q) else {
            break;
        };
        let next: Mat3 = core::array::from_fn(|r| core::array::from_fn(|c| 0.5 * (q[r][c] + q_it[r][c])));
        let delta = next
            .iter()
            .flatten()
            .zip(q.iter().flatten())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max);
        q = next;
        if delta < SINGULAR_DETERMINANT {
            break;
        }
    }
    // trace(Qᵀ A)
    frobenius_dot(&q, a)
}

impl From<[f64; 16]> for Mat4 {
    fn from(value: [f64; 16]) -> Self {
        Self { data: value }
    }
}

impl core::ops::Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl core::ops::Mul<&Self> for Mat4 {
    type Output = Self;
    fn mul(self, rhs: &Self) -> Self::Output {
        self.multiply(rhs)
    }
}

impl core::ops::MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.multiply(&rhs);
    }
}

impl core::ops::MulAssign<&Self> for Mat4 {
    fn mul_assign(&mut self, rhs: &Self) {
        *self = self.multiply(rhs);
    }
}

impl core::ops::Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.transform(&rhs)
    }
}
