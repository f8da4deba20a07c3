// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::fmt;
use std::cell::OnceCell;

use orrery_math::{Vec3, Vec4};
use orrery_scene::{Geometry, SceneGraph, SceneGraphPath};

/// Row-pair determinant threshold and weight snapping tolerance.
const BARY_EPS: f64 = 1e-5;
/// Largest residual allowed on the coordinate left out of the 2x2 solve.
const BARY_RESIDUAL: f64 = 1e-3;

/// Kind of primitive a [`Hit`] landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickType {
    /// Sphere or cylinder primitive.
    Object = 0,
    /// Polygon of a face set.
    Face = 1,
    /// Edge tube.
    Line = 2,
    /// Vertex sphere.
    Point = 4,
}

impl PickType {
    /// Numeric tag.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Lowercase label.
    pub fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Face => "face",
            Self::Line => "edge",
            Self::Point => "point",
        }
    }
}

impl fmt::Display for PickType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What callers may ask of a pick result.
pub trait PickResult {
    /// Path from the scene root to the hit geometry.
    fn pick_path(&self) -> &SceneGraphPath;
    /// Hit point in world coordinates.
    fn world_coordinates(&self) -> Vec4;
    /// Hit point in the geometry's object coordinates.
    fn object_coordinates(&self) -> Vec4;
    /// Face, edge, or vertex index; `None` for primitives.
    fn index(&self) -> Option<usize>;
    /// Fan triangle of a face or segment of an edge; `None` otherwise.
    fn secondary_index(&self) -> Option<usize>;
    /// Kind of primitive hit.
    fn pick_type(&self) -> PickType;
    /// Interpolated texture coordinates of a face hit; empty when the mesh has none.
    fn texture_coordinates(&self, scene: &SceneGraph) -> &[f64];
}

/// One ray/primitive intersection.
#[derive(Debug, Clone)]
pub struct Hit {
    pub(crate) path: SceneGraphPath,
    pub(crate) world: Vec4,
    pub(crate) object: Vec4,
    pub(crate) distance: f64,
    pub(crate) affine: f64,
    pub(crate) segment: f64,
    pub(crate) barycentric: Option<[f64; 3]>,
    pub(crate) pick_type: PickType,
    pub(crate) index: Option<usize>,
    pub(crate) secondary: Option<usize>,
    pub(crate) texture: OnceCell<Vec<f64>>,
}

impl Hit {
    /// Distance from the ray origin, measured in the active metric for faces
    /// and primitives and in euclidean terms for points and edges.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// `b / a` for the hit written as `a·from + b·to`.
    pub fn affine_coordinate(&self) -> f64 {
        self.affine
    }

    /// `b / (a + b)`: `0` at `from`, `1` at `to`.
    pub fn segment_parameter(&self) -> f64 {
        self.segment
    }

    /// Triangle weights of a face hit.
    pub fn barycentric(&self) -> Option<[f64; 3]> {
        self.barycentric
    }

    fn interpolate_texture(&self, scene: &SceneGraph) -> Vec<f64> {
        if self.pick_type != PickType::Face {
            return Vec::new();
        }
        let (Some(face), Some(tri), Some(geometry)) = (self.index, self.secondary, self.path.geometry()) else {
            return Vec::new();
        };
        let Ok(Geometry::IndexedFaceSet(mesh)) = scene.geometry(geometry) else {
            return Vec::new();
        };
        let (Some(tex), Some(indices)) = (mesh.texture_coordinates(), mesh.faces().get(face)) else {
            return Vec::new();
        };
        let l = indices.len();
        if l < 3 {
            return Vec::new();
        }
        let corners = [indices[0], indices[(tri + 1) % l], indices[(tri + 2) % l]];
        let verts = mesh.vertices();
        let [a, b, c] = corners.map(|i| verts[i].dehomogenize_vec3());
        let Some(weights) = convert_to_bary(&a, &b, &c, &self.object.dehomogenize_vec3()).or(self.barycentric) else {
            return Vec::new();
        };
        let dim = tex[corners[0]].len();
        (0..dim)
            .map(|d| corners.iter().zip(weights).map(|(&v, w)| tex[v][d] * w).sum::<f64>())
            .collect()
    }
}

impl PickResult for Hit {
    fn pick_path(&self) -> &SceneGraphPath {
        &self.path
    }

    fn world_coordinates(&self) -> Vec4 {
        self.world
    }

    fn object_coordinates(&self) -> Vec4 {
        self.object
    }

    fn index(&self) -> Option<usize> {
        self.index
    }

    fn secondary_index(&self) -> Option<usize> {
        self.secondary
    }

    fn pick_type(&self) -> PickType {
        self.pick_type
    }

    /// Computed on first call and cached; later calls ignore `scene`.
    fn texture_coordinates(&self, scene: &SceneGraph) -> &[f64] {
        self.texture.get_or_init(|| self.interpolate_texture(scene))
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = self.world.to_array();
        write!(f, "{} hit", self.pick_type)?;
        if let Some(i) = self.index {
            write!(f, " #{i}")?;
            if let Some(j) = self.secondary {
                write!(f, ".{j}")?;
            }
        }
        write!(
            f,
            " at [{x:.4}, {y:.4}, {z:.4}, {w:.4}] dist={:.4} affine={:.4} path={}",
            self.distance, self.affine, self.path
        )
    }
}

/// Stable sort by affine coordinate, nearest first.
pub fn sort_hits(hits: &mut [Hit]) {
    hits.sort_by(|a, b| a.affine.total_cmp(&b.affine));
}

fn det2(x0: &Vec3, x1: &Vec3, x2: &Vec3, i: usize, j: usize) -> f64 {
    let c = |v: &Vec3, k: usize| v.component(k);
    c(x1, i) * c(x2, j) - c(x1, j) * c(x2, i) - (c(x0, i) * c(x2, j) - c(x0, j) * c(x2, i))
        + c(x0, i) * c(x1, j)
        - c(x0, j) * c(x1, i)
}

/// Barycentric weights of `x` in the triangle `(x0, x1, x2)`.
///
/// Solves on the first coordinate pair whose determinant exceeds `1e-5`,
/// then rejects `x` if the remaining coordinate misses by more than `1e-3`.
/// Weights within `1e-5` of zero are snapped to zero and the rest rescaled to
/// sum to one. `None` for degenerate triangles or points off the plane.
pub fn convert_to_bary(x0: &Vec3, x1: &Vec3, x2: &Vec3, x: &Vec3) -> Option<[f64; 3]> {
    let (i0, i1, i2, det) = [(0, 1, 2), (0, 2, 1), (1, 2, 0)]
        .into_iter()
        .map(|(i0, i1, i2)| (i0, i1, i2, det2(x0, x1, x2, i0, i1)))
        .find(|(.., det)| det.abs() > BARY_EPS)?;

    let b0 = det2(x, x1, x2, i0, i1) / det;
    let b1 = det2(x0, x, x2, i0, i1) / det;
    let b2 = 1.0 - b0 - b1;

    let rest = x0.component(i2) * b0 + x1.component(i2) * b1 + x2.component(i2) * b2;
    if (rest - x.component(i2)).abs() > BARY_RESIDUAL {
        return None;
    }
    Some(snap_weights([b0, b1, b2]))
}

fn snap_weights(mut w: [f64; 3]) -> [f64; 3] {
    let mut sum = 0.0;
    for b in &mut w {
        if b.abs() < BARY_EPS {
            *b = 0.0;
        }
        sum += *b;
    }
    let Some(i) = w.iter().position(|b| *b != 0.0) else {
        return w;
    };
    if sum == 0.0 {
        return w;
    }
    let (j, k) = ((i + 1) % 3, (i + 2) % 3);
    w[j] /= sum;
    w[k] /= sum;
    w[i] = 1.0 - w[j] - w[k];
    w
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn centroid_has_equal_weights() {
        let (a, b, c) = (Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
        let w = convert_to_bary(&a, &b, &c, &Vec3::new(1.0, 1.0, 0.0)).unwrap();
        for wi in w {
            assert!((wi - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn vertical_triangle_uses_another_row_pair() {
        // Lies in the x = 0 plane: the (x, y) determinant vanishes.
        let (a, b, c) = (Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        let w = convert_to_bary(&a, &b, &c, &Vec3::new(0.0, 0.25, 0.5)).unwrap();
        assert!((w[0] - 0.25).abs() < 1e-12);
        assert!((w[1] - 0.25).abs() < 1e-12);
        assert!((w[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn off_plane_point_and_degenerate_triangle_are_rejected() {
        let (a, b, c) = (Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(convert_to_bary(&a, &b, &c, &Vec3::new(0.2, 0.2, 0.5)), None);
        let line = Vec3::new(2.0, 0.0, 0.0);
        assert_eq!(convert_to_bary(&a, &b, &line, &Vec3::new(0.5, 0.0, 0.0)), None);
    }

    #[test]
    fn tiny_weights_snap_to_zero() {
        let w = snap_weights([0.5, 0.5 - 1e-6, 1e-6]);
        assert_eq!(w[2], 0.0);
        assert!((w[0] + w[1] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn pick_type_tags() {
        assert_eq!(PickType::Point.as_i32(), 4);
        assert_eq!(PickType::Line.name(), "edge");
        assert_eq!(PickType::Object.to_string(), "object");
    }
}
