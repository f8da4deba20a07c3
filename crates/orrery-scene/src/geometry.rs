// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::collections::BTreeSet;
use std::f64::consts::PI;

use orrery_math::{MathError, Vec4};

use crate::SceneError;

/// Attributes shared by every geometry kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryAttributes {
    /// Display name (diagnostics only).
    pub name: String,
    /// `Some(false)` excludes the geometry from picking.
    pub pickable: Option<bool>,
    /// Request an accelerated pick tree for this mesh.
    pub pick_tree: bool,
}

/// Discriminant of [`Geometry`], for logging and dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Unit sphere at the origin.
    Sphere,
    /// Unit-radius cylinder around the z axis, `z ∈ [-1, 1]`.
    Cylinder,
    /// Vertices only.
    PointSet,
    /// Vertices and polylines.
    IndexedLineSet,
    /// Vertices, optional polylines, and polygons.
    IndexedFaceSet,
}

/// Closed set of geometry kinds attached to components.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Canonical unit sphere.
    Sphere(GeometryAttributes),
    /// Canonical unit cylinder.
    Cylinder(GeometryAttributes),
    /// Point cloud.
    PointSet(PointSet),
    /// Polylines over a point cloud.
    IndexedLineSet(IndexedLineSet),
    /// Polygon mesh.
    IndexedFaceSet(IndexedFaceSet),
}

impl Geometry {
    /// Unit sphere with default attributes.
    pub fn sphere() -> Self {
        Self::Sphere(GeometryAttributes::default())
    }

    /// Unit cylinder with default attributes.
    pub fn cylinder() -> Self {
        Self::Cylinder(GeometryAttributes::default())
    }

    /// Kind tag.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Sphere(_) => GeometryKind::Sphere,
            Self::Cylinder(_) => GeometryKind::Cylinder,
            Self::PointSet(_) => GeometryKind::PointSet,
            Self::IndexedLineSet(_) => GeometryKind::IndexedLineSet,
            Self::IndexedFaceSet(_) => GeometryKind::IndexedFaceSet,
        }
    }

    /// Shared attributes.
    pub fn attributes(&self) -> &GeometryAttributes {
        match self {
            Self::Sphere(a) | Self::Cylinder(a) => a,
            Self::PointSet(p) => &p.attributes,
            Self::IndexedLineSet(l) => &l.points.attributes,
            Self::IndexedFaceSet(f) => &f.lines.points.attributes,
        }
    }

    /// Mutable shared attributes.
    pub fn attributes_mut(&mut self) -> &mut GeometryAttributes {
        match self {
            Self::Sphere(a) | Self::Cylinder(a) => a,
            Self::PointSet(p) => &mut p.attributes,
            Self::IndexedLineSet(l) => &mut l.points.attributes,
            Self::IndexedFaceSet(f) => &mut f.lines.points.attributes,
        }
    }

    /// The mesh, when this is a face set.
    pub fn as_face_set(&self) -> Option<&IndexedFaceSet> {
        match self {
            Self::IndexedFaceSet(f) => Some(f),
            _ => None,
        }
    }
}

impl From<PointSet> for Geometry {
    fn from(value: PointSet) -> Self {
        Self::PointSet(value)
    }
}

impl From<IndexedLineSet> for Geometry {
    fn from(value: IndexedLineSet) -> Self {
        Self::IndexedLineSet(value)
    }
}

impl From<IndexedFaceSet> for Geometry {
    fn from(value: IndexedFaceSet) -> Self {
        Self::IndexedFaceSet(value)
    }
}

fn check_len(attribute: &'static str, expected: usize, found: usize) -> Result<(), SceneError> {
    if expected == found {
        Ok(())
    } else {
        Err(SceneError::AttributeLength { attribute, expected, found })
    }
}

fn check_indices(what: &'static str, lists: &[Vec<usize>], len: usize) -> Result<(), SceneError> {
    for (list, indices) in lists.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(SceneError::IndexOutOfRange { what, list, index, len });
        }
    }
    Ok(())
}

/// Homogeneous vertices with optional per-vertex relative radii.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    attributes: GeometryAttributes,
    vertices: Vec<Vec4>,
    relative_radii: Option<Vec<f64>>,
}

impl PointSet {
    /// Point set over homogeneous vertices.
    pub fn new(vertices: Vec<Vec4>) -> Self {
        Self { attributes: GeometryAttributes::default(), vertices, relative_radii: None }
    }

    /// Point set from raw 3- or 4-component coordinates.
    ///
    /// 3-vectors are homogenized with `w = 1`.
    pub fn from_coordinates(coordinates: &[Vec<f64>]) -> Result<Self, SceneError> {
        let vertices = coordinates
            .iter()
            .map(|c| match c[..] {
                [x, y, z] => Ok(Vec4::point(x, y, z)),
                [x, y, z, w] => Ok(Vec4::new(x, y, z, w)),
                _ => Err(MathError::InvalidDimension { expected: 3, found: c.len() }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(vertices))
    }

    /// Attaches one relative radius per vertex.
    pub fn with_relative_radii(mut self, radii: Vec<f64>) -> Result<Self, SceneError> {
        check_len("relative_radii", self.vertices.len(), radii.len())?;
        self.relative_radii = Some(radii);
        Ok(self)
    }

    /// Replaces the shared attributes.
    pub fn with_attributes(mut self, attributes: GeometryAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Shared attributes.
    pub fn attributes(&self) -> &GeometryAttributes {
        &self.attributes
    }

    /// Homogeneous vertex coordinates.
    pub fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Per-vertex radius multipliers.
    pub fn relative_radii(&self) -> Option<&[f64]> {
        self.relative_radii.as_deref()
    }
}

/// Polylines over a point set. Edge `[a, b, c]` has segments `a-b` and `b-c`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedLineSet {
    points: PointSet,
    edges: Vec<Vec<usize>>,
    edge_radii: Option<Vec<f64>>,
}

impl IndexedLineSet {
    /// Validates that every edge index refers to a vertex of `points`.
    pub fn new(points: PointSet, edges: Vec<Vec<usize>>) -> Result<Self, SceneError> {
        check_indices("edge", &edges, points.vertex_count())?;
        Ok(Self { points, edges, edge_radii: None })
    }

    /// Attaches one relative tube radius per edge.
    pub fn with_edge_radii(mut self, radii: Vec<f64>) -> Result<Self, SceneError> {
        check_len("edge_radii", self.edges.len(), radii.len())?;
        self.edge_radii = Some(radii);
        Ok(self)
    }

    /// Underlying vertices.
    pub fn as_point_set(&self) -> &PointSet {
        &self.points
    }

    /// Homogeneous vertex coordinates.
    pub fn vertices(&self) -> &[Vec4] {
        self.points.vertices()
    }

    /// Polyline vertex index lists.
    pub fn edges(&self) -> &[Vec<usize>] {
        &self.edges
    }

    /// Number of polylines.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Per-edge tube radius multipliers.
    pub fn edge_radii(&self) -> Option<&[f64]> {
        self.edge_radii.as_deref()
    }
}

/// Polygon mesh with optional polylines and texture coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedFaceSet {
    lines: IndexedLineSet,
    faces: Vec<Vec<usize>>,
    texture_coordinates: Option<Vec<Vec<f64>>>,
}

impl IndexedFaceSet {
    /// Mesh without edges; validates face indices.
    pub fn new(vertices: Vec<Vec4>, faces: Vec<Vec<usize>>) -> Result<Self, SceneError> {
        let lines = IndexedLineSet { points: PointSet::new(vertices), ..IndexedLineSet::default() };
        Self::from_parts(lines, faces)
    }

    /// Mesh over an existing line set.
    pub fn from_parts(lines: IndexedLineSet, faces: Vec<Vec<usize>>) -> Result<Self, SceneError> {
        check_indices("face", &faces, lines.points.vertex_count())?;
        Ok(Self { lines, faces, texture_coordinates: None })
    }

    /// Attaches per-vertex texture coordinates of a common dimension in `1..=4`.
    pub fn with_texture_coordinates(mut self, coords: Vec<Vec<f64>>) -> Result<Self, SceneError> {
        check_len("texture_coordinates", self.lines.points.vertex_count(), coords.len())?;
        if let Some(first) = coords.first() {
            let dim = first.len();
            if !(1..=4).contains(&dim) {
                return Err(MathError::InvalidDimension { expected: 1, found: dim }.into());
            }
            if let Some(bad) = coords.iter().find(|c| c.len() != dim) {
                return Err(MathError::InvalidDimension { expected: dim, found: bad.len() }.into());
            }
        }
        self.texture_coordinates = Some(coords);
        Ok(self)
    }

    /// Replaces the edge list with the unique boundary segments of all faces.
    pub fn with_edges_from_faces(mut self) -> Self {
        let mut unique = BTreeSet::new();
        for face in &self.faces {
            for (k, &a) in face.iter().enumerate() {
                let b = face[(k + 1) % face.len()];
                if a != b {
                    unique.insert((a.min(b), a.max(b)));
                }
            }
        }
        self.lines.edges = unique.into_iter().map(|(a, b)| vec![a, b]).collect();
        self.lines.edge_radii = None;
        self
    }

    /// Sets the pick-tree request flag.
    pub fn with_pick_tree(mut self, on: bool) -> Self {
        self.lines.points.attributes.pick_tree = on;
        self
    }

    /// Replaces the shared attributes.
    pub fn with_attributes(mut self, attributes: GeometryAttributes) -> Self {
        self.lines.points.attributes = attributes;
        self
    }

    /// Shared attributes.
    pub fn attributes(&self) -> &GeometryAttributes {
        &self.lines.points.attributes
    }

    /// Polygon vertex index lists.
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Number of polygons.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Homogeneous vertex coordinates.
    pub fn vertices(&self) -> &[Vec4] {
        self.lines.vertices()
    }

    /// Per-vertex texture coordinates.
    pub fn texture_coordinates(&self) -> Option<&[Vec<f64>]> {
        self.texture_coordinates.as_deref()
    }

    /// The mesh viewed as polylines.
    pub fn as_line_set(&self) -> &IndexedLineSet {
        &self.lines
    }

    /// The mesh viewed as vertices.
    pub fn as_point_set(&self) -> &PointSet {
        &self.lines.points
    }

    /// Axis-aligned box `[-hx, hx] × [-hy, hy] × [-hz, hz]` as six outward quads.
    ///
    /// Face order: `-z`, `+z`, `-y`, `+y`, `-x`, `+x`.
    pub fn box_mesh(hx: f64, hy: f64, hz: f64) -> Self {
        let vertices = vec![
            Vec4::point(-hx, -hy, -hz),
            Vec4::point(hx, -hy, -hz),
            Vec4::point(hx, hy, -hz),
            Vec4::point(-hx, hy, -hz),
            Vec4::point(-hx, -hy, hz),
            Vec4::point(hx, -hy, hz),
            Vec4::point(hx, hy, hz),
            Vec4::point(-hx, hy, hz),
        ];
        let faces = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![3, 7, 6, 2],
            vec![0, 4, 7, 3],
            vec![1, 2, 6, 5],
        ];
        let lines = IndexedLineSet { points: PointSet::new(vertices), ..IndexedLineSet::default() };
        Self { lines, faces, texture_coordinates: None }
    }

    /// UV sphere of `radius` with `(latitude + 1) × (longitude + 1)` vertices.
    ///
    /// Quads are emitted between rings, so the pole rows contain collapsed
    /// corners. Texture coordinates run `u ∈ [0, 1]` around and `v ∈ [0, 1]`
    /// from the south pole to the north pole. Segment counts are clamped to
    /// at least `2` and `3`.
    #[allow(clippy::cast_precision_loss)]
    pub fn sphere_mesh(radius: f64, latitude: usize, longitude: usize) -> Self {
        let lat = latitude.max(2);
        let lon = longitude.max(3);
        let mut vertices = Vec::with_capacity((lat + 1) * (lon + 1));
        let mut uv = Vec::with_capacity((lat + 1) * (lon + 1));
        for i in 0..=lat {
            let v = i as f64 / lat as f64;
            let (sin_t, cos_t) = (PI * v - PI * 0.5).sin_cos();
            for j in 0..=lon {
                let u = j as f64 / lon as f64;
                let (sin_p, cos_p) = (2.0 * PI * u).sin_cos();
                vertices.push(Vec4::point(
                    radius * cos_t * cos_p,
                    radius * cos_t * sin_p,
                    radius * sin_t,
                ));
                uv.push(vec![u, v]);
            }
        }
        let row = lon + 1;
        let mut faces = Vec::with_capacity(lat * lon);
        for i in 0..lat {
            for j in 0..lon {
                let a = i * row + j;
                faces.push(vec![a, a + 1, a + row + 1, a + row]);
            }
        }
        let lines = IndexedLineSet { points: PointSet::new(vertices), ..IndexedLineSet::default() };
        Self { lines, faces, texture_coordinates: Some(uv) }
    }
}
