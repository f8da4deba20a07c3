// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Every routine appends to `hits` and never clears it. Face routines skip
//! points with a negative affine coordinate, so a mesh gives the same hits
//! with or without an [`crate::AabbTree`]. The remaining routines report hits
//! behind the ray origin too; [`crate::AabbPickSystem`] drops them.

use std::cell::OnceCell;

use orrery_math::{p3, pn, Mat4, MathError, Metric, Vec3, Vec4, EPSILON, TOLERANCE};
use orrery_scene::{IndexedFaceSet, IndexedLineSet, PointSet, SceneGraphPath};

use crate::hit::{convert_to_bary, Hit, PickType};

/// Weight kept by an edge vertex at infinity when it is pulled towards its partner.
const INFINITY_PULL: f64 = 0.99;

/// Two fan triangles of one polygon hit closer than this report one point.
const SHARED_EDGE_TOLERANCE: f64 = 1e-5;

/// One ray against one geometry: the world ray plus the object-to-world
/// transform of the geometry and the path that reaches it.
#[derive(Debug, Clone, PartialEq)]
pub struct RayQuery {
    path: SceneGraphPath,
    m: Mat4,
    m_inv: Mat4,
    from: Vec4,
    to: Vec4,
    metric: Metric,
}

impl RayQuery {
    /// Query through `m`; fails if `m` is singular.
    pub fn new(path: SceneGraphPath, m: Mat4, from: Vec4, to: Vec4) -> Result<Self, MathError> {
        let m_inv = m.inverse()?;
        Ok(Self::with_inverse(path, m, m_inv, from, to))
    }

    /// Query with a precomputed inverse. `m_inv` must invert `m`.
    pub fn with_inverse(path: SceneGraphPath, m: Mat4, m_inv: Mat4, from: Vec4, to: Vec4) -> Self {
        Self { path, m, m_inv, from, to, metric: Metric::Euclidean }
    }

    /// Query for geometry living directly in world space.
    pub fn world(from: Vec4, to: Vec4) -> Self {
        Self::with_inverse(SceneGraphPath::new(), Mat4::identity(), Mat4::identity(), from, to)
    }

    /// Sets the metric used for face and primitive distances.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Path recorded in every hit.
    pub fn path(&self) -> &SceneGraphPath {
        &self.path
    }

    /// Object-to-world matrix.
    pub fn matrix(&self) -> &Mat4 {
        &self.m
    }

    /// Ray start.
    pub fn from(&self) -> &Vec4 {
        &self.from
    }

    /// Ray end (possibly at infinity).
    pub fn to(&self) -> &Vec4 {
        &self.to
    }

    /// Active metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub(crate) fn local_ray(&self) -> LocalRay {
        let from = self.m_inv.transform(&self.from);
        let to = self.m_inv.transform(&self.to);
        let origin = from.dehomogenize_vec3();
        let dir = if to.is_at_infinity() { to.xyz() } else { to.dehomogenize_vec3().sub(&origin) };
        LocalRay { from, to, origin, dir }
    }

    pub(crate) fn hit(
        &self,
        world: Vec4,
        distance: f64,
        barycentric: Option<[f64; 3]>,
        pick_type: PickType,
        index: Option<usize>,
        secondary: Option<usize>,
    ) -> Hit {
        let weights = p3::barycentric_coordinates(&self.from, &self.to, &world);
        let affine = p3::affine_from_weights(weights);
        let [a, b] = weights;
        let segment = if a + b == 0.0 { affine } else { b / (a + b) };
        Hit {
            path: self.path.clone(),
            world,
            object: self.m_inv.transform(&world),
            distance,
            affine,
            segment,
            barycentric,
            pick_type,
            index,
            secondary,
            texture: OnceCell::new(),
        }
    }

    fn local_hit(
        &self,
        local: &Vec3,
        metric: Metric,
        pick_type: PickType,
        index: Option<usize>,
        secondary: Option<usize>,
    ) -> Hit {
        let world = self.m.transform(&Vec4::from_vec3(local));
        let distance = pn::distance_between(&self.from, &world, metric);
        self.hit(world, distance, None, pick_type, index, secondary)
    }
}

/// The query ray in object coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalRay {
    /// Homogeneous start, as transformed.
    pub from: Vec4,
    /// Homogeneous end, as transformed.
    pub to: Vec4,
    /// Dehomogenized start.
    pub origin: Vec3,
    /// `to - from`, or the direction of `to` when it lies at infinity.
    pub dir: Vec3,
}

/// Intersection of the line `from → to` with the triangle `(p1, p2, p3)`.
///
/// Returns the dehomogenized intersection point and its barycentric weights
/// when every weight lies in `[0, 1]` and they sum to one within `1e-7`.
/// Lines parallel to the triangle's plane and degenerate triangles miss.
pub fn intersect_triangle(
    from: &Vec4,
    to: &Vec4,
    p1: &Vec4,
    p2: &Vec4,
    p3: &Vec4,
) -> Option<(Vec4, [f64; 3])> {
    let plane = p3::plane_from_points(p1, p2, p3);
    let point = p3::line_intersect_plane(from, to, &plane).dehomogenize();
    if point.is_at_infinity() {
        return None;
    }
    let bary = convert_to_bary(
        &p1.dehomogenize_vec3(),
        &p2.dehomogenize_vec3(),
        &p3.dehomogenize_vec3(),
        &point.xyz(),
    )?;
    let sum: f64 = bary.iter().sum();
    let inside = bary.iter().all(|b| (0.0..=1.0).contains(b)) && (sum - 1.0).powi(2) <= TOLERANCE;
    inside.then_some((point, bary))
}

/// Fan-triangulates `polygon` around its first vertex and reports each
/// pierced triangle as a face hit `(face, triangle)`.
///
/// A non-planar polygon can be crossed twice. A ray through a fan diagonal
/// pierces both neighbours at one point and is reported once, for the lower
/// triangle. Points with a negative affine coordinate (behind `from`, or past a
/// finite `to`) are skipped.
pub(crate) fn intersect_polygon(
    query: &RayQuery,
    ray: &LocalRay,
    polygon: &[Vec4],
    face: usize,
    hits: &mut Vec<Hit>,
) {
    let Some((first, rest)) = polygon.split_first() else {
        return;
    };
    let mut seen: Vec<Vec4> = Vec::new();
    for (tri, pair) in rest.windows(2).enumerate() {
        let Some((local, bary)) = intersect_triangle(&ray.from, &ray.to, first, &pair[0], &pair[1]) else {
            continue;
        };
        if seen.iter().any(|p| p.euclidean_distance(&local) < SHARED_EDGE_TOLERANCE) {
            continue;
        }
        seen.push(local);
        let world = query.m.transform(&local);
        let distance = pn::distance_between(&query.from, &world, query.metric);
        let hit = query.hit(world, distance, Some(bary), PickType::Face, Some(face), Some(tri));
        if hit.affine_coordinate() >= 0.0 {
            hits.push(hit);
        }
    }
}

/// Tests every polygon of `mesh`.
pub fn intersect_polygons(mesh: &IndexedFaceSet, query: &RayQuery, hits: &mut Vec<Hit>) {
    let ray = query.local_ray();
    let vertices = mesh.vertices();
    let mut polygon = Vec::new();
    for (face, indices) in mesh.faces().iter().enumerate() {
        polygon.clear();
        polygon.extend(indices.iter().map(|&i| vertices[i].dehomogenize()));
        intersect_polygon(query, &ray, &polygon, face, hits);
    }
}

/// Tests every segment of every edge as a tube of radius
/// `tube_radius × edge radius`.
pub fn intersect_edges(lines: &IndexedLineSet, tube_radius: f64, query: &RayQuery, hits: &mut Vec<Hit>) {
    let ray = query.local_ray();
    let vertices = lines.vertices();
    let radii = lines.edge_radii();
    let mut scratch = Vec::new();
    for (edge, indices) in lines.edges().iter().enumerate() {
        let radius = radii.map_or(tube_radius, |r| tube_radius * r[edge]);
        for (segment, pair) in indices.windows(2).enumerate() {
            let (v1, v2) = finite_endpoints(&vertices[pair[0]], &vertices[pair[1]]);
            scratch.clear();
            tube_hits(&v1, &v2, radius, &ray, &mut scratch);
            for p in &scratch {
                hits.push(query.local_hit(p, Metric::Euclidean, PickType::Line, Some(edge), Some(segment)));
            }
        }
    }
}

/// Tests every finite vertex as a sphere of radius `point_radius × vertex radius`.
pub fn intersect_points(points: &PointSet, point_radius: f64, query: &RayQuery, hits: &mut Vec<Hit>) {
    let ray = query.local_ray();
    let radii = points.relative_radii();
    let mut scratch = Vec::new();
    for (vertex, v) in points.vertices().iter().enumerate() {
        if v.is_at_infinity() {
            continue;
        }
        let radius = radii.map_or(point_radius, |r| point_radius * r[vertex]);
        scratch.clear();
        sphere_hits(&v.dehomogenize_vec3(), radius, &ray, &mut scratch);
        for p in &scratch {
            hits.push(query.local_hit(p, Metric::Euclidean, PickType::Point, Some(vertex), None));
        }
    }
}

/// Unit sphere at the object origin.
pub fn intersect_sphere(query: &RayQuery, hits: &mut Vec<Hit>) {
    let mut scratch = Vec::new();
    sphere_hits(&Vec3::ZERO, 1.0, &query.local_ray(), &mut scratch);
    for p in &scratch {
        hits.push(query.local_hit(p, query.metric, PickType::Object, None, None));
    }
}

/// Unit-radius cylinder from `(0, 0, 1)` to `(0, 0, -1)`.
pub fn intersect_cylinder(query: &RayQuery, hits: &mut Vec<Hit>) {
    let mut scratch = Vec::new();
    tube_hits(&Vec3::UNIT_Z, &(-Vec3::UNIT_Z), 1.0, &query.local_ray(), &mut scratch);
    for p in &scratch {
        hits.push(query.local_hit(p, query.metric, PickType::Object, None, None));
    }
}

fn finite_endpoints(a: &Vec4, b: &Vec4) -> (Vec3, Vec3) {
    let pull = |inf: &Vec4, other: &Vec4| Vec4::linear_combination(INFINITY_PULL, inf, 1.0 - INFINITY_PULL, other);
    let (a, b) = if a.is_at_infinity() {
        (pull(a, b), *b)
    } else if b.is_at_infinity() {
        (*a, pull(b, a))
    } else {
        (*a, *b)
    };
    (a.dehomogenize_vec3(), b.dehomogenize_vec3())
}

/// Ray/sphere roots with `t ≥ 0` along the normalized ray direction.
fn sphere_hits(center: &Vec3, radius: f64, ray: &LocalRay, out: &mut Vec<Vec3>) {
    let dir = ray.dir.normalize();
    let rel = ray.origin.sub(center);
    let b = 2.0 * dir.dot(&rel);
    let c = rel.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return;
    }
    let root = discriminant.sqrt();
    let (near, far) = ((-b - root) / 2.0, (-b + root) / 2.0);
    if near >= 0.0 {
        out.push(ray.origin.add(&dir.scale(near)));
    }
    if far >= 0.0 && far != near {
        out.push(ray.origin.add(&dir.scale(far)));
    }
}

/// Entry and exit points of the ray through the tube of `radius` around
/// `v1 v2`. Candidates farther than `√(|v1 v2|² + r²)` from either endpoint
/// are dropped. Rays parallel to the axis miss.
fn tube_hits(v1: &Vec3, v2: &Vec3, radius: f64, ray: &LocalRay, out: &mut Vec<Vec3>) {
    let dir = ray.dir.normalize();
    let axis = v2.sub(v1).normalize();
    let normal = axis.cross(&dir);
    // Both factors are unit length, so |axis × dir| = sin θ.
    let sin_angle = normal.length();
    if sin_angle < EPSILON {
        return;
    }
    let offset = ray.origin.sub(v1);
    let dist = normal.dot(&offset).abs() / sin_angle;
    if dist > radius {
        return;
    }
    let lambda = normal.dot(&offset.cross(&axis)) / (sin_angle * sin_angle);
    let nearest = ray.origin.add(&dir.scale(lambda));
    let reach = (radius * radius - dist * dist).sqrt() / sin_angle;
    let limit = (v1.sub(v2).length_squared() + radius * radius).sqrt();
    for s in [-reach, reach] {
        let p = nearest.add(&dir.scale(s));
        if p.distance(v1) < limit && p.distance(v2) < limit {
            out.push(p);
        }
    }
}
