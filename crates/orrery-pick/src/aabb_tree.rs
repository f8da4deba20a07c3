// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::{Vec3, Vec4};
use orrery_scene::{IndexedFaceSet, SceneError};

use crate::aabb::Aabb;
use crate::brute_force::{intersect_polygon, LocalRay, RayQuery};
use crate::hit::Hit;

/// Leaf capacity used when none is configured.
pub const DEFAULT_POLYS_PER_LEAF: usize = 5;

/// Dehomogenized polygon plus the index of the face it came from.
#[derive(Debug, Clone)]
struct TreePolygon {
    vertices: Vec<Vec4>,
    face: usize,
}

impl TreePolygon {
    fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(Vec4::xyz)
    }

    fn centroid(&self) -> Vec3 {
        let n = self.vertices.len().max(1);
        #[allow(clippy::cast_precision_loss)]
        let inv = 1.0 / n as f64;
        self.points().fold(Vec3::ZERO, |acc, p| acc.add(&p)).scale(inv)
    }
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Aabb,
    /// Inclusive polygon range.
    start: usize,
    end: usize,
    children: Option<Box<[Node; 2]>>,
}

/// Bounding-volume hierarchy over the polygons of one mesh.
///
/// Immutable once built: a mesh that changes needs a new tree.
#[derive(Debug, Clone)]
pub struct AabbTree {
    polygons: Vec<TreePolygon>,
    root: Option<Node>,
    max_polys_per_leaf: usize,
}

impl AabbTree {
    /// Builds a tree over `faces` indexing into `coordinates`.
    ///
    /// Fails when a face refers past the end of `coordinates`.
    pub fn construct(
        coordinates: &[Vec4],
        faces: &[Vec<usize>],
        max_polys_per_leaf: usize,
    ) -> Result<Self, SceneError> {
        let len = coordinates.len();
        let mut polygons = Vec::with_capacity(faces.len());
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                return Err(SceneError::IndexOutOfRange { what: "face", list: face, index, len });
            }
            let vertices = indices.iter().map(|&i| coordinates[i].dehomogenize()).collect();
            polygons.push(TreePolygon { vertices, face });
        }
        Ok(Self::build(polygons, max_polys_per_leaf))
    }

    /// Builds a tree over the faces of `mesh`.
    pub fn from_face_set(mesh: &IndexedFaceSet, max_polys_per_leaf: usize) -> Self {
        let coordinates = mesh.vertices();
        let polygons = mesh
            .faces()
            .iter()
            .enumerate()
            .map(|(face, indices)| TreePolygon {
                vertices: indices.iter().map(|&i| coordinates[i].dehomogenize()).collect(),
                face,
            })
            .collect();
        Self::build(polygons, max_polys_per_leaf)
    }

    fn build(polygons: Vec<TreePolygon>, max_polys_per_leaf: usize) -> Self {
        let max_polys_per_leaf = max_polys_per_leaf.max(1);
        if polygons.is_empty() {
            return Self { polygons, root: None, max_polys_per_leaf };
        }
        let mut entries: Vec<(TreePolygon, Vec3)> = polygons
            .into_iter()
            .map(|p| {
                let c = p.centroid();
                (p, c)
            })
            .collect();
        let last = entries.len() - 1;
        let root = split(&mut entries, 0, last, max_polys_per_leaf);
        let polygons = entries.into_iter().map(|(p, _)| p).collect();
        Self { polygons, root: Some(root), max_polys_per_leaf }
    }

    /// Appends the face hits of every polygon the query ray pierces,
    /// skipping subtrees whose box the ray misses.
    pub fn intersect(&self, query: &RayQuery, hits: &mut Vec<Hit>) {
        if let Some(root) = &self.root {
            let ray = query.local_ray();
            self.walk(root, query, &ray, hits);
        }
    }

    fn walk(&self, node: &Node, query: &RayQuery, ray: &LocalRay, hits: &mut Vec<Hit>) {
        if !node.bounds.intersects(&ray.origin, &ray.dir) {
            return;
        }
        match &node.children {
            Some(children) => {
                for child in children.iter() {
                    self.walk(child, query, ray, hits);
                }
            }
            None => {
                for polygon in &self.polygons[node.start..=node.end] {
                    intersect_polygon(query, ray, &polygon.vertices, polygon.face, hits);
                }
            }
        }
    }

    /// Root box; `None` for a mesh without faces.
    pub fn bounds(&self) -> Option<&Aabb> {
        self.root.as_ref().map(|n| &n.bounds)
    }

    /// `true` when the whole mesh fits in one leaf.
    pub fn is_leaf(&self) -> bool {
        self.root.as_ref().is_some_and(|n| n.children.is_none())
    }

    /// Number of levels; `0` for an empty tree.
    pub fn depth(&self) -> usize {
        fn depth_of(node: &Node) -> usize {
            1 + node.children.as_ref().map_or(0, |c| depth_of(&c[0]).max(depth_of(&c[1])))
        }
        self.root.as_ref().map_or(0, depth_of)
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.visit_leaves(|_, _| count += 1);
        count
    }

    /// Number of polygons.
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Leaf capacity the tree was built with.
    pub fn max_polys_per_leaf(&self) -> usize {
        self.max_polys_per_leaf
    }

    /// Calls `f` with each leaf's box and original face indices, left to right.
    pub fn visit_leaves<F: FnMut(&Aabb, &[usize])>(&self, mut f: F) {
        let mut stack: Vec<&Node> = self.root.iter().collect();
        let mut faces = Vec::new();
        while let Some(node) = stack.pop() {
            if let Some(children) = &node.children {
                stack.push(&children[1]);
                stack.push(&children[0]);
            } else {
                faces.clear();
                faces.extend(self.polygons[node.start..=node.end].iter().map(|p| p.face));
                f(&node.bounds, &faces);
            }
        }
    }
}

fn bounds_of(entries: &[(TreePolygon, Vec3)]) -> Aabb {
    let mut points = entries.iter().flat_map(|(p, _)| p.points());
    let Some(first) = points.next() else {
        return Aabb::default();
    };
    let (min, max) = points.fold((first, first), |(lo, hi), p| (lo.min(&p), hi.max(&p)));
    Aabb::from_min_max(&min, &max)
}

fn split(entries: &mut [(TreePolygon, Vec3)], start: usize, end: usize, max_polys_per_leaf: usize) -> Node {
    let bounds = bounds_of(&entries[start..=end]);
    if end - start < max_polys_per_leaf {
        return Node { bounds, start, end, children: None };
    }
    let axis = bounds.longest_axis();
    let pivot = bounds.center().component(axis);
    entries[start..=end].sort_by(|(_, a), (_, b)| (a.component(axis) - pivot).total_cmp(&(b.component(axis) - pivot)));
    let half = (start + end) / 2;
    let left = split(entries, start, half, max_polys_per_leaf);
    let right = split(entries, half + 1, end, max_polys_per_leaf);
    Node { bounds, start, end, children: Some(Box::new([left, right])) }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn strip(n: usize) -> (Vec<Vec4>, Vec<Vec<usize>>) {
        let mut coords = Vec::new();
        let mut faces = Vec::new();
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64;
            let base = coords.len();
            coords.extend([Vec4::point(x, 0.0, 0.0), Vec4::point(x + 1.0, 0.0, 0.0), Vec4::point(x, 1.0, 0.0)]);
            faces.push(vec![base, base + 1, base + 2]);
        }
        (coords, faces)
    }

    #[test]
    fn leaves_partition_the_faces() {
        let (coords, faces) = strip(23);
        let tree = AabbTree::construct(&coords, &faces, 4).unwrap();
        let mut seen = Vec::new();
        tree.visit_leaves(|bounds, leaf| {
            assert!(leaf.len() <= 4);
            for &f in leaf {
                for &v in &faces[f] {
                    assert!(bounds.contains(&coords[v].xyz(), 1e-12));
                }
            }
            seen.extend_from_slice(leaf);
        });
        seen.sort_unstable();
        assert_eq!(seen, (0..23).collect::<Vec<_>>());
        assert_eq!(tree.polygon_count(), 23);
        assert!(tree.depth() > 1);
    }

    #[test]
    fn split_follows_the_long_axis() {
        let (coords, faces) = strip(8);
        let tree = AabbTree::construct(&coords, &faces, 4).unwrap();
        let mut leaves = Vec::new();
        tree.visit_leaves(|_, leaf| leaves.push(leaf.to_vec()));
        assert_eq!(leaves, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]]);
    }

    #[test]
    fn small_and_empty_meshes() {
        let (coords, faces) = strip(3);
        let tree = AabbTree::construct(&coords, &faces, 5).unwrap();
        assert!(tree.is_leaf());
        assert_eq!((tree.depth(), tree.leaf_count()), (1, 1));

        let empty = AabbTree::construct(&[], &[], 5).unwrap();
        assert!(empty.bounds().is_none());
        assert_eq!((empty.depth(), empty.leaf_count()), (0, 0));
    }

    #[test]
    fn out_of_range_face_is_rejected() {
        let (coords, _) = strip(1);
        let err = AabbTree::construct(&coords, &[vec![0, 1, 7]], 5).unwrap_err();
        assert_eq!(err, SceneError::IndexOutOfRange { what: "face", list: 0, index: 7, len: 3 });
    }
}
