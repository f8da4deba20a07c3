// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::sync::Arc;

use orrery_scene::{GeometryId, IndexedFaceSet, SceneGraph};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{AabbTree, PickConfig};

/// How a face set is intersected.
#[derive(Debug, Clone)]
pub enum CachedTree {
    /// Through a prebuilt tree.
    Accelerated(Arc<AabbTree>),
    /// Polygon by polygon.
    BruteForce,
}

/// When to build a tree for a mesh, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreePolicy {
    /// Leaf capacity of new trees.
    pub max_polys_per_leaf: usize,
    /// Face count from which meshes get a tree without asking for one.
    pub auto_tree_min_faces: Option<usize>,
}

impl TreePolicy {
    /// Policy taken from `config`.
    pub fn from_config(config: &PickConfig) -> Self {
        Self { max_polys_per_leaf: config.max_polys_per_leaf, auto_tree_min_faces: config.auto_tree_min_faces }
    }

    /// `true` if `mesh` should be picked through a tree.
    pub fn wants_tree(&self, mesh: &IndexedFaceSet) -> bool {
        mesh.attributes().pick_tree || self.auto_tree_min_faces.is_some_and(|n| mesh.face_count() >= n)
    }
}

/// Per-geometry tree decisions, keyed by handle and valid for one revision.
///
/// Entries survive across picks; an edited mesh (new revision) or a reused
/// slot (new generation) gets a fresh decision. A policy change only affects
/// entries made afterwards, so call [`TreeCache::clear`] after changing it.
#[derive(Debug, Default)]
pub struct TreeCache {
    entries: FxHashMap<GeometryId, (u64, CachedTree)>,
    builds: usize,
}

impl TreeCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decision for `id` at `revision`, building a tree on first use.
    pub fn lookup(&mut self, id: GeometryId, revision: u64, mesh: &IndexedFaceSet, policy: &TreePolicy) -> CachedTree {
        if let Some((rev, cached)) = self.entries.get(&id) {
            if *rev == revision {
                return cached.clone();
            }
        }
        let cached = if policy.wants_tree(mesh) {
            let tree = AabbTree::from_face_set(mesh, policy.max_polys_per_leaf);
            debug!(
                geometry = %id,
                faces = tree.polygon_count(),
                leaves = tree.leaf_count(),
                depth = tree.depth(),
                "built pick tree"
            );
            self.builds += 1;
            CachedTree::Accelerated(Arc::new(tree))
        } else {
            CachedTree::BruteForce
        };
        self.entries.insert(id, (revision, cached.clone()));
        cached
    }

    /// Cached decision for `id`, whatever its revision.
    pub fn get(&self, id: GeometryId) -> Option<&CachedTree> {
        self.entries.get(&id).map(|(_, c)| c)
    }

    /// Forgets `id`; returns `true` if it was cached.
    pub fn invalidate(&mut self, id: GeometryId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops entries whose geometry no longer exists in `scene`.
    pub fn retain_alive(&mut self, scene: &SceneGraph) {
        self.entries.retain(|id, _| scene.is_alive(*id));
    }

    /// Number of cached decisions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Trees built over the cache's lifetime.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn revision_bump_rebuilds_once() {
        let mut scene = SceneGraph::new();
        let mesh = IndexedFaceSet::box_mesh(1.0, 1.0, 1.0).with_pick_tree(true);
        let id = scene.add_geometry(mesh.clone().into());
        let policy = TreePolicy::from_config(&PickConfig::default());
        let mut cache = TreeCache::new();

        let rev = scene.geometry_revision(id).unwrap();
        assert!(matches!(cache.lookup(id, rev, &mesh, &policy), CachedTree::Accelerated(_)));
        assert!(matches!(cache.lookup(id, rev, &mesh, &policy), CachedTree::Accelerated(_)));
        assert_eq!(cache.builds(), 1);

        scene.geometry_mut(id).unwrap();
        let rev = scene.geometry_revision(id).unwrap();
        cache.lookup(id, rev, &mesh, &policy);
        assert_eq!(cache.builds(), 2);
        assert_eq!(cache.len(), 1);

        scene.remove_geometry(id).unwrap();
        cache.retain_alive(&scene);
        assert!(cache.is_empty());
    }

    #[test]
    fn auto_threshold_selects_the_tree() {
        let mesh = IndexedFaceSet::box_mesh(1.0, 1.0, 1.0);
        let manual = TreePolicy { max_polys_per_leaf: 5, auto_tree_min_faces: None };
        let auto = TreePolicy { auto_tree_min_faces: Some(6), ..manual };
        assert!(!manual.wants_tree(&mesh));
        assert!(auto.wants_tree(&mesh));
        assert!(!TreePolicy { auto_tree_min_faces: Some(7), ..manual }.wants_tree(&mesh));
    }
}
