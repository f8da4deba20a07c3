// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::{Mat4, Vec4};
use orrery_scene::{Component, ComponentId, Geometry, GeometryId, IndexedFaceSet, SceneGraph, SceneGraphPath};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument, trace, warn};

use crate::brute_force::{
    intersect_cylinder, intersect_edges, intersect_points, intersect_polygons, intersect_sphere, RayQuery,
};
use crate::{sort_hits, CachedTree, Hit, PickConfig, PickError, PickInfo, PickResult, TreeCache, TreePolicy};

/// Entry point for ray picking.
pub trait PickSystem {
    /// Component the traversal starts from.
    fn set_scene_root(&mut self, root: ComponentId);

    /// Every hit of the ray `from → to` in front of `from`, nearest first.
    ///
    /// `to` may be a point at infinity. An empty list means the ray hits nothing.
    fn compute_pick(&mut self, scene: &SceneGraph, from: &Vec4, to: &Vec4) -> Result<Vec<Hit>, PickError>;
}

/// Depth-first pick traversal with cached per-mesh [`crate::AabbTree`]s.
///
/// Trees persist across [`PickSystem::compute_pick`] calls and are rebuilt
/// when a mesh's revision changes.
#[derive(Debug, Default)]
pub struct AabbPickSystem {
    root: Option<ComponentId>,
    config: PickConfig,
    cache: TreeCache,
}

impl AabbPickSystem {
    /// System with the default [`PickConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// System with `config`.
    pub fn with_config(config: PickConfig) -> Self {
        Self::with_cache(config, TreeCache::new())
    }

    /// System reusing an existing tree cache.
    pub fn with_cache(config: PickConfig, cache: TreeCache) -> Self {
        Self { root: None, config, cache }
    }

    /// Active configuration.
    pub fn config(&self) -> &PickConfig {
        &self.config
    }

    /// Current scene root.
    pub fn scene_root(&self) -> Option<ComponentId> {
        self.root
    }

    /// Tree cache.
    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    /// Mutable tree cache, for explicit invalidation.
    pub fn cache_mut(&mut self) -> &mut TreeCache {
        &mut self.cache
    }

    /// Consumes the system and returns its cache.
    pub fn into_cache(self) -> TreeCache {
        self.cache
    }
}

impl PickSystem for AabbPickSystem {
    fn set_scene_root(&mut self, root: ComponentId) {
        self.root = Some(root);
    }

    #[instrument(level = "debug", skip(self, scene), fields(root = ?self.root))]
    fn compute_pick(&mut self, scene: &SceneGraph, from: &Vec4, to: &Vec4) -> Result<Vec<Hit>, PickError> {
        let root = self.root.ok_or(PickError::NoSceneRoot)?;
        let metric = scene.component(root)?.appearance.and_then(|a| a.metric).unwrap_or_default();
        self.cache.retain_alive(scene);

        let mut walk = Traversal {
            scene,
            max_depth: self.config.max_depth,
            policy: TreePolicy::from_config(&self.config),
            cache: &mut self.cache,
            from: *from,
            to: *to,
            path: SceneGraphPath::new(),
            pickable: FxHashMap::default(),
            hits: Vec::new(),
        };
        let base = Frame { m: Mat4::identity(), m_inv: Mat4::identity(), info: PickInfo::root(metric, &self.config) };
        walk.visit(root, &base)?;

        let mut hits = walk.hits;
        sort_hits(&mut hits);
        debug!(hits = hits.len(), "pick complete");
        Ok(hits)
    }
}

/// State inherited by a component's contents.
struct Frame {
    m: Mat4,
    m_inv: Mat4,
    info: PickInfo,
}

struct Traversal<'a> {
    scene: &'a SceneGraph,
    max_depth: usize,
    policy: TreePolicy,
    cache: &'a mut TreeCache,
    from: Vec4,
    to: Vec4,
    path: SceneGraphPath,
    /// Geometry-level pickability, looked up once per traversal.
    pickable: FxHashMap<GeometryId, bool>,
    hits: Vec<Hit>,
}

impl Traversal<'_> {
    fn visit(&mut self, id: ComponentId, parent: &Frame) -> Result<(), PickError> {
        let scene = self.scene;
        let component = scene.component(id)?;
        if !component.visible || !component.pickable {
            trace!(component = %id, "skipped hidden subtree");
            return Ok(());
        }
        let info = match &component.appearance {
            Some(appearance) if appearance.pickable == Some(false) => {
                trace!(component = %id, "skipped unpickable subtree");
                return Ok(());
            }
            Some(appearance) => parent.info.derive(appearance),
            None => parent.info,
        };
        if self.path.len() >= self.max_depth {
            warn!(limit = self.max_depth, path = %self.path, "scene hierarchy too deep to pick");
            return Err(PickError::DepthExceeded { limit: self.max_depth });
        }
        let frame = match component.transform {
            Some(t) => {
                let m = parent.m * t;
                Frame { m, m_inv: m.inverse()?, info }
            }
            None => Frame { m: parent.m, m_inv: parent.m_inv, info },
        };

        self.path.push(id);
        let result = self.visit_contents(component, &frame);
        self.path.pop();
        result
    }

    fn visit_contents(&mut self, component: &Component, frame: &Frame) -> Result<(), PickError> {
        if let Some(geometry) = component.geometry {
            self.visit_geometry(geometry, frame)?;
        }
        for &child in component.children() {
            self.visit(child, frame)?;
        }
        Ok(())
    }

    fn visit_geometry(&mut self, id: GeometryId, frame: &Frame) -> Result<(), PickError> {
        let scene = self.scene;
        let geometry = scene.geometry(id)?;
        let pickable = *self.pickable.entry(id).or_insert_with(|| geometry.attributes().pickable != Some(false));
        if !pickable {
            return Ok(());
        }

        let info = &frame.info;
        let radius_scale = if info.radii_world_coordinates { 1.0 / frame.m.scaling_factor(info.metric) } else { 1.0 };
        let point_radius = info.point_radius * radius_scale;
        let tube_radius = info.tube_radius * radius_scale;
        let query = RayQuery::with_inverse(self.path.push_geometry(id), frame.m, frame.m_inv, self.from, self.to)
            .with_metric(info.metric);

        let mut found = Vec::new();
        match geometry {
            Geometry::Sphere(_) => {
                if info.pick_faces {
                    intersect_sphere(&query, &mut found);
                }
            }
            Geometry::Cylinder(_) => {
                if info.pick_faces {
                    intersect_cylinder(&query, &mut found);
                }
            }
            Geometry::PointSet(points) => {
                if info.pick_points {
                    intersect_points(points, point_radius, &query, &mut found);
                }
            }
            Geometry::IndexedLineSet(lines) => {
                if info.pick_points {
                    intersect_points(lines.as_point_set(), point_radius, &query, &mut found);
                }
                if info.pick_edges {
                    intersect_edges(lines, tube_radius, &query, &mut found);
                }
            }
            Geometry::IndexedFaceSet(mesh) => {
                if info.pick_points {
                    intersect_points(mesh.as_point_set(), point_radius, &query, &mut found);
                }
                if info.pick_edges {
                    intersect_edges(mesh.as_line_set(), tube_radius, &query, &mut found);
                }
                if info.pick_faces {
                    self.intersect_faces(id, mesh, &query, &mut found)?;
                }
            }
        }
        self.keep_in_front(found);
        Ok(())
    }

    fn intersect_faces(
        &mut self,
        id: GeometryId,
        mesh: &IndexedFaceSet,
        query: &RayQuery,
        found: &mut Vec<Hit>,
    ) -> Result<(), PickError> {
        let revision = self.scene.geometry_revision(id)?;
        match self.cache.lookup(id, revision, mesh, &self.policy) {
            CachedTree::Accelerated(tree) => tree.intersect(query, found),
            CachedTree::BruteForce => intersect_polygons(mesh, query, found),
        }
        Ok(())
    }

    fn keep_in_front(&mut self, found: Vec<Hit>) {
        for hit in found {
            if hit.affine_coordinate() < 0.0 {
                trace!(
                    pick_type = %hit.pick_type(),
                    affine = hit.affine_coordinate(),
                    "dropped hit behind ray origin"
                );
                continue;
            }
            self.hits.push(hit);
        }
    }
}
