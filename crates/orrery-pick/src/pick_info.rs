// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::Metric;
use orrery_scene::Appearance;

use crate::PickConfig;

/// Pick-relevant attributes in effect at one point of the traversal.
///
/// A child starts from its parent's info and overrides whatever its own
/// appearance sets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PickInfo {
    /// Test vertices.
    pub pick_points: bool,
    /// Test edges.
    pub pick_edges: bool,
    /// Test faces and primitives.
    pub pick_faces: bool,
    /// Vertices are drawn.
    pub draw_vertices: bool,
    /// Edges are drawn.
    pub draw_edges: bool,
    /// Faces are drawn.
    pub draw_faces: bool,
    /// Vertex sphere radius.
    pub point_radius: f64,
    /// Edge tube radius.
    pub tube_radius: f64,
    /// Metric for face and primitive distances.
    pub metric: Metric,
    /// Radii are in world units.
    pub radii_world_coordinates: bool,
}

impl PickInfo {
    /// Info at the scene root: everything drawn and pickable.
    pub fn root(metric: Metric, config: &PickConfig) -> Self {
        Self {
            pick_points: true,
            pick_edges: true,
            pick_faces: true,
            draw_vertices: true,
            draw_edges: true,
            draw_faces: true,
            point_radius: config.default_point_radius,
            tube_radius: config.default_tube_radius,
            metric,
            radii_world_coordinates: false,
        }
    }

    /// Info below a component carrying `appearance`.
    pub fn derive(&self, appearance: &Appearance) -> Self {
        let mut info = *self;
        if let Some(on) = appearance.vertex_draw {
            info.draw_vertices = on;
            info.pick_points = on;
        }
        if let Some(on) = appearance.point_shader.pickable {
            info.pick_points = on;
        }
        if let Some(on) = appearance.edge_draw {
            info.draw_edges = on;
            info.pick_edges = on;
        }
        if info.draw_edges {
            if let Some(on) = appearance.line_shader.pickable {
                info.pick_edges = on;
            }
        }
        if let Some(on) = appearance.face_draw {
            info.draw_faces = on;
            info.pick_faces = on;
        }
        if info.draw_faces {
            if let Some(on) = appearance.polygon_shader.pickable {
                info.pick_faces = on;
            }
        }
        if let Some(r) = appearance.point_shader.point_radius.or(appearance.point_radius) {
            info.point_radius = r;
        }
        if let Some(r) = appearance.line_shader.tube_radius.or(appearance.tube_radius) {
            info.tube_radius = r;
        }
        if let Some(metric) = appearance.metric {
            info.metric = metric;
        }
        if let Some(on) = appearance.radii_world_coordinates {
            info.radii_world_coordinates = on;
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use orrery_scene::{LineShader, PointShader, PolygonShader};

    use super::*;

    fn root() -> PickInfo {
        PickInfo::root(Metric::Euclidean, &PickConfig::default())
    }

    #[test]
    fn empty_appearance_changes_nothing() {
        assert_eq!(root().derive(&Appearance::new()), root());
    }

    #[test]
    fn shader_pickable_applies_only_while_drawn() {
        let hidden_edges = Appearance {
            edge_draw: Some(false),
            line_shader: LineShader { pickable: Some(true), ..LineShader::default() },
            ..Appearance::default()
        };
        let info = root().derive(&hidden_edges);
        assert!(!info.pick_edges);
        assert!(!info.draw_edges);

        let drawn_unpickable_faces = Appearance {
            polygon_shader: PolygonShader { pickable: Some(false) },
            ..Appearance::default()
        };
        let info = root().derive(&drawn_unpickable_faces);
        assert!(info.draw_faces);
        assert!(!info.pick_faces);
    }

    #[test]
    fn point_shader_pickable_overrides_vertex_draw() {
        let app = Appearance {
            vertex_draw: Some(false),
            point_shader: PointShader { pickable: Some(true), point_radius: None },
            ..Appearance::default()
        };
        let info = root().derive(&app);
        assert!(!info.draw_vertices);
        assert!(info.pick_points);
    }

    #[test]
    fn shader_radius_wins_over_generic_radius() {
        let app = Appearance {
            point_shader: PointShader { pickable: None, point_radius: Some(0.5) },
            line_shader: LineShader { pickable: None, tube_radius: None },
            ..Appearance::new().with_point_radius(0.2).with_tube_radius(0.3)
        };
        let info = root().derive(&app);
        assert_eq!(info.point_radius, 0.5);
        assert_eq!(info.tube_radius, 0.3);
    }

    #[test]
    fn metric_and_world_radii_are_inherited() {
        let parent = root().derive(&Appearance::new().with_metric(Metric::Hyperbolic).with_radii_world_coordinates(true));
        let child = parent.derive(&Appearance::new().with_face_draw(false));
        assert_eq!(child.metric, Metric::Hyperbolic);
        assert!(child.radii_world_coordinates);
        assert!(!child.pick_faces);
    }
}
