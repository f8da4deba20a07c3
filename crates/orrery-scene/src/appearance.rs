// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::Metric;

/// Point-shader attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointShader {
    /// Overrides vertex pickability.
    pub pickable: Option<bool>,
    /// Sphere radius used for point picking; wins over [`Appearance::point_radius`].
    pub point_radius: Option<f64>,
}

/// Line-shader attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineShader {
    /// Overrides edge pickability while edges are drawn.
    pub pickable: Option<bool>,
    /// Tube radius used for edge picking; wins over [`Appearance::tube_radius`].
    pub tube_radius: Option<f64>,
}

/// Polygon-shader attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolygonShader {
    /// Overrides face pickability while faces are drawn.
    pub pickable: Option<bool>,
}

/// Attribute set attached to a component.
///
/// Every field is optional; `None` means "inherit from the nearest ancestor
/// that sets it".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Appearance {
    /// Draw (and by default pick) vertices.
    pub vertex_draw: Option<bool>,
    /// Draw (and by default pick) edges.
    pub edge_draw: Option<bool>,
    /// Draw (and by default pick) faces.
    pub face_draw: Option<bool>,
    /// Point-shader namespace.
    pub point_shader: PointShader,
    /// Line-shader namespace.
    pub line_shader: LineShader,
    /// Polygon-shader namespace.
    pub polygon_shader: PolygonShader,
    /// Generic point radius.
    pub point_radius: Option<f64>,
    /// Generic tube radius.
    pub tube_radius: Option<f64>,
    /// Ambient metric.
    pub metric: Option<Metric>,
    /// Interpret radii in world units rather than object units.
    pub radii_world_coordinates: Option<bool>,
    /// `Some(false)` prunes the component's subtree from picking.
    pub pickable: Option<bool>,
}

impl Appearance {
    /// Empty (fully inheriting) appearance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `vertex_draw`.
    pub fn with_vertex_draw(mut self, on: bool) -> Self {
        self.vertex_draw = Some(on);
        self
    }

    /// Sets `edge_draw`.
    pub fn with_edge_draw(mut self, on: bool) -> Self {
        self.edge_draw = Some(on);
        self
    }

    /// Sets `face_draw`.
    pub fn with_face_draw(mut self, on: bool) -> Self {
        self.face_draw = Some(on);
        self
    }

    /// Sets `point_radius`.
    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = Some(radius);
        self
    }

    /// Sets `tube_radius`.
    pub fn with_tube_radius(mut self, radius: f64) -> Self {
        self.tube_radius = Some(radius);
        self
    }

    /// Sets `metric`.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Sets `radii_world_coordinates`.
    pub fn with_radii_world_coordinates(mut self, on: bool) -> Self {
        self.radii_world_coordinates = Some(on);
        self
    }

    /// Sets the legacy component-level `pickable` flag.
    pub fn with_pickable(mut self, on: bool) -> Self {
        self.pickable = Some(on);
        self
    }
}
