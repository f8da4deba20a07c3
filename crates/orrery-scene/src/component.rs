// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::Mat4;

use crate::{Appearance, ComponentId, GeometryId};

/// Scene-graph node: optional transform, appearance, and geometry plus
/// ordered children.
///
/// Invisible or non-pickable components hide their whole subtree from
/// picking.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Display name (diagnostics only).
    pub name: String,
    /// Rendering visibility; `false` prunes the subtree.
    pub visible: bool,
    /// Pick participation; `false` prunes the subtree.
    pub pickable: bool,
    /// Local-to-parent transform; `None` is the identity.
    pub transform: Option<Mat4>,
    /// Attributes overriding the inherited ones.
    pub appearance: Option<Appearance>,
    /// Attached geometry.
    pub geometry: Option<GeometryId>,
    children: Vec<ComponentId>,
}

impl Default for Component {
    fn default() -> Self {
        Self::new("")
    }
}

impl Component {
    /// Visible, pickable component without transform, appearance, or geometry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            pickable: true,
            transform: None,
            appearance: None,
            geometry: None,
            children: Vec::new(),
        }
    }

    /// Sets the local transform.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Sets the appearance.
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    /// Attaches a geometry.
    pub fn with_geometry(mut self, geometry: GeometryId) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Sets visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets pickability.
    pub fn with_pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }

    /// Children in traversal order.
    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: ComponentId) {
        self.children.push(child);
    }

    /// Detaches `child`; returns `false` if it was not a child.
    pub fn remove_child(&mut self, child: ComponentId) -> bool {
        if let Some(pos) = self.children.iter().position(|c| *c == child) {
            self.children.remove(pos);
            true
        } else {
            false
        }
    }
}
