// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::fmt;

use orrery_math::Mat4;

use crate::{ComponentId, GeometryId, SceneError, SceneGraph};

/// Root-to-leaf walk through the scene: a component chain optionally ending
/// in the geometry of its last component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SceneGraphPath {
    components: Vec<ComponentId>,
    geometry: Option<GeometryId>,
}

impl SceneGraphPath {
    /// Empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a component. Any terminal geometry is dropped.
    pub fn push(&mut self, component: ComponentId) {
        self.geometry = None;
        self.components.push(component);
    }

    /// Removes the terminal geometry if present, otherwise the last component.
    pub fn pop(&mut self) -> Option<ComponentId> {
        if self.geometry.take().is_some() {
            return self.components.last().copied();
        }
        self.components.pop()
    }

    /// Copy of this path ending in `geometry`.
    pub fn push_geometry(&self, geometry: GeometryId) -> Self {
        Self { components: self.components.clone(), geometry: Some(geometry) }
    }

    /// Last component on the path.
    pub fn last_component(&self) -> Option<ComponentId> {
        self.components.last().copied()
    }

    /// Terminal geometry, if the path ends in one.
    pub fn geometry(&self) -> Option<GeometryId> {
        self.geometry
    }

    /// Number of components (the geometry is not counted).
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// `true` when no component has been pushed.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components from root to leaf.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.iter().copied()
    }

    /// Object-to-world matrix: product of the component transforms, root first.
    pub fn matrix(&self, scene: &SceneGraph) -> Result<Mat4, SceneError> {
        let mut m = Mat4::identity();
        for id in &self.components {
            if let Some(t) = scene.component(*id)?.transform {
                m *= t;
            }
        }
        Ok(m)
    }

    /// World-to-object matrix.
    pub fn inverse_matrix(&self, scene: &SceneGraph) -> Result<Mat4, SceneError> {
        Ok(self.matrix(scene)?.inverse()?)
    }
}

impl fmt::Display for SceneGraphPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(" : ")?;
            }
            write!(f, "{c}")?;
        }
        if let Some(g) = self.geometry {
            write!(f, " : {g}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SceneGraphPath {
    type Item = ComponentId;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, ComponentId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter().copied()
    }
}
