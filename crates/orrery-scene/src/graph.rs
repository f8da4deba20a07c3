// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::fmt;

use crate::{Component, Geometry, SceneError};

/// Generational handle to a [`Component`] owned by a [`SceneGraph`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ComponentId {
    slot: u32,
    generation: u32,
}

/// Generational handle to a [`Geometry`] owned by a [`SceneGraph`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct GeometryId {
    slot: u32,
    generation: u32,
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}v{}", self.slot, self.generation)
    }
}

impl fmt::Display for GeometryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}v{}", self.slot, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot vector with a free list; handles compare generations on every access.
struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { slots: Vec::new(), free: Vec::new() }
    }
}

impl<T> Arena<T> {
    fn insert(&mut self, value: T) -> (u32, u32) {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.value = Some(value);
            return (slot, entry.generation);
        }
        let slot = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot { generation: 0, value: Some(value) });
        (slot, 0)
    }

    fn get(&self, slot: u32, generation: u32) -> Option<&T> {
        self.slots
            .get(slot as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.value.as_ref())
    }

    fn get_mut(&mut self, slot: u32, generation: u32) -> Option<&mut T> {
        self.slots
            .get_mut(slot as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.value.as_mut())
    }

    fn remove(&mut self, slot: u32, generation: u32) -> Option<T> {
        let entry = self.slots.get_mut(slot as usize)?;
        if entry.generation != generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(slot);
        Some(value)
    }
}

struct GeometryEntry {
    geometry: Geometry,
    revision: u64,
}

/// Owner of every component and geometry in a scene.
///
/// Components may be shared by several parents (the graph is a DAG), but
/// [`SceneGraph::add_child`] refuses edges that would close a cycle.
#[derive(Default)]
pub struct SceneGraph {
    components: Arena<Component>,
    geometries: Arena<GeometryEntry>,
}

impl SceneGraph {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `component` into the arena.
    ///
    /// Children listed on the value are kept as-is; prefer
    /// [`SceneGraph::add_child`] so cycles are rejected.
    pub fn add_component(&mut self, component: Component) -> ComponentId {
        let (slot, generation) = self.components.insert(component);
        ComponentId { slot, generation }
    }

    /// Moves `geometry` into the arena at revision `0`.
    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        let (slot, generation) = self.geometries.insert(GeometryEntry { geometry, revision: 0 });
        GeometryId { slot, generation }
    }

    /// Appends `child` to the children of `parent`.
    ///
    /// # Errors
    /// Stale handles, or [`SceneError::Cycle`] when `parent` is reachable
    /// from `child`.
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), SceneError> {
        self.component(child)?;
        self.component(parent)?;
        if self.reaches(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        self.component_mut(parent)?.push_child(child);
        Ok(())
    }

    /// Depth-first reachability over child edges.
    fn reaches(&self, from: ComponentId, target: ComponentId) -> bool {
        let mut stack = vec![from];
        let mut seen = Vec::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Ok(c) = self.component(id) {
                stack.extend(c.children().iter().copied());
            }
        }
        false
    }

    /// Shared access to a component.
    pub fn component(&self, id: ComponentId) -> Result<&Component, SceneError> {
        self.components
            .get(id.slot, id.generation)
            .ok_or(SceneError::StaleComponent(id))
    }

    /// Mutable access to a component.
    pub fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component, SceneError> {
        self.components
            .get_mut(id.slot, id.generation)
            .ok_or(SceneError::StaleComponent(id))
    }

    /// Shared access to a geometry.
    pub fn geometry(&self, id: GeometryId) -> Result<&Geometry, SceneError> {
        self.geometries
            .get(id.slot, id.generation)
            .map(|e| &e.geometry)
            .ok_or(SceneError::StaleGeometry(id))
    }

    /// Mutable access to a geometry; bumps its revision.
    pub fn geometry_mut(&mut self, id: GeometryId) -> Result<&mut Geometry, SceneError> {
        let entry = self
            .geometries
            .get_mut(id.slot, id.generation)
            .ok_or(SceneError::StaleGeometry(id))?;
        entry.revision += 1;
        Ok(&mut entry.geometry)
    }

    /// Number of times the geometry has been handed out mutably.
    pub fn geometry_revision(&self, id: GeometryId) -> Result<u64, SceneError> {
        self.geometries
            .get(id.slot, id.generation)
            .map(|e| e.revision)
            .ok_or(SceneError::StaleGeometry(id))
    }

    /// Attaches (or detaches with `None`) a geometry to a component.
    pub fn set_geometry(
        &mut self,
        component: ComponentId,
        geometry: Option<GeometryId>,
    ) -> Result<(), SceneError> {
        if let Some(g) = geometry {
            self.geometry(g)?;
        }
        self.component_mut(component)?.geometry = geometry;
        Ok(())
    }

    /// Frees a geometry slot and returns the geometry.
    ///
    /// Components still referring to `id` will fail lookups with
    /// [`SceneError::StaleGeometry`].
    pub fn remove_geometry(&mut self, id: GeometryId) -> Result<Geometry, SceneError> {
        self.geometries
            .remove(id.slot, id.generation)
            .map(|e| e.geometry)
            .ok_or(SceneError::StaleGeometry(id))
    }

    /// `true` while `id` names a live geometry.
    pub fn is_alive(&self, id: GeometryId) -> bool {
        self.geometries.get(id.slot, id.generation).is_some()
    }
}
