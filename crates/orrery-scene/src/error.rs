// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::MathError;
use thiserror::Error;

use crate::{ComponentId, GeometryId};

/// Errors raised by scene construction and lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// The component handle refers to a freed or never-allocated slot.
    #[error("stale component handle {0}")]
    StaleComponent(ComponentId),
    /// The geometry handle refers to a freed or never-allocated slot.
    #[error("stale geometry handle {0}")]
    StaleGeometry(GeometryId),
    /// Attaching `child` under `parent` would make the graph cyclic.
    #[error("adding {child} under {parent} would create a cycle")]
    Cycle {
        /// Prospective parent.
        parent: ComponentId,
        /// Prospective child (already an ancestor of `parent`).
        child: ComponentId,
    },
    /// An index list refers past the end of the vertex array.
    #[error("{what} {list}: vertex index {index} out of range (vertex count {len})")]
    IndexOutOfRange {
        /// Kind of index list (`"face"` or `"edge"`).
        what: &'static str,
        /// Position of the offending list.
        list: usize,
        /// Offending vertex index.
        index: usize,
        /// Number of vertices.
        len: usize,
    },
    /// A per-element attribute does not have one entry per element.
    #[error("attribute {attribute}: expected {expected} entries, found {found}")]
    AttributeLength {
        /// Attribute name.
        attribute: &'static str,
        /// Required entry count.
        expected: usize,
        /// Supplied entry count.
        found: usize,
    },
    /// Coordinate or texture data had an unsupported dimension.
    #[error(transparent)]
    Math(#[from] MathError),
}
