// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::MathError;
use orrery_scene::SceneError;
use thiserror::Error;

/// Errors surfaced by [`crate::PickSystem::compute_pick`].
///
/// Rays that hit nothing and degenerate geometry are not errors; they simply
/// contribute no hits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickError {
    /// `compute_pick` was called before `set_scene_root`.
    #[error("no scene root set")]
    NoSceneRoot,
    /// The component hierarchy is nested deeper than the configured limit.
    #[error("scene hierarchy deeper than {limit} components")]
    DepthExceeded {
        /// Configured `max_depth`.
        limit: usize,
    },
    /// A handle reachable from the root is stale.
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// An accumulated transform could not be inverted.
    #[error(transparent)]
    Math(#[from] MathError),
}
