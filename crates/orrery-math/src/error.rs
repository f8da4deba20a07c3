// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use thiserror::Error;

/// Errors produced by the math kernel.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    /// The matrix cannot be inverted.
    #[error("singular matrix (determinant {determinant:e})")]
    Singular {
        /// Determinant that fell below the inversion threshold.
        determinant: f64,
    },
    /// A coordinate slice had the wrong number of components.
    #[error("invalid dimension: expected {expected}, found {found}")]
    InvalidDimension {
        /// Accepted dimension (or the smallest accepted one).
        expected: usize,
        /// Dimension that was supplied.
        found: usize,
    },
}
