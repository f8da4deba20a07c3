// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! orrery-math: homogeneous linear algebra for the Orrery scene graph.
//!
//! The kernel covers what scene traversal and ray picking need:
//! - `Vec3` / `Vec4` (homogeneous, `w = 0` encodes points at infinity),
//! - column-major `Mat4` with inversion and projection builders,
//! - [`Metric`]-aware inner products and distances ([`pn`]),
//! - projective 3-space incidence helpers ([`p3`]).
//!
//! All arithmetic is `f64`. Pick tolerances (`1e-5` row selection, `1e-3`
//! consistency checks) are not representable at `f32` precision.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::float_cmp
)]

mod error;
mod mat4;
mod metric;
mod vec3;
mod vec4;

/// Metric-aware inner products, norms, and distances.
pub mod pn;
/// Incidence helpers in real projective 3-space (planes, lines, affine coordinates).
pub mod p3;

pub use error::MathError;
pub use mat4::Mat4;
pub use metric::Metric;
pub use vec3::Vec3;
pub use vec4::Vec4;

/// Degeneracy threshold for lengths and normalization.
pub const EPSILON: f64 = 1e-12;

/// General-purpose numeric tolerance (squared residuals, collinearity tests).
pub const TOLERANCE: f64 = 1e-7;

/// Converts degrees to radians.
pub fn deg_to_rad(value: f64) -> f64 {
    value.to_radians()
}

/// Converts radians to degrees.
pub fn rad_to_deg(value: f64) -> f64 {
    value.to_degrees()
}
