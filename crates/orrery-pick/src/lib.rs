// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! orrery-pick: which primitive does a ray hit first?
//!
//! The pipeline is
//! [`AabbPickSystem::compute_pick`](system::PickSystem::compute_pick) →
//! depth-first scene walk → per-geometry intersection ([`brute_force`] or a
//! cached [`AabbTree`]) → discard hits behind the ray origin → stable sort by
//! affine coordinate.
//!
//! Rays are pairs of homogeneous world points `(from, to)`; `to` may lie at
//! infinity. A point `a·from + b·to` is in front of the origin iff `a·b ≥ 0`.
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
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::float_cmp,
    clippy::many_single_char_names,
    clippy::suboptimal_flops
)]

mod aabb;
mod aabb_tree;
/// Stateless ray tests for polygons, tubes, spheres, and the canonical primitives.
pub mod brute_force;
mod cache;
pub mod config;
mod error;
/// Post-hoc hit filtering.
pub mod filter;
/// Clipping pick rays to the view frustum.
pub mod frustum;
mod hit;
mod pick_info;
mod system;

pub use aabb::Aabb;
pub use aabb_tree::{AabbTree, DEFAULT_POLYS_PER_LEAF};
pub use brute_force::RayQuery;
pub use cache::{CachedTree, TreeCache, TreePolicy};
pub use config::PickConfig;
pub use error::PickError;
pub use hit::{convert_to_bary, sort_hits, Hit, PickResult, PickType};
pub use pick_info::PickInfo;
pub use system::{AabbPickSystem, PickSystem};
