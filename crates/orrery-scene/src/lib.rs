// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! orrery-scene: the scene graph consumed by picking.
//!
//! Components and geometries live in a [`SceneGraph`] arena and are named by
//! generational handles ([`ComponentId`], [`GeometryId`]). A removed slot is
//! reused with a fresh generation, so stale handles are detected instead of
//! silently aliasing new data.
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
    clippy::float_cmp
)]

mod appearance;
mod component;
mod error;
mod geometry;
mod graph;
mod path;

pub use appearance::{Appearance, LineShader, PointShader, PolygonShader};
pub use component::Component;
pub use error::SceneError;
pub use geometry::{
    Geometry, GeometryAttributes, GeometryKind, IndexedFaceSet, IndexedLineSet, PointSet,
};
pub use graph::{ComponentId, GeometryId, SceneGraph};
pub use path::SceneGraphPath;
