// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::{Mat4, MathError, Vec4};

use crate::frustum::FrustumView;
use crate::{Hit, PickResult};

/// Predicate deciding whether a hit survives [`filter_list`].
pub trait HitFilter {
    /// `true` keeps `hit`.
    fn accept(&self, from: &Vec4, to: &Vec4, hit: &Hit) -> bool;
}

impl<F> HitFilter for F
where
    F: Fn(&Vec4, &Vec4, &Hit) -> bool,
{
    fn accept(&self, from: &Vec4, to: &Vec4, hit: &Hit) -> bool {
        self(from, to, hit)
    }
}

/// Removes the hits `filter` rejects, keeping the order of the rest.
pub fn filter_list(filter: &impl HitFilter, from: &Vec4, to: &Vec4, hits: &mut Vec<Hit>) {
    hits.retain(|hit| filter.accept(from, to, hit));
}

/// Keeps hits whose device-space `w` is non-negative, i.e. hits not behind the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositiveWFilter {
    world_to_ndc: Mat4,
}

impl PositiveWFilter {
    /// Filter through an explicit world-to-NDC matrix.
    pub fn new(world_to_ndc: Mat4) -> Self {
        Self { world_to_ndc }
    }

    /// Filter for `view`.
    pub fn from_view(view: &impl FrustumView) -> Result<Self, MathError> {
        Ok(Self::new(view.world_to_ndc()?))
    }
}

impl HitFilter for PositiveWFilter {
    fn accept(&self, _from: &Vec4, _to: &Vec4, hit: &Hit) -> bool {
        self.world_to_ndc.transform(&hit.world_coordinates()).w() >= 0.0
    }
}
