// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use orrery_math::Vec3;

/// Axis-aligned box stored as center and half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    center: Vec3,
    extent: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self { center: Vec3::ZERO, extent: Vec3::ZERO }
    }
}

impl Aabb {
    /// Box from center and half-extents.
    pub fn new(center: Vec3, extent: Vec3) -> Self {
        Self { center, extent }
    }

    /// Tightest box around `points`; `None` when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self::from_min_max(&min, &max))
    }

    /// Box spanning `min..=max`.
    pub fn from_min_max(min: &Vec3, max: &Vec3) -> Self {
        Self { center: min.add(max).scale(0.5), extent: max.sub(min).scale(0.5) }
    }

    /// Center.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Half-extents.
    pub fn extent(&self) -> Vec3 {
        self.extent
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        self.center.sub(&self.extent)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        self.center.add(&self.extent)
    }

    /// `true` when `p` lies inside the box grown by `tolerance` on every side.
    pub fn contains(&self, p: &Vec3, tolerance: f64) -> bool {
        (0..3).all(|i| (p.component(i) - self.center.component(i)).abs() <= self.extent.component(i) + tolerance)
    }

    /// Index of the longest axis; ties prefer y over x and z over both.
    pub fn longest_axis(&self) -> usize {
        let [ex, ey, ez] = self.extent.to_array();
        if ex > ey {
            if ex > ez {
                0
            } else {
                2
            }
        } else if ey > ez {
            1
        } else {
            2
        }
    }

    /// Separating-axis test of the ray `origin + t·dir, t ≥ 0` against the box.
    ///
    /// Conservative: every ray that meets the box passes, and a ray that
    /// starts inside always passes. `dir` need not be normalized.
    pub fn intersects(&self, origin: &Vec3, dir: &Vec3) -> bool {
        let diff = origin.sub(&self.center);
        let [ex, ey, ez] = self.extent.to_array();
        let [dx, dy, dz] = diff.to_array();
        let [rx, ry, rz] = dir.to_array();

        if (dx.abs() > ex && dx * rx >= 0.0)
            || (dy.abs() > ey && dy * ry >= 0.0)
            || (dz.abs() > ez && dz * rz >= 0.0)
        {
            return false;
        }

        let w = dir.cross(&diff);
        let (arx, ary, arz) = (rx.abs(), ry.abs(), rz.abs());
        !(w.x().abs() > ey * arz + ez * ary
            || w.y().abs() > ex * arz + ez * arx
            || w.z().abs() > ex * ary + ey * arx)
    }
}
