// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::{TOLERANCE, Vec4};

/// Plane through three homogeneous points, as a covector `(a, b, c, d)`.
///
/// A point `p` lies on the plane iff `plane · p == 0`. Collinear or
/// coincident inputs yield the zero vector.
pub fn plane_from_points(p1: &Vec4, p2: &Vec4, p3: &Vec4) -> Vec4 {
    let [a0, a1, a2, a3] = p1.to_array();
    let [b0, b1, b2, b3] = p2.to_array();
    let [c0, c1, c2, c3] = p3.to_array();
    let x = a1 * (b2 * c3 - b3 * c2) - a2 * (b1 * c3 - b3 * c1) + a3 * (b1 * c2 - b2 * c1);
    let y = a0 * (b2 * c3 - b3 * c2) - a2 * (b0 * c3 - b3 * c0) + a3 * (b0 * c2 - b2 * c0);
    let z = a0 * (b1 * c3 - b3 * c1) - a1 * (b0 * c3 - b3 * c0) + a3 * (b0 * c1 - b1 * c0);
    let w = a0 * (b1 * c2 - b2 * c1) - a1 * (b0 * c2 - b2 * c0) + a2 * (b0 * c1 - b1 * c0);
    Vec4::new(-x, y, -z, w)
}

/// Intersection of the line `p1 p2` with `plane`, dehomogenized.
///
/// When both points already lie in the plane, `p1` is returned unchanged.
pub fn line_intersect_plane(p1: &Vec4, p2: &Vec4, plane: &Vec4) -> Vec4 {
    let k1 = p1.dot(plane);
    let k2 = p2.dot(plane);
    if k1 == 0.0 && k2 == 0.0 {
        return *p1;
    }
    Vec4::linear_combination(k2, p1, -k1, p2).dehomogenize()
}

/// Weights `[a, b]` with `p ≈ a·p0 + b·p1` in homogeneous coordinates.
///
/// A `p` off the line is first replaced by the foot of its perpendicular
/// along `p0 - p1`. Returns `[0, 0]` when `p0` and `p1` are dependent.
pub fn barycentric_coordinates(p0: &Vec4, p1: &Vec4, p: &Vec4) -> [f64; 2] {
    let plane = plane_from_points(p0, p1, p);
    let p = if plane.to_array().iter().all(|c| c.abs() <= TOLERANCE) {
        *p
    } else {
        let normal = p0.sub(p1);
        let offset = -normal.xyz().dot(&p.xyz());
        let [nx, ny, nz, _] = normal.to_array();
        line_intersect_plane(p0, p1, &Vec4::new(nx, ny, nz, offset))
    };

    let mut pair = None;
    'search: for i in 0..3 {
        for j in (i + 1)..4 {
            let det = p0.component(i) * p1.component(j) - p0.component(j) * p1.component(i);
            if det.abs() > TOLERANCE {
                pair = Some((i, j, det));
                break 'search;
            }
        }
    }
    let Some((i, j, det)) = pair else {
        return [0.0, 0.0];
    };
    let (a, b) = (p0.component(i), p1.component(i));
    let (c, d) = (p0.component(j), p1.component(j));
    [
        (d * p.component(i) - b * p.component(j)) / det,
        (-c * p.component(i) + a * p.component(j)) / det,
    ]
}

/// Affine coordinate of `p` on the line `from → to`.
///
/// With `p ≈ a·from + b·to` this is `b / a`: `0` at `from`, positive between
/// `from` and `to` (and beyond `to`), negative behind `from`. Saturates to
/// `±f64::MAX` when `a == 0`.
pub fn affine_coordinate(from: &Vec4, to: &Vec4, p: &Vec4) -> f64 {
    affine_from_weights(barycentric_coordinates(from, to, p))
}

/// [`affine_coordinate`] for weights already computed by
/// [`barycentric_coordinates`].
pub fn affine_from_weights([a, b]: [f64; 2]) -> f64 {
    if b == 0.0 {
        0.0
    } else if a != 0.0 {
        b / a
    } else if b < 0.0 {
        -f64::MAX
    } else {
        f64::MAX
    }
}
