// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::{Metric, Vec4};

/// Metric-dependent bilinear form on homogeneous coordinates.
///
/// The spatial part is the plain dot product of `x, y, z`; the `w·w` term is
/// subtracted (hyperbolic) or added (elliptic). Euclidean divides the spatial
/// part by `w_u·w_v` unless that product is `0` or `1`.
pub fn inner_product(u: &Vec4, v: &Vec4, metric: Metric) -> f64 {
    let spatial = u.xyz().dot(&v.xyz());
    let ww = u.w() * v.w();
    match metric {
        Metric::Hyperbolic => spatial - ww,
        Metric::Euclidean => {
            if ww == 1.0 || ww == 0.0 {
                spatial
            } else {
                spatial / ww
            }
        }
        Metric::Elliptic => spatial + ww,
    }
}

/// `inner_product(v, v, metric)`.
pub fn norm_squared(v: &Vec4, metric: Metric) -> f64 {
    inner_product(v, v, metric)
}

/// Distance between two homogeneous points under `metric`.
///
/// * Euclidean: `f64::MAX` when either point is at infinity.
/// * Hyperbolic: `f64::MAX` when either point lies on the absolute.
/// * Elliptic: angle between the representatives, in `[0, π]`.
pub fn distance_between(u: &Vec4, v: &Vec4, metric: Metric) -> f64 {
    match metric {
        Metric::Euclidean => euclidean_distance(u, v),
        Metric::Hyperbolic => hyperbolic_distance(u, v),
        Metric::Elliptic => elliptic_distance(u, v),
    }
}

fn euclidean_distance(u: &Vec4, v: &Vec4) -> f64 {
    let (ul, vl) = (u.w(), v.w());
    if ul == 0.0 || vl == 0.0 {
        return f64::MAX;
    }
    let d = (0..3)
        .map(|i| {
            let t = ul * v.component(i) - vl * u.component(i);
            t * t
        })
        .sum::<f64>()
        .sqrt();
    d / (ul * vl).abs()
}

fn hyperbolic_distance(u: &Vec4, v: &Vec4) -> f64 {
    let uu = norm_squared(u, Metric::Hyperbolic);
    let vv = norm_squared(v, Metric::Hyperbolic);
    if uu == 0.0 || vv == 0.0 {
        return f64::MAX;
    }
    let uv = inner_product(u, v, Metric::Hyperbolic);
    let k = uv / (uu * vv).abs().sqrt();
    if uu < 0.0 && vv < 0.0 {
        // Two interior points: |k| >= 1 up to rounding.
        k.abs().max(1.0).acosh()
    } else if (uu < 0.0) != (vv < 0.0) {
        k.asinh()
    } else {
        k.clamp(-1.0, 1.0).acos()
    }
}

fn elliptic_distance(u: &Vec4, v: &Vec4) -> f64 {
    let uu = norm_squared(u, Metric::Elliptic);
    let vv = norm_squared(v, Metric::Elliptic);
    let uv = inner_product(u, v, Metric::Elliptic);
    (uv / (uu * vv).abs().sqrt()).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_distance_is_scale_invariant() {
        let a = Vec4::point(1.0, 2.0, 3.0);
        let b = Vec4::new(8.0, 12.0, 6.0, 2.0);
        let d = distance_between(&a, &b, Metric::Euclidean);
        let expected = 5.0;
        assert!((d - expected).abs() < 1e-12, "d={d}");
    }

    #[test]
    fn euclidean_distance_divides_out_weights_at_unit_numerator() {
        // The weighted difference has length exactly 1 here.
        let u = Vec4::new(0.0, 0.0, 0.0, 2.0);
        let v = Vec4::new(0.0, 0.0, 0.5, 1.0);
        assert_eq!(distance_between(&u, &v, Metric::Euclidean), 0.5);
        assert_eq!(distance_between(&v, &u, Metric::Euclidean), 0.5);
    }

    #[test]
    fn infinite_points_are_infinitely_far() {
        let a = Vec4::ORIGIN;
        let b = Vec4::direction(1.0, 0.0, 0.0);
        assert_eq!(distance_between(&a, &b, Metric::Euclidean), f64::MAX);
        let on_absolute = Vec4::point(1.0, 0.0, 0.0);
        assert_eq!(distance_between(&a, &on_absolute, Metric::Hyperbolic), f64::MAX);
    }
}
