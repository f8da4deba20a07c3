// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use orrery_math::{p3, pn, Metric, Vec4};
use proptest::prelude::*;

fn approx_eq(a: f64, b: f64) {
    let diff = (a - b).abs();
    assert!(diff <= 1e-9, "expected {b}, got {a} (diff {diff})");
}

#[test]
fn plane_from_points_contains_its_points() {
    let a = Vec4::point(1.0, 0.0, 0.0);
    let b = Vec4::point(0.0, 1.0, 0.0);
    let c = Vec4::point(0.0, 0.0, 1.0);
    let plane = p3::plane_from_points(&a, &b, &c);
    for p in [a, b, c] {
        approx_eq(plane.dot(&p), 0.0);
    }
    assert!(plane.dot(&Vec4::ORIGIN).abs() > 0.5);
}

#[test]
fn collinear_points_give_zero_plane() {
    let plane = p3::plane_from_points(
        &Vec4::point(0.0, 0.0, 0.0),
        &Vec4::point(1.0, 1.0, 1.0),
        &Vec4::point(2.0, 2.0, 2.0),
    );
    assert_eq!(plane.to_array(), [0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn line_intersect_plane_hits_z_plane() {
    let plane = Vec4::new(0.0, 0.0, 1.0, -2.0); // z = 2
    let p = p3::line_intersect_plane(
        &Vec4::point(1.0, 1.0, 0.0),
        &Vec4::point(1.0, 1.0, 4.0),
        &plane,
    );
    assert_eq!(p.to_array(), [1.0, 1.0, 2.0, 1.0]);
}

#[test]
fn line_in_plane_returns_first_point() {
    let plane = Vec4::new(0.0, 0.0, 1.0, 0.0);
    let a = Vec4::point(1.0, 0.0, 0.0);
    let p = p3::line_intersect_plane(&a, &Vec4::point(0.0, 1.0, 0.0), &plane);
    assert_eq!(p, a);
}

#[test]
fn barycentric_weights_reconstruct_point() {
    let from = Vec4::point(0.0, 0.0, 0.0);
    let to = Vec4::point(0.0, 0.0, 1.0);
    let [a, b] = p3::barycentric_coordinates(&from, &to, &Vec4::point(0.0, 0.0, 0.4));
    approx_eq(a, 0.6);
    approx_eq(b, 0.4);
}

#[test]
fn off_line_point_is_projected_first() {
    let from = Vec4::point(0.0, 0.0, 0.0);
    let to = Vec4::point(0.0, 0.0, 1.0);
    let [a, b] = p3::barycentric_coordinates(&from, &to, &Vec4::point(1.0, 0.0, 0.4));
    approx_eq(a, 0.6);
    approx_eq(b, 0.4);
}

#[test]
fn affine_coordinate_orders_points_along_the_ray() {
    let from = Vec4::point(0.0, 0.0, 0.0);
    let to = Vec4::point(0.0, 0.0, 1.0);
    approx_eq(p3::affine_coordinate(&from, &to, &from), 0.0);
    approx_eq(p3::affine_coordinate(&from, &to, &Vec4::point(0.0, 0.0, 0.4)), 0.4 / 0.6);
    assert!(p3::affine_coordinate(&from, &to, &Vec4::point(0.0, 0.0, -1.0)) < 0.0);
    assert_eq!(p3::affine_coordinate(&from, &to, &to), f64::MAX);
}

#[test]
fn elliptic_distance_is_an_angle() {
    let d = pn::distance_between(
        &Vec4::new(1.0, 0.0, 0.0, 0.0),
        &Vec4::new(0.0, 0.0, 0.0, 1.0),
        Metric::Elliptic,
    );
    approx_eq(d, core::f64::consts::FRAC_PI_2);
}

#[test]
fn hyperbolic_distance_from_origin() {
    // tanh(d) = |x| for a point (x, 0, 0, 1) inside the unit ball.
    let d = pn::distance_between(&Vec4::ORIGIN, &Vec4::point(0.5, 0.0, 0.0), Metric::Hyperbolic);
    approx_eq(d, 0.5_f64.atanh());
}

proptest! {
    #[test]
    fn affine_coordinate_increases_along_segment(t0 in 0.01f64..0.49, dt in 0.01f64..0.49) {
        let from = Vec4::point(-1.0, 2.0, 0.5);
        let to = Vec4::point(3.0, -1.0, 4.0);
        let at = |t: f64| Vec4::linear_combination(1.0 - t, &from, t, &to);
        let near = p3::affine_coordinate(&from, &to, &at(t0));
        let far = p3::affine_coordinate(&from, &to, &at(t0 + dt));
        prop_assert!(near > 0.0);
        prop_assert!(far > near);
    }
}
