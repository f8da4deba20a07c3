// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
use orrery_math::{deg_to_rad, Mat4, Vec4};
use orrery_pick::filter::{filter_list, PositiveWFilter};
use orrery_pick::frustum::{get_frustum_interval, Camera};
use orrery_pick::{AabbPickSystem, Hit, PickResult, PickSystem, PickType};
use orrery_scene::{Component, Geometry, IndexedFaceSet, SceneGraph};

fn approx_eq(a: f64, b: f64, tol: f64) {
    let diff = (a - b).abs();
    assert!(diff <= tol, "expected {b}, got {a} (diff {diff})");
}

/// Camera at `(0, 0, 10)` looking down `-z`.
fn camera() -> Camera {
    Camera::perspective(deg_to_rad(45.0), 1.5, 1.0, 50.0).with_camera_to_world(Mat4::translation(0.0, 0.0, 10.0))
}

#[test]
fn clipped_ray_ends_on_the_far_plane_of_a_moved_camera() {
    let cam = camera();
    let from = Vec4::point(0.1, 0.0, 9.0);
    let mut to = Vec4::point(1.1, 0.0, -1.0);
    get_frustum_interval(&from, &mut to, &cam).unwrap();
    let [x, y, z, w] = to.to_array();
    // Far plane is 50 units in front of the eye; the ray keeps its slope.
    approx_eq(z, -40.0, 1e-6);
    approx_eq(x, 5.0, 1e-6);
    approx_eq(y, 0.0, 1e-9);
    approx_eq(w, 1.0, 0.0);
}

#[test]
fn clipped_ray_still_picks_what_the_original_ray_did() {
    let mut scene = SceneGraph::new();
    let g = scene.add_geometry(IndexedFaceSet::box_mesh(1.0, 1.0, 1.0).into());
    let root = scene.add_component(Component::new("cube").with_geometry(g));
    let mut picker = AabbPickSystem::new();
    picker.set_scene_root(root);

    let from = Vec4::point(0.0, 0.0, 9.0);
    let mut to = Vec4::point(0.0, 0.0, 8.0);
    get_frustum_interval(&from, &mut to, &camera()).unwrap();
    let hits = picker.compute_pick(&scene, &from, &to).unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.pick_type() == PickType::Face));
    // Affine coordinates are measured against the clipped interval.
    assert!(hits[0].segment_parameter() > 0.0 && hits[1].segment_parameter() < 1.0);
}

fn two_sphere_hits() -> (SceneGraph, Vec<Hit>, Vec4, Vec4) {
    let mut scene = SceneGraph::new();
    let g = scene.add_geometry(Geometry::sphere());
    let root = scene.add_component(Component::new("ball").with_geometry(g));
    let mut picker = AabbPickSystem::new();
    picker.set_scene_root(root);
    let (from, to) = (Vec4::point(0.0, 0.0, 5.0), Vec4::point(0.0, 0.0, -5.0));
    let hits = picker.compute_pick(&scene, &from, &to).unwrap();
    (scene, hits, from, to)
}

#[test]
fn closure_filter_keeps_order_of_survivors() {
    let (_, mut hits, from, to) = two_sphere_hits();
    assert_eq!(hits.len(), 2);
    let far_side = |_: &Vec4, _: &Vec4, hit: &Hit| hit.world_coordinates().dehomogenize_vec3().z() < 0.0;
    filter_list(&far_side, &from, &to, &mut hits);
    assert_eq!(hits.len(), 1);
    approx_eq(hits[0].world_coordinates().dehomogenize_vec3().z(), -1.0, 1e-12);
}

#[test]
fn positive_w_filter_drops_hits_behind_the_camera() {
    let (_, mut hits, from, to) = two_sphere_hits();
    // Camera at z = 0 looking down -z: the z = 1 hit is behind it.
    let cam = Camera::perspective(deg_to_rad(60.0), 1.0, 0.1, 100.0);
    let filter = PositiveWFilter::from_view(&cam).unwrap();
    filter_list(&filter, &from, &to, &mut hits);
    assert_eq!(hits.len(), 1);
    approx_eq(hits[0].world_coordinates().dehomogenize_vec3().z(), -1.0, 1e-12);
}
