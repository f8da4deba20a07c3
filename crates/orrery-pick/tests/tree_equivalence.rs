// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
use orrery_math::{Vec3, Vec4};
use orrery_pick::brute_force::intersect_polygons;
use orrery_pick::{
    convert_to_bary, AabbPickSystem, AabbTree, CachedTree, Hit, PickConfig, PickResult, PickSystem, RayQuery,
};
use orrery_scene::{Component, IndexedFaceSet, SceneGraph};
use proptest::prelude::*;

fn soup(triangles: &[[f64; 9]]) -> IndexedFaceSet {
    let mut coords = Vec::with_capacity(triangles.len() * 3);
    let mut faces = Vec::with_capacity(triangles.len());
    for t in triangles {
        let base = coords.len();
        coords.extend(t.chunks_exact(3).map(|c| Vec4::point(c[0], c[1], c[2])));
        faces.push(vec![base, base + 1, base + 2]);
    }
    IndexedFaceSet::new(coords, faces).unwrap()
}

fn keyed(mut hits: Vec<Hit>) -> Vec<(Option<usize>, Option<usize>, [f64; 4])> {
    hits.sort_by_key(|h| (h.index(), h.secondary_index()));
    hits.iter().map(|h| (h.index(), h.secondary_index(), h.world_coordinates().to_array())).collect()
}

fn point() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-3.0f64..3.0)
}

proptest! {
    #[test]
    fn tree_and_brute_force_agree(
        triangles in prop::collection::vec(prop::array::uniform9(-2.0f64..2.0), 1..48),
        leaf in 1usize..8,
        from in point(),
        to in point(),
    ) {
        let mesh = soup(&triangles);
        let tree = AabbTree::from_face_set(&mesh, leaf);
        let query = RayQuery::world(Vec4::point(from[0], from[1], from[2]), Vec4::point(to[0], to[1], to[2]));

        let mut accelerated = Vec::new();
        tree.intersect(&query, &mut accelerated);
        let mut brute = Vec::new();
        intersect_polygons(&mesh, &query, &mut brute);
        prop_assert_eq!(keyed(accelerated), keyed(brute));
    }

    #[test]
    fn tree_boxes_contain_their_polygons(
        triangles in prop::collection::vec(prop::array::uniform9(-2.0f64..2.0), 1..48),
        leaf in 1usize..8,
    ) {
        let mesh = soup(&triangles);
        let tree = AabbTree::from_face_set(&mesh, leaf);
        let root = *tree.bounds().unwrap();
        let mut seen = 0;
        tree.visit_leaves(|bounds, faces| {
            seen += faces.len();
            for &f in faces {
                for &v in &mesh.faces()[f] {
                    let p = mesh.vertices()[v].xyz();
                    assert!(bounds.contains(&p, 1e-12));
                    assert!(root.contains(&p, 1e-12));
                }
            }
        });
        prop_assert_eq!(seen, triangles.len());
    }

    #[test]
    fn barycentric_weights_round_trip(
        a in point(),
        b in point(),
        c in point(),
        w0 in 0.0f64..1.0,
        w1 in 0.0f64..1.0,
    ) {
        let (p0, p1, p2) = (Vec3::from(a), Vec3::from(b), Vec3::from(c));
        prop_assume!(p1.sub(&p0).cross(&p2.sub(&p0)).length() > 0.1);
        let w2 = 1.0 - w0 - w1;
        let p = p0.scale(w0).add(&p1.scale(w1)).add(&p2.scale(w2));
        let got = convert_to_bary(&p0, &p1, &p2, &p).unwrap();
        for (g, w) in got.into_iter().zip([w0, w1, w2]) {
            prop_assert!((g - w).abs() < 1e-3, "got {:?}, want {:?}", got, [w0, w1, w2]);
        }
    }
}

#[test]
fn edited_mesh_gets_a_new_tree() {
    let mut scene = SceneGraph::new();
    let g = scene.add_geometry(IndexedFaceSet::box_mesh(1.0, 1.0, 1.0).with_pick_tree(true).into());
    let root = scene.add_component(Component::new("cube").with_geometry(g));
    let mut picker = AabbPickSystem::new();
    picker.set_scene_root(root);
    let (from, to) = (Vec4::point(0.0, 0.0, 5.0), Vec4::point(0.0, 0.0, -5.0));

    picker.compute_pick(&scene, &from, &to).unwrap();
    picker.compute_pick(&scene, &from, &to).unwrap();
    assert_eq!(picker.cache().builds(), 1);

    *scene.geometry_mut(g).unwrap() = IndexedFaceSet::box_mesh(2.0, 2.0, 2.0).with_pick_tree(true).into();
    let hits = picker.compute_pick(&scene, &from, &to).unwrap();
    assert_eq!(picker.cache().builds(), 2);
    assert_eq!(hits[0].world_coordinates().dehomogenize_vec3().z(), 2.0);

    assert!(picker.cache_mut().invalidate(g));
    picker.compute_pick(&scene, &from, &to).unwrap();
    assert_eq!(picker.cache().builds(), 3);
}

#[test]
fn large_meshes_get_a_tree_without_asking() {
    let pick_with = |config: PickConfig| {
        let mut scene = SceneGraph::new();
        let g = scene.add_geometry(IndexedFaceSet::sphere_mesh(1.0, 8, 8).into());
        let root = scene.add_component(Component::new("globe").with_geometry(g));
        let mut picker = AabbPickSystem::with_config(config);
        picker.set_scene_root(root);
        let hits = picker.compute_pick(&scene, &Vec4::point(0.1, 0.2, 3.0), &Vec4::point(0.1, 0.2, -3.0)).unwrap();
        let accelerated = matches!(picker.cache().get(g), Some(CachedTree::Accelerated(_)));
        (hits.len(), accelerated)
    };
    let brute = pick_with(PickConfig::default());
    let auto = pick_with(PickConfig { auto_tree_min_faces: Some(64), ..PickConfig::default() });
    assert_eq!(brute, (2, false));
    assert_eq!(auto, (2, true));
}

fn both_paths(mesh: &IndexedFaceSet, from: Vec4, to: Vec4) -> (Vec<Hit>, Vec<Hit>) {
    let tree = AabbTree::from_face_set(mesh, 1);
    let query = RayQuery::world(from, to);
    let mut accelerated = Vec::new();
    tree.intersect(&query, &mut accelerated);
    let mut brute = Vec::new();
    intersect_polygons(mesh, &query, &mut brute);
    (accelerated, brute)
}

#[test]
fn folded_quad_reports_both_crossings() {
    let quad = IndexedFaceSet::new(
        vec![
            Vec4::point(0.0, -1.0, 0.0),
            Vec4::point(1.0, -1.0, 1.0),
            Vec4::point(0.0, 1.0, 0.0),
            Vec4::point(-1.0, -1.0, 1.0),
        ],
        vec![vec![0, 1, 2, 3]],
    )
    .unwrap();
    let (accelerated, brute) = both_paths(&quad, Vec4::point(-5.0, -0.5, 0.5), Vec4::point(5.0, -0.5, 0.5));
    let brute = keyed(brute);
    assert_eq!(brute.len(), 2);
    assert_eq!(brute[0].0, Some(0));
    assert_eq!((brute[0].1, brute[1].1), (Some(0), Some(1)));
    assert!((brute[0].2[0] - 0.5).abs() < 1e-12);
    assert!((brute[1].2[0] + 0.5).abs() < 1e-12);
    assert_eq!(keyed(accelerated), brute);
}

#[test]
fn faces_behind_the_origin_are_skipped_by_both_paths() {
    // A triangle behind the origin and one in front, on the z axis.
    let mesh = soup(&[
        [-1.0, -1.0, -1.5, 1.0, -1.0, -1.5, 0.0, 1.0, -1.5],
        [-1.0, -1.0, 1.5, 1.0, -1.0, 1.5, 0.0, 1.0, 1.5],
    ]);
    let (accelerated, brute) = both_paths(&mesh, Vec4::ORIGIN, Vec4::point(0.0, 0.0, 5.0));
    let brute = keyed(brute);
    assert_eq!(brute.len(), 1);
    assert_eq!(brute[0].0, Some(1));
    assert_eq!(keyed(accelerated), brute);

    // With a finite end point the far triangle is past it.
    let (accelerated, brute) = both_paths(&mesh, Vec4::point(0.0, 0.0, -1.0), Vec4::ORIGIN);
    assert!(accelerated.is_empty());
    assert!(brute.is_empty());
}
