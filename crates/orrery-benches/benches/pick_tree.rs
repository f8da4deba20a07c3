// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use orrery_math::Vec4;
use orrery_pick::{AabbPickSystem, AabbTree, PickSystem, DEFAULT_POLYS_PER_LEAF};
use orrery_scene::{Component, ComponentId, IndexedFaceSet, SceneGraph};
use tracing_subscriber::filter::LevelFilter;

fn install_subscriber() {
    let _ = tracing_subscriber::fmt().with_max_level(LevelFilter::WARN).without_time().try_init();
}

/// `n * n` unit-cell quads packed into `[0, 0.1]^2` plus a fan of large
/// triangles reaching out to `x = 10`.
fn skewed_mesh(n: usize) -> IndexedFaceSet {
    let cell = 0.1 / n as f64;
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for i in 0..=n {
        for j in 0..=n {
            vertices.push(Vec4::point(i as f64 * cell, j as f64 * cell, 0.0));
        }
    }
    let row = n + 1;
    for i in 0..n {
        for j in 0..n {
            let a = i * row + j;
            faces.push(vec![a, a + row, a + row + 1, a + 1]);
        }
    }
    let hub = vertices.len();
    vertices.push(Vec4::point(10.0, 0.0, 0.0));
    for k in 0..8 {
        let v = vertices.len();
        vertices.push(Vec4::point(10.0, f64::from(k) + 1.0, 1.0));
        vertices.push(Vec4::point(9.0, f64::from(k) + 1.5, -1.0));
        faces.push(vec![hub, v, v + 1]);
    }
    IndexedFaceSet::new(vertices, faces).expect("skewed mesh indices are in range")
}

fn scene_with(mesh: IndexedFaceSet) -> (SceneGraph, ComponentId) {
    let mut scene = SceneGraph::new();
    let g = scene.add_geometry(mesh.into());
    let root = scene.add_component(Component::new("bench").with_geometry(g));
    (scene, root)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick_tree/build");
    for &n in &[8usize, 32, 64] {
        let mesh = IndexedFaceSet::sphere_mesh(1.0, n, n);
        group.bench_function(format!("sphere/{}", mesh.face_count()), |b| {
            b.iter(|| black_box(AabbTree::from_face_set(black_box(&mesh), DEFAULT_POLYS_PER_LEAF)));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion, name: &str, make: impl Fn(bool) -> IndexedFaceSet, from: Vec4, to: Vec4) {
    let mut group = c.benchmark_group(format!("pick_tree/{name}"));
    for tree in [false, true] {
        let (scene, root) = scene_with(make(tree));
        let mut picker = AabbPickSystem::new();
        picker.set_scene_root(root);
        // Warm the cache so the tree build is not measured.
        picker.compute_pick(&scene, &from, &to).expect("warm-up pick");
        let label = if tree { "tree" } else { "brute_force" };
        group.bench_function(label, |b| {
            b.iter(|| black_box(picker.compute_pick(&scene, black_box(&from), black_box(&to)).expect("pick")));
        });
    }
    group.finish();
}

fn bench_sphere(c: &mut Criterion) {
    bench_query(
        c,
        "sphere",
        |tree| IndexedFaceSet::sphere_mesh(1.0, 64, 64).with_pick_tree(tree),
        Vec4::point(0.1, 0.2, 3.0),
        Vec4::point(0.1, 0.2, -3.0),
    );
}

fn bench_skewed(c: &mut Criterion) {
    install_subscriber();
    bench_query(
        c,
        "skewed",
        |tree| skewed_mesh(64).with_pick_tree(tree),
        Vec4::point(0.05, 0.05, 1.0),
        Vec4::point(0.05, 0.05, -1.0),
    );
}

criterion_group!(benches, bench_skewed, bench_sphere, bench_build);
criterion_main!(benches);
