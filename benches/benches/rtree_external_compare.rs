// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use core::ops::ControlFlow;

use bramble_rtree::Rect;
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Rect<2>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Rect::new([x0, y0], [x0 + cell, y0 + cell]));
        }
    }
    out
}

fn to_rstar_rects(v: &[Rect<2>]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners(r.min, r.max))
        .collect()
}

fn bench_rtree_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let query = Rect::new([100.0, 100.0], [500.0, 500.0]);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("bramble_build_query_n{n}"), |b| {
            b.iter_batched(
                || rects.clone(),
                |rects| {
                    let mut tree: bramble_rtree::RTree<2, u32> = bramble_rtree::RTree::new();
                    for (i, r) in rects.into_iter().enumerate() {
                        tree.insert(r, i as u32);
                    }
                    let hits = tree.search(&query, |_| ControlFlow::Continue(()));
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(query.min, query.max);
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare);
criterion_main!(benches);
