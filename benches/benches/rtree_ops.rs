// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::ControlFlow;

use bramble_rtree::{Config, RTree, Rect, SplitStrategy};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

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

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, extent: f64, size: f64) -> Vec<Rect<2>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (extent - size);
        let y0 = rng.next_f64() * (extent - size);
        out.push(Rect::new([x0, y0], [x0 + size, y0 + size]));
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Rect<2>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let x0 = cx + (rng.next_f64() - 0.5) * spread;
            let y0 = cy + (rng.next_f64() - 0.5) * spread;
            out.push(Rect::new([x0, y0], [x0 + 12.0, y0 + 12.0]));
        }
    }
    out
}

fn build_tree(rects: &[Rect<2>], strategy: SplitStrategy) -> RTree<2, u32> {
    let config = Config {
        split: strategy,
        ..Config::default()
    };
    let mut tree = RTree::with_config(config).unwrap();
    for (i, r) in rects.iter().enumerate() {
        tree.insert(*r, i as u32);
    }
    tree
}

fn count_hits(tree: &RTree<2, u32>, query: &Rect<2>) -> usize {
    tree.search(query, |_| ControlFlow::Continue(()))
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        for (label, strategy) in [
            ("quadratic", SplitStrategy::Quadratic),
            ("linear", SplitStrategy::Linear),
        ] {
            group.bench_function(format!("grid_{label}_n{n}"), |b| {
                b.iter_batched(
                    || rects.clone(),
                    |rects| black_box(build_tree(&rects, strategy)),
                    BatchSize::SmallInput,
                )
            });
        }
    }
    let rects = gen_clustered_rects(16, 256, 128.0);
    group.bench_function("clustered_quadratic", |b| {
        b.iter_batched(
            || rects.clone(),
            |rects| black_box(build_tree(&rects, SplitStrategy::Quadratic)),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let rects = gen_random_rects(4096, 2000.0, 12.0);
    let tree = build_tree(&rects, SplitStrategy::Quadratic);
    group.bench_function("window_queries", |b| {
        b.iter(|| {
            let mut total = 0_usize;
            for q in 0..256 {
                let x = (q % 16) as f64 * 120.0;
                let y = (q / 16) as f64 * 120.0;
                total += count_hits(&tree, &Rect::new([x, y], [x + 200.0, y + 200.0]));
            }
            black_box(total);
        })
    });
    group.bench_function("point_queries", |b| {
        let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
        b.iter(|| {
            let mut total = 0_usize;
            for _ in 0..256 {
                let p = [rng.next_f64() * 2000.0, rng.next_f64() * 2000.0];
                total += count_hits(&tree, &Rect::point(p));
            }
            black_box(total);
        })
    });
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    let rects = gen_random_rects(2048, 2000.0, 12.0);
    group.bench_function("remove_half_then_query", |b| {
        b.iter_batched(
            || build_tree(&rects, SplitStrategy::Quadratic),
            |mut tree| {
                for (i, r) in rects.iter().enumerate().step_by(2) {
                    assert!(tree.remove(*r, i as u32), "entry must be present");
                }
                let hits = count_hits(&tree, &Rect::new([500.0, 500.0], [1500.0, 1500.0]));
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_remove);
criterion_main!(benches);
