// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bramble_mesh::{Mesh, Triangle, TriangleLocator, Vertex};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;

/// A (cols x rows) grid of unit cells, two triangles per cell.
fn grid_mesh(cols: usize, rows: usize) -> Mesh {
    let mut mesh = Mesh::default();
    for j in 0..=rows {
        for i in 0..=cols {
            mesh.vertices.push(Vertex {
                x: i as f64,
                y: j as f64,
                z: 0.0,
            });
        }
    }
    let at = |i: usize, j: usize| j * (cols + 1) + i;
    for j in 0..rows {
        for i in 0..cols {
            mesh.triangles
                .push(Triangle([at(i, j), at(i + 1, j), at(i + 1, j + 1)]));
            mesh.triangles
                .push(Triangle([at(i, j), at(i + 1, j + 1), at(i, j + 1)]));
        }
    }
    mesh
}

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

fn gen_points(count: usize, width: f64, height: f64) -> Vec<Point> {
    let mut rng = Rng(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * width, rng.next_f64() * height))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator_build");
    for &n in &[16usize, 32, 64] {
        let mesh = grid_mesh(n, n);
        group.throughput(Throughput::Elements(mesh.triangles.len() as u64));
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter(|| black_box(TriangleLocator::build(&mesh)))
        });
    }
    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");
    for &n in &[16usize, 32, 64] {
        let mesh = grid_mesh(n, n);
        let locator = TriangleLocator::build(&mesh);
        let points = gen_points(1024, n as f64, n as f64);
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_function(format!("indexed_n{n}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for &p in &points {
                    if locator.locate(p).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits);
            })
        });

        group.bench_function(format!("naive_n{n}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for &p in &points {
                    if locator.locate_naive(p).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_build_and_first_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator_end_to_end");
    let mesh = grid_mesh(32, 32);
    group.bench_function("build_then_locate", |b| {
        b.iter_batched(
            || Point::new(17.3, 9.8),
            |p| {
                let locator = TriangleLocator::build(&mesh);
                black_box(locator.locate(p));
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_locate, bench_build_and_first_query);
criterion_main!(benches);
