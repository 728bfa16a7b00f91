// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point location over a Medit mesh, with Gnuplot exports.
//!
//! Loads a mesh, indexes its triangles, locates a query point, writes the
//! `plots/` data and script files, and times indexed against naive search
//! on random points.
//!
//! Run:
//! - `cargo run --release -p bramble_demos --example point_locate -- <mesh.mesh> [num_test_points] [qx qy]`

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use bramble_mesh::{Mesh, TriangleLocator};
use kurbo::Point;

struct Rng(u64);

impl Rng {
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

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let Some(mesh_path) = args.get(1) else {
        eprintln!("Usage: {} <mesh_file> [num_test_points] [qx qy]", args[0]);
        return ExitCode::FAILURE;
    };
    let num_points: usize = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1000);
    let query = match (args.get(3), args.get(4)) {
        (Some(x), Some(y)) => match (x.parse(), y.parse()) {
            (Ok(x), Ok(y)) => Point::new(x, y),
            _ => {
                eprintln!("Invalid query point coordinates");
                return ExitCode::FAILURE;
            }
        },
        _ => Point::ZERO,
    };

    println!("Loading mesh {mesh_path}...");
    let mesh = match Mesh::from_medit_path(mesh_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to load mesh: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Mesh loaded: {} vertices, {} triangles.",
        mesh.vertices.len(),
        mesh.triangles.len()
    );
    let bounds = mesh.bounds();
    println!(
        "Mesh BBox: [{:.2}, {:.2}] x [{:.2}, {:.2}]",
        bounds.min[0], bounds.max[0], bounds.min[1], bounds.max[1]
    );

    println!("Building R-Tree...");
    let start = Instant::now();
    let locator = TriangleLocator::build(&mesh);
    println!("R-Tree built in {:.6} seconds.", start.elapsed().as_secs_f64());

    println!("Exporting to Gnuplot to 'plots/' directory...");
    let plots = Path::new("plots");
    if let Err(e) = export_plots(&mesh, &locator, plots, query) {
        eprintln!("Plot export failed: {e}");
        return ExitCode::FAILURE;
    }

    println!("Generating {num_points} random test points to compare indexed vs naive search...");
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    let points: Vec<Point> = (0..num_points)
        .map(|_| {
            Point::new(
                bounds.min[0] + (bounds.max[0] - bounds.min[0]) * rng.next_f64(),
                bounds.min[1] + (bounds.max[1] - bounds.min[1]) * rng.next_f64(),
            )
        })
        .collect();

    println!("Benchmarking indexed search...");
    let start = Instant::now();
    let hits_indexed = points.iter().filter(|&&p| locator.locate(p).is_some()).count();
    let time_indexed = start.elapsed().as_secs_f64();
    println!("Indexed: {time_indexed:.6} seconds ({hits_indexed} hits)");

    println!("Benchmarking naive search...");
    let start = Instant::now();
    let hits_naive = points
        .iter()
        .filter(|&&p| locator.locate_naive(p).is_some())
        .count();
    let time_naive = start.elapsed().as_secs_f64();
    println!("Naive:   {time_naive:.6} seconds ({hits_naive} hits)");

    println!("Speedup: {:.2}x", time_naive / time_indexed);
    if hits_indexed == hits_naive {
        println!("Correctness check: PASS (hit counts match)");
        ExitCode::SUCCESS
    } else {
        eprintln!("WARNING: hit counts mismatch! Indexed: {hits_indexed}, Naive: {hits_naive}");
        ExitCode::FAILURE
    }
}

fn export_plots(
    mesh: &Mesh,
    locator: &TriangleLocator<'_>,
    dir: &Path,
    query: Point,
) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    bramble_plot::export_mesh_edges(mesh, dir.join(bramble_plot::MESH_EDGES_FILE))?;
    bramble_plot::export_point(query, dir.join(bramble_plot::QUERY_POINT_FILE))?;

    let height = bramble_plot::export_tree_levels(locator.tree(), dir)?;
    println!("Tree height is {height}");

    match locator.locate(query) {
        Some(tri) => {
            bramble_plot::export_triangle(mesh, tri, dir.join(bramble_plot::FOUND_TRIANGLE_FILE))?;
            println!("Query point ({:.2}, {:.2}) is in triangle {tri}.", query.x, query.y);
        }
        None => {
            // The overview script still references the file.
            std::fs::write(dir.join(bramble_plot::FOUND_TRIANGLE_FILE), "")?;
            println!("WARNING: query point not found in any triangle!");
        }
    }

    bramble_plot::write_scripts(dir, height, &mesh.bounds())?;
    println!("Generated Gnuplot scripts for levels visualization.");
    Ok(())
}
