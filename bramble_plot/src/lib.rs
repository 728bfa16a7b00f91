// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Plot: Gnuplot data and script exports for meshes and R-trees.
//!
//! Everything here writes plain-text `.dat` files (one `x y` pair per line,
//! blank-line separated polylines) plus ready-to-run Gnuplot scripts:
//!
//! - [`export_mesh_edges`] draws every triangle as a closed loop.
//! - [`export_tree_levels`] writes one file per tree level, with the root
//!   relabeled as level 0 so the scripts read top-down.
//! - [`export_point`] and [`export_triangle`] highlight a query and its
//!   answer.
//! - [`write_scripts`] emits `viz_all_levels.gp`, one `viz_level_<i>_<j>.gp`
//!   per consecutive level pair, and `viz_overview.gp`.
//!
//! Render with e.g. `cd plots && gnuplot viz_all_levels.gp`.

use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bramble_mesh::Mesh;
use bramble_rtree::{NodeRef, RTree, Rect};
use kurbo::Point;

/// Data-file names the generated scripts expect alongside the level files.
pub const MESH_EDGES_FILE: &str = "mesh_edges.dat";
/// See [`MESH_EDGES_FILE`].
pub const QUERY_POINT_FILE: &str = "query_point.dat";
/// See [`MESH_EDGES_FILE`].
pub const FOUND_TRIANGLE_FILE: &str = "found_triangle.dat";

fn write_closed_loop(w: &mut impl Write, points: &[Point]) -> std::io::Result<()> {
    for p in points.iter().chain(points.first()) {
        writeln!(w, "{:.6} {:.6}", p.x, p.y)?;
    }
    // Blank record separator so Gnuplot disconnects the next polyline.
    writeln!(w)?;
    writeln!(w)
}

fn write_rect_outline(w: &mut impl Write, r: &Rect<2>) -> std::io::Result<()> {
    write_closed_loop(
        w,
        &[
            Point::new(r.min[0], r.min[1]),
            Point::new(r.max[0], r.min[1]),
            Point::new(r.max[0], r.max[1]),
            Point::new(r.min[0], r.max[1]),
        ],
    )
}

/// Write every mesh triangle as a closed loop to `path`.
pub fn export_mesh_edges(mesh: &Mesh, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for i in 0..mesh.triangles.len() {
        write_closed_loop(&mut w, &mesh.triangle_points(i))?;
    }
    w.flush()
}

/// Write a single point to `path`.
pub fn export_point(p: Point, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "{:.6} {:.6}", p.x, p.y)?;
    w.flush()
}

/// Write triangle `tri` of `mesh` as a closed loop to `path`.
pub fn export_triangle(mesh: &Mesh, tri: usize, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_closed_loop(&mut w, &mesh.triangle_points(tri))?;
    w.flush()
}

/// Write one `level_<n>.dat` per tree level into `dir` and return the tree
/// height.
///
/// The tree numbers leaves as level 0; the files flip that so the root's
/// branches land in `level_0.dat` and deeper levels count up from there,
/// which is how the scripts label them.
pub fn export_tree_levels<R: Copy + PartialEq + Debug>(
    tree: &RTree<2, R>,
    dir: impl AsRef<Path>,
) -> std::io::Result<usize> {
    let dir = dir.as_ref();
    let root = tree.root();
    let height = root.level() as usize + 1;

    let mut files = Vec::with_capacity(height);
    for i in 0..height {
        files.push(BufWriter::new(File::create(
            dir.join(format!("level_{i}.dat")),
        )?));
    }
    write_node_levels(root, height, &mut files)?;
    for f in &mut files {
        f.flush()?;
    }
    Ok(height)
}

fn write_node_levels<R: Copy + PartialEq + Debug>(
    node: NodeRef<'_, 2, R>,
    height: usize,
    files: &mut [BufWriter<File>],
) -> std::io::Result<()> {
    let display = (height - 1) - node.level() as usize;
    for r in node.branch_rects() {
        write_rect_outline(&mut files[display], &r)?;
    }
    for child in node.children() {
        write_node_levels(child, height, files)?;
    }
    Ok(())
}

/// Generate the Gnuplot scripts into `dir` for a tree of `height` levels over
/// the given world `bounds`, padded by a 5% margin on each side.
pub fn write_scripts(
    dir: impl AsRef<Path>,
    height: usize,
    bounds: &Rect<2>,
) -> std::io::Result<()> {
    let dir = dir.as_ref();
    let x_margin = (bounds.max[0] - bounds.min[0]) * 0.05;
    let y_margin = (bounds.max[1] - bounds.min[1]) * 0.05;
    let (x1, x2) = (bounds.min[0] - x_margin, bounds.max[0] + x_margin);
    let (y1, y2) = (bounds.min[1] - y_margin, bounds.max[1] + y_margin);

    let preamble = |w: &mut dyn Write, output: &str, title: &str| -> std::io::Result<()> {
        writeln!(w, "set terminal pngcairo size 800,800")?;
        writeln!(w, "set output '{output}'")?;
        writeln!(w, "set title \"{title}\"")?;
        writeln!(w, "set xrange [{x1:.6}:{x2:.6}]")?;
        writeln!(w, "set yrange [{y1:.6}:{y2:.6}]")?;
        writeln!(w, "set size square")
    };

    const COLORS: [&str; 7] = ["red", "blue", "green", "orange", "purple", "cyan", "brown"];

    // One script showing every level at once, color-cycled.
    let mut w = BufWriter::new(File::create(dir.join("viz_all_levels.gp"))?);
    preamble(&mut w, "visualization_levels_legend.png", "R-Tree Levels (Root=0)")?;
    writeln!(w, "set key outside")?;
    writeln!(w)?;
    write!(
        w,
        "p \"{MESH_EDGES_FILE}\" w l lc rgb \"#CCCCCC\" title \"Mesh\""
    )?;
    for i in 0..height {
        let color = COLORS[i % COLORS.len()];
        write!(
            w,
            ", \\\n  \"level_{i}.dat\" w l lw 2 lc rgb \"{color}\" title \"Level {i}\""
        )?;
    }
    writeln!(w)?;
    w.flush()?;

    // One script per consecutive parent/child level pair.
    for i in 0..height.saturating_sub(1) {
        let j = i + 1;
        let mut w = BufWriter::new(File::create(dir.join(format!("viz_level_{i}_{j}.gp")))?);
        preamble(
            &mut w,
            &format!("viz_level_{i}_{j}.png"),
            &format!("R-Tree Levels {i} and {j}"),
        )?;
        writeln!(w, "set key top right")?;
        writeln!(w)?;
        writeln!(
            w,
            "p \"{MESH_EDGES_FILE}\" w l lc rgb \"#EEEEEE\" title \"Mesh\", \\"
        )?;
        writeln!(
            w,
            "  \"level_{i}.dat\" w l lw 2 lc rgb \"red\" title \"Level {i} (Parent)\", \\"
        )?;
        writeln!(
            w,
            "  \"level_{j}.dat\" w l lw 2 lc rgb \"blue\" title \"Level {j} (Child)\""
        )?;
        w.flush()?;
    }

    // Overview: all nodes washed out, query point and found triangle on top.
    let mut w = BufWriter::new(File::create(dir.join("viz_overview.gp"))?);
    preamble(&mut w, "visualization_overview.png", "R-Tree Structure (All Nodes)")?;
    writeln!(w, "set key outside")?;
    writeln!(w)?;
    write!(w, "p \"{MESH_EDGES_FILE}\" w l lc rgb \"blue\" title \"Mesh\"")?;
    for i in 0..height {
        if i == 0 {
            write!(
                w,
                ", \\\n  \"level_{i}.dat\" w l lw 1 lc rgb \"#FF8888\" title \"R-Tree Nodes\""
            )?;
        } else {
            write!(
                w,
                ", \\\n  \"level_{i}.dat\" w l lw 1 lc rgb \"#FF8888\" notitle"
            )?;
        }
    }
    write!(
        w,
        ", \\\n  \"{FOUND_TRIANGLE_FILE}\" w l lw 3 lc rgb \"magenta\" title \"Found Triangle\""
    )?;
    writeln!(
        w,
        ", \\\n  \"{QUERY_POINT_FILE}\" w p pt 7 ps 2 lc rgb \"green\" title \"Query Point\""
    )?;
    w.flush()
}
