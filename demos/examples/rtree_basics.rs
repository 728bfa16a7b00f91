// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree basics.
//!
//! Insert a handful of rectangles, query a window, delete one entry, and
//! walk the tree structure.
//!
//! Run:
//! - `cargo run -p bramble_demos --example rtree_basics`

use core::ops::ControlFlow;

use bramble_rtree::{RTree, Rect};

fn main() {
    let mut tree: RTree<2, u32> = RTree::new();
    for i in 0..20_u32 {
        let x = f64::from(i % 5) * 10.0;
        let y = f64::from(i / 5) * 10.0;
        tree.insert(Rect::new([x, y], [x + 8.0, y + 8.0]), i);
    }
    println!("inserted {} rectangles, {} nodes", tree.len(), tree.node_count());

    // Collect everything overlapping a window.
    let query = Rect::new([5.0, 5.0], [25.0, 25.0]);
    let mut ids = Vec::new();
    let hits = tree.search(&query, |id| {
        ids.push(id);
        ControlFlow::Continue(())
    });
    ids.sort_unstable();
    println!("window {query:?} overlaps {hits} entries: {ids:?}");

    // Delete needs the exact rectangle the entry was inserted with.
    let removed = tree.remove(Rect::new([0.0, 0.0], [8.0, 8.0]), 0);
    println!("removed entry 0: {removed}, len now {}", tree.len());

    // Walk the structure top-down.
    let root = tree.root();
    println!("root level {} with {} branches", root.level(), root.branch_count());
    for (i, child) in root.children().enumerate() {
        println!("  child {i}: level {}, {} branches", child.level(), child.branch_count());
    }
}
