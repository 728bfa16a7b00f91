// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! R-tree-accelerated "which triangle contains this point" queries.

use core::ops::ControlFlow;

use bramble_rtree::{Config, ConfigError, RTree, Rect};
use kurbo::Point;

use crate::mesh::{Mesh, point_in_triangle};

/// Point locator over a mesh: triangle bounding rectangles in an R-tree,
/// disambiguated by the exact point-in-triangle predicate.
///
/// The locator borrows the mesh; rebuilding after mesh edits is the
/// caller's responsibility.
#[derive(Debug)]
pub struct TriangleLocator<'m> {
    mesh: &'m Mesh,
    tree: RTree<2, u32>,
}

impl<'m> TriangleLocator<'m> {
    /// Index every triangle of `mesh` with the default tree configuration.
    pub fn build(mesh: &'m Mesh) -> Self {
        Self::from_tree(mesh, RTree::new())
    }

    /// Index every triangle with an explicit tree configuration.
    pub fn with_config(mesh: &'m Mesh, config: Config) -> Result<Self, ConfigError> {
        Ok(Self::from_tree(mesh, RTree::with_config(config)?))
    }

    fn from_tree(mesh: &'m Mesh, mut tree: RTree<2, u32>) -> Self {
        for i in 0..mesh.triangles.len() {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "meshes with more than u32::MAX triangles are unsupported"
            )]
            tree.insert(mesh.triangle_rect(i), i as u32);
        }
        Self { mesh, tree }
    }

    /// The underlying tree, for export and diagnostics.
    pub fn tree(&self) -> &RTree<2, u32> {
        &self.tree
    }

    /// The mesh this locator indexes.
    pub fn mesh(&self) -> &'m Mesh {
        self.mesh
    }

    /// Index of the first triangle containing `p`, or `None`.
    ///
    /// The tree narrows to triangles whose bounding rectangle touches the
    /// point; the barycentric test decides, stopping at the first true hit.
    pub fn locate(&self, p: Point) -> Option<usize> {
        let mut found = None;
        self.tree.search(&Rect::point([p.x, p.y]), |id| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ids are triangle indices, which fit in usize"
            )]
            let tri = id as usize;
            let [a, b, c] = self.mesh.triangle_points(tri);
            if point_in_triangle(p, a, b, c) {
                found = Some(tri);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found
    }

    /// Brute-force comparison path: test every triangle in order.
    pub fn locate_naive(&self, p: Point) -> Option<usize> {
        (0..self.mesh.triangles.len()).find(|&i| {
            let [a, b, c] = self.mesh.triangle_points(i);
            point_in_triangle(p, a, b, c)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Triangle, Vertex};

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

    #[test]
    fn locates_interior_points() {
        let mesh = grid_mesh(8, 8);
        let locator = TriangleLocator::build(&mesh);
        // Lower-right triangle of cell (2, 3).
        let p = Point::new(2.9, 3.1);
        let hit = locator.locate(p).expect("point is inside the mesh");
        let [a, b, c] = mesh.triangle_points(hit);
        assert!(point_in_triangle(p, a, b, c));
    }

    #[test]
    fn outside_points_miss() {
        let mesh = grid_mesh(4, 4);
        let locator = TriangleLocator::build(&mesh);
        assert_eq!(locator.locate(Point::new(-1.0, 2.0)), None);
        assert_eq!(locator.locate(Point::new(2.0, 100.0)), None);
        assert_eq!(locator.locate_naive(Point::new(-1.0, 2.0)), None);
    }

    #[test]
    fn indexed_agrees_with_naive() {
        let mesh = grid_mesh(10, 6);
        let locator = TriangleLocator::build(&mesh);
        let mut hits = 0;
        for gy in 0..30 {
            for gx in 0..50 {
                let p = Point::new(gx as f64 * 0.25 - 1.0, gy as f64 * 0.25 - 1.0);
                let indexed = locator.locate(p);
                let naive = locator.locate_naive(p);
                // Both must agree on containment; on shared edges either
                // triangle is a correct answer, so compare membership.
                assert_eq!(indexed.is_some(), naive.is_some(), "disagree at {p:?}");
                if let Some(t) = indexed {
                    let [a, b, c] = mesh.triangle_points(t);
                    assert!(point_in_triangle(p, a, b, c));
                    hits += 1;
                }
            }
        }
        assert!(hits > 0, "the sample grid must land inside the mesh");
    }

    #[test]
    fn empty_mesh_locates_nothing() {
        let mesh = Mesh::default();
        let locator = TriangleLocator::build(&mesh);
        assert_eq!(locator.locate(Point::new(0.0, 0.0)), None);
        assert!(locator.tree().is_empty());
    }
}
