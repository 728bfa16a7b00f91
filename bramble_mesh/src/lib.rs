// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Mesh: triangulated meshes and point location over them.
//!
//! - Parse 2D/3D meshes from the Medit `.mesh` text format (vertices,
//!   triangles; edges are read and skipped).
//! - Ask "which triangle contains this point" through [`TriangleLocator`],
//!   which indexes triangle bounding rectangles in a
//!   [`bramble_rtree::RTree`] and settles candidates with an exact
//!   barycentric test.
//!
//! # Example
//!
//! ```rust
//! use bramble_mesh::{Mesh, TriangleLocator};
//! use kurbo::Point;
//!
//! let mesh = Mesh::from_medit_str(
//!     "MeshVersionFormatted 2
//!      Dimension 2
//!      Vertices 3
//!      0.0 0.0 1
//!      2.0 0.0 1
//!      0.0 2.0 1
//!      Triangles 1
//!      1 2 3 1
//!      End",
//! )
//! .unwrap();
//!
//! let locator = TriangleLocator::build(&mesh);
//! assert_eq!(locator.locate(Point::new(0.5, 0.5)), Some(0));
//! assert_eq!(locator.locate(Point::new(3.0, 3.0)), None);
//! ```

pub mod locate;
pub mod mesh;

pub use locate::TriangleLocator;
pub use mesh::{Mesh, MeshError, Triangle, Vertex, point_in_triangle};
