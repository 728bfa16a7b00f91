// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble R-tree: a dynamic spatial index over axis-aligned rectangles.
//!
//! This is a faithful Guttman R-tree with a fixed branching factor:
//!
//! - Insert `(rectangle, record)` pairs; overflowing nodes split with a
//!   selectable quadratic or linear seed-and-distribute strategy.
//! - Search by overlap with an early-exit callback.
//! - Delete by exact rectangle and record match, with a condensation pass
//!   that detaches underfull nodes and reinserts their contents at their
//!   original level.
//!
//! Nodes live in an arena addressed by stable indices; every branch is a
//! tagged variant holding either a child index or a caller record, so there
//! is no pointer punning anywhere. The branching factor, minimum fill,
//! split strategy, and volume metric are supplied once at construction via
//! [`Config`] and carried with the tree.
//!
//! The tree is generic over the dimension `D` (compile-time, up to
//! [`MAX_DIMS`]) and the record type `R`.
//!
//! # Example
//!
//! ```rust
//! use core::ops::ControlFlow;
//! use bramble_rtree::{RTree, Rect};
//!
//! let mut tree: RTree<2, u32> = RTree::new();
//! tree.insert(Rect::new([0.0, 0.0], [1.0, 1.0]), 1);
//! tree.insert(Rect::new([2.0, 2.0], [3.0, 3.0]), 2);
//!
//! // Collect every overlap.
//! assert_eq!(tree.search_collect(&Rect::point([0.5, 0.5])), vec![1]);
//!
//! // Or stop at the first hit.
//! let mut first = None;
//! tree.search(&Rect::point([2.5, 2.5]), |id| {
//!     first = Some(id);
//!     ControlFlow::Break(())
//! });
//! assert_eq!(first, Some(2));
//!
//! assert!(tree.remove(Rect::new([0.0, 0.0], [1.0, 1.0]), 1));
//! assert!(tree.search_collect(&Rect::point([0.5, 0.5])).is_empty());
//! ```
//!
//! ## Float semantics
//!
//! Coordinates are `f64` and assumed finite; rectangles must satisfy
//! `min <= max` per axis before they reach the tree. Debug builds assert.
//!
//! ## Concurrency
//!
//! No internal synchronization. Shared references allow concurrent
//! searches; mutation must be serialized externally.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod node;
mod rect;
mod split;
mod tree;

pub use rect::{MAX_DIMS, Rect, VolumeMetric};
pub use split::SplitStrategy;
pub use tree::{Config, ConfigError, NodeRef, RTree};
