// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree itself: configuration, recursive insert/search/delete, and the
//! post-delete condensation pass.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::node::{Arena, Branch, NodeIndex, Payload};
use crate::rect::{MAX_DIMS, Rect, VolumeMetric};
use crate::split::{self, SplitStrategy};

/// Target storage-page footprint for one node, bounding the hard branch
/// capacity.
const PAGE_SIZE: usize = 512;

/// Space reserved per node for the count and level header.
const NODE_HEADER: usize = 2 * size_of::<u32>();

/// Branching-factor configuration, supplied once at construction and never
/// mutated afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum occupied branches in a leaf.
    pub max_leaf_branches: usize,
    /// Maximum occupied branches in an internal node.
    pub max_internal_branches: usize,
    /// Minimum fill: split groups never go below this, and a node whose
    /// count drops under it during delete is condensed away.
    pub min_branches: usize,
    /// Seed-and-distribute strategy used on overflow.
    pub split: SplitStrategy,
    /// Volume metric driving branch selection and split scoring.
    pub metric: VolumeMetric,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_leaf_branches: 8,
            max_internal_branches: 8,
            min_branches: 2,
            split: SplitStrategy::default(),
            metric: VolumeMetric::default(),
        }
    }
}

impl Config {
    fn capacity_for(&self, level: u32) -> usize {
        if level == 0 {
            self.max_leaf_branches
        } else {
            self.max_internal_branches
        }
    }
}

/// Rejected branching-factor configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A maximum exceeds the page-derived hard capacity for this tree's
    /// dimension and record type.
    AboveHardCapacity {
        /// The requested maximum.
        requested: usize,
        /// The hard cap it exceeded.
        hard_capacity: usize,
    },
    /// A maximum below two cannot hold a split result.
    MaxTooSmall(usize),
    /// Minimum fill must leave room for two groups in the smaller node kind.
    MinTooLarge {
        /// The requested minimum.
        min: usize,
        /// Largest admissible minimum for the given maxima.
        limit: usize,
    },
    /// Minimum fill of zero would allow empty split groups.
    MinZero,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AboveHardCapacity {
                requested,
                hard_capacity,
            } => write!(
                f,
                "requested {requested} branches but the hard capacity is {hard_capacity}"
            ),
            Self::MaxTooSmall(max) => write!(f, "maximum branch count {max} is below two"),
            Self::MinTooLarge { min, limit } => {
                write!(f, "minimum fill {min} exceeds the admissible limit {limit}")
            }
            Self::MinZero => write!(f, "minimum fill must be at least one"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// A dynamic R-tree over `D`-dimensional rectangles with `R` records.
///
/// Insertion, overlap search with early-exit callbacks, and deletion with
/// condensation, per Guttman's original design. The tree owns all of its
/// nodes in an arena; the root handle is replaced internally whenever the
/// height changes.
///
/// Operations run to completion synchronously. Shared references permit
/// concurrent searches; any mutation must be externally serialized against
/// every other operation on the same tree.
pub struct RTree<const D: usize, R: Copy + PartialEq + Debug> {
    arena: Arena<D, R>,
    root: NodeIndex,
    config: Config,
    len: usize,
}

impl<const D: usize, R: Copy + PartialEq + Debug> Default for RTree<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize, R: Copy + PartialEq + Debug> RTree<D, R> {
    /// Hard branch capacity: how many branches of this tree's footprint fit
    /// in a storage page alongside the node header.
    pub const HARD_CAPACITY: usize = (PAGE_SIZE - NODE_HEADER) / size_of::<Branch<D, R>>();

    /// Create an empty tree (a leaf root) with default configuration,
    /// clamped to the hard capacity.
    pub fn new() -> Self {
        const {
            assert!(D >= 1 && D <= MAX_DIMS, "unsupported dimension");
            assert!(Self::HARD_CAPACITY >= 2, "record type too large for a page");
        }
        let defaults = Config::default();
        let max_leaf_branches = defaults.max_leaf_branches.clamp(2, Self::HARD_CAPACITY);
        let max_internal_branches = defaults.max_internal_branches.clamp(2, Self::HARD_CAPACITY);
        let min_branches = defaults
            .min_branches
            .min(max_leaf_branches / 2)
            .min(max_internal_branches / 2)
            .max(1);
        Self::build(Config {
            max_leaf_branches,
            max_internal_branches,
            min_branches,
            ..defaults
        })
    }

    /// Create an empty tree with an explicit configuration.
    ///
    /// Rejects maxima above [`Self::HARD_CAPACITY`] or below two, and
    /// minimum fills that could not leave two valid split groups.
    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        const {
            assert!(D >= 1 && D <= MAX_DIMS, "unsupported dimension");
            assert!(Self::HARD_CAPACITY >= 2, "record type too large for a page");
        }
        for max in [config.max_leaf_branches, config.max_internal_branches] {
            if max > Self::HARD_CAPACITY {
                return Err(ConfigError::AboveHardCapacity {
                    requested: max,
                    hard_capacity: Self::HARD_CAPACITY,
                });
            }
            if max < 2 {
                return Err(ConfigError::MaxTooSmall(max));
            }
        }
        if config.min_branches == 0 {
            return Err(ConfigError::MinZero);
        }
        let limit = config.max_leaf_branches.min(config.max_internal_branches) / 2;
        if config.min_branches > limit {
            return Err(ConfigError::MinTooLarge {
                min: config.min_branches,
                limit,
            });
        }
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc(0, config.max_leaf_branches);
        Self {
            arena,
            root,
            config,
            len: 0,
        }
    }

    /// The configuration this tree was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of records in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of node levels. An empty tree is a single leaf of height one.
    pub fn height(&self) -> usize {
        self.arena[self.root].level as usize + 1
    }

    /// Insert a record with its bounding rectangle.
    ///
    /// `rect` must have `min <= max` on every axis; inverted or null
    /// rectangles are caller error.
    pub fn insert(&mut self, rect: Rect<D>, record: R) {
        debug_assert!(!rect.is_null(), "insert of a null rectangle");
        self.insert_entry(
            Branch {
                rect,
                payload: Payload::Record(record),
            },
            0,
        );
        self.len += 1;
    }

    /// Insert a branch at `target_level`, growing the root when a split
    /// propagates all the way up. Height changes only here.
    fn insert_entry(&mut self, branch: Branch<D, R>, target_level: u32) {
        let split =
            Self::insert_branch(&mut self.arena, &self.config, self.root, branch, target_level);
        if let Some(sibling) = split {
            let old_root = self.root;
            let level = self.arena[old_root].level + 1;
            let new_root = self.arena.alloc(level, self.config.max_internal_branches);
            let old_cover = self.arena[old_root].cover();
            let sibling_cover = self.arena[sibling].cover();
            let node = &mut self.arena[new_root];
            node.push_branch(Branch {
                rect: old_cover,
                payload: Payload::Child(old_root),
            });
            node.push_branch(Branch {
                rect: sibling_cover,
                payload: Payload::Child(sibling),
            });
            self.root = new_root;
        }
    }

    /// Recursive descent. Returns the index of a newly split-off sibling of
    /// `node` when the addition overflowed it.
    fn insert_branch(
        arena: &mut Arena<D, R>,
        config: &Config,
        node: NodeIndex,
        branch: Branch<D, R>,
        target_level: u32,
    ) -> Option<NodeIndex> {
        let level = arena[node].level;
        debug_assert!(level >= target_level, "descended past the target level");
        if level == target_level {
            return Self::add_branch(arena, config, node, branch);
        }

        let slot = arena[node].pick_branch(&branch.rect, config.metric);
        let child = match arena[node].slots[slot]
            .as_ref()
            .expect("picked slot is occupied")
            .payload
        {
            Payload::Child(c) => c,
            Payload::Record(_) => unreachable!("internal nodes hold only child branches"),
        };
        let rect = branch.rect;
        match Self::insert_branch(arena, config, child, branch, target_level) {
            None => {
                // No split below: widening by the new rectangle keeps the
                // branch cover exact.
                let b = arena[node].slots[slot]
                    .as_mut()
                    .expect("picked slot is occupied");
                b.rect = b.rect.union(&rect);
                None
            }
            Some(sibling) => {
                // The child gave branches away; both covers must be rebuilt.
                let child_cover = arena[child].cover();
                let sibling_cover = arena[sibling].cover();
                arena[node].slots[slot]
                    .as_mut()
                    .expect("picked slot is occupied")
                    .rect = child_cover;
                Self::add_branch(
                    arena,
                    config,
                    node,
                    Branch {
                        rect: sibling_cover,
                        payload: Payload::Child(sibling),
                    },
                )
            }
        }
    }

    /// Add a branch to a node, splitting on overflow. Returns the new
    /// sibling when a split occurred.
    fn add_branch(
        arena: &mut Arena<D, R>,
        config: &Config,
        node: NodeIndex,
        branch: Branch<D, R>,
    ) -> Option<NodeIndex> {
        if arena[node].count < arena[node].capacity() {
            arena[node].push_branch(branch);
            return None;
        }
        let level = arena[node].level;
        let mut branches = arena[node].take_branches();
        branches.push(branch);
        let (keep, give) = split::partition(branches, config.split, config.metric, config.min_branches);
        for b in keep {
            arena[node].push_branch(b);
        }
        let sibling = arena.alloc(level, config.capacity_for(level));
        for b in give {
            arena[sibling].push_branch(b);
        }
        Some(sibling)
    }

    /// Visit every record whose rectangle overlaps `query`, in node/branch
    /// scan order. Returns the number of hits visited, including the one
    /// that returned [`ControlFlow::Break`] if the callback stopped early.
    pub fn search<F>(&self, query: &Rect<D>, mut visit: F) -> usize
    where
        F: FnMut(R) -> ControlFlow<()>,
    {
        let mut hits = 0;
        let _ = Self::search_node(&self.arena, self.root, query, &mut hits, &mut visit);
        hits
    }

    /// Collect every overlapping record into a vector.
    pub fn search_collect(&self, query: &Rect<D>) -> Vec<R> {
        let mut out = Vec::new();
        let _ = self.search(query, |r| {
            out.push(r);
            ControlFlow::Continue(())
        });
        out
    }

    fn search_node<F>(
        arena: &Arena<D, R>,
        node: NodeIndex,
        query: &Rect<D>,
        hits: &mut usize,
        visit: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(R) -> ControlFlow<()>,
    {
        let n = &arena[node];
        for (_, b) in n.occupied() {
            if !b.rect.overlaps(query) {
                continue;
            }
            match b.payload {
                Payload::Record(r) => {
                    *hits += 1;
                    visit(r)?;
                }
                Payload::Child(c) => Self::search_node(arena, c, query, hits, visit)?,
            }
        }
        ControlFlow::Continue(())
    }

    /// Delete the record matching `rect` exactly (not merely overlapping)
    /// with an equal `record`. Returns whether a match was found; a miss
    /// leaves the tree untouched.
    ///
    /// Underfull nodes on the deletion path are detached and their contents
    /// reinserted at their original level before this returns, and a
    /// single-child internal root collapses so the height stays minimal.
    pub fn remove(&mut self, rect: Rect<D>, record: R) -> bool {
        let mut orphans: Vec<(u32, Branch<D, R>)> = Vec::new();
        let found = Self::remove_branch(
            &mut self.arena,
            &self.config,
            self.root,
            &rect,
            record,
            &mut orphans,
        );
        if !found {
            return false;
        }
        self.len -= 1;

        // Reinsert detached subtrees at their recorded level; leaf entries
        // re-enter at level zero, whole subtrees one level up, preserving
        // the balanced height.
        for (level, branch) in orphans {
            self.insert_entry(branch, level);
        }

        // Collapse single-child internal roots.
        while !self.arena[self.root].is_leaf() && self.arena[self.root].count == 1 {
            let old_root = self.root;
            let child = match self.arena[old_root]
                .occupied()
                .next()
                .expect("count is one")
                .1
                .payload
            {
                Payload::Child(c) => c,
                Payload::Record(_) => unreachable!("internal nodes hold only child branches"),
            };
            self.arena.free(old_root);
            self.root = child;
        }
        true
    }

    /// Recursive delete. On success the caller re-tightens or detaches the
    /// branch leading to `node`; detached nodes push their surviving
    /// branches onto `orphans` tagged with the node's level.
    fn remove_branch(
        arena: &mut Arena<D, R>,
        config: &Config,
        node: NodeIndex,
        rect: &Rect<D>,
        record: R,
        orphans: &mut Vec<(u32, Branch<D, R>)>,
    ) -> bool {
        if arena[node].is_leaf() {
            let hit = arena[node]
                .occupied()
                .find(|(_, b)| b.rect == *rect && b.payload == Payload::Record(record))
                .map(|(i, _)| i);
            match hit {
                Some(i) => {
                    arena[node].disconnect(i);
                    true
                }
                None => false,
            }
        } else {
            let candidates: Vec<(usize, NodeIndex)> = arena[node]
                .occupied()
                .filter(|(_, b)| b.rect.overlaps(rect))
                .filter_map(|(i, b)| match b.payload {
                    Payload::Child(c) => Some((i, c)),
                    Payload::Record(_) => None,
                })
                .collect();
            for (slot, child) in candidates {
                if !Self::remove_branch(arena, config, child, rect, record, orphans) {
                    continue;
                }
                if arena[child].count >= config.min_branches {
                    // Still adequately filled: re-tighten over the smaller child.
                    let cover = arena[child].cover();
                    arena[node].slots[slot]
                        .as_mut()
                        .expect("candidate slot is occupied")
                        .rect = cover;
                } else {
                    // Underfull: detach the child and queue what remains of it.
                    let level = arena[child].level;
                    for b in arena[child].take_branches() {
                        orphans.push((level, b));
                    }
                    arena.free(child);
                    arena[node].disconnect(slot);
                }
                return true;
            }
            false
        }
    }

    /// Release every node post-order and reset to an empty leaf root.
    ///
    /// Dropping the tree also reclaims all memory; `clear` exists so a tree
    /// can be emptied and refilled without reallocating the arena.
    pub fn clear(&mut self) {
        Self::free_subtree(&mut self.arena, self.root);
        self.root = self.arena.alloc(0, self.config.max_leaf_branches);
        self.len = 0;
    }

    fn free_subtree(arena: &mut Arena<D, R>, node: NodeIndex) {
        let children: Vec<NodeIndex> = arena[node]
            .occupied()
            .filter_map(|(_, b)| match b.payload {
                Payload::Child(c) => Some(c),
                Payload::Record(_) => None,
            })
            .collect();
        for c in children {
            Self::free_subtree(arena, c);
        }
        arena.free(node);
    }

    /// Read-only view of the root node, for external traversal (export,
    /// debugging). The traversal must not outlive a mutation.
    pub fn root(&self) -> NodeRef<'_, D, R> {
        NodeRef {
            arena: &self.arena,
            idx: self.root,
        }
    }

    /// Nodes currently allocated, including the root.
    pub fn node_count(&self) -> usize {
        self.arena.live_nodes()
    }
}

impl<const D: usize, R: Copy + PartialEq + Debug> Debug for RTree<D, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("len", &self.len)
            .field("height", &self.height())
            .field("nodes", &self.arena.live_nodes())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Read-only view of one node, used by visualization and export layers
/// instead of search.
#[derive(Copy, Clone, Debug)]
pub struct NodeRef<'a, const D: usize, R: Copy + PartialEq + Debug> {
    arena: &'a Arena<D, R>,
    idx: NodeIndex,
}

impl<'a, const D: usize, R: Copy + PartialEq + Debug> NodeRef<'a, D, R> {
    /// This node's level: 0 for leaves, height above leaves otherwise.
    pub fn level(&self) -> u32 {
        self.arena[self.idx].level
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.arena[self.idx].is_leaf()
    }

    /// Number of occupied branches.
    pub fn branch_count(&self) -> usize {
        self.arena[self.idx].count
    }

    /// Bounding rectangles of the occupied branches, in slot order.
    pub fn branch_rects(self) -> impl Iterator<Item = Rect<D>> + 'a {
        self.arena[self.idx].occupied().map(|(_, b)| b.rect)
    }

    /// Child nodes, in slot order. Empty for leaves.
    pub fn children(self) -> impl Iterator<Item = NodeRef<'a, D, R>> + 'a {
        let arena = self.arena;
        arena[self.idx].occupied().filter_map(move |(_, b)| match b.payload {
            Payload::Child(c) => Some(Self { arena, idx: c }),
            Payload::Record(_) => None,
        })
    }

    /// Records stored in this leaf, in slot order. Empty for internal nodes.
    pub fn records(self) -> impl Iterator<Item = (Rect<D>, R)> + 'a {
        self.arena[self.idx]
            .occupied()
            .filter_map(|(_, b)| match b.payload {
                Payload::Record(r) => Some((b.rect, r)),
                Payload::Child(_) => None,
            })
    }
}

#[cfg(test)]
impl<const D: usize, R: Copy + PartialEq + Debug> RTree<D, R> {
    /// Walk the whole tree checking the structural invariants: exact branch
    /// covers, capacity bounds, uniform leaf depth, minimum fill below the
    /// root, and payload kinds matching node levels.
    pub(crate) fn assert_invariants(&self) {
        self.check_node(self.root, None);
    }

    fn check_node(&self, idx: NodeIndex, expected_level: Option<u32>) {
        let node = &self.arena[idx];
        if let Some(level) = expected_level {
            assert_eq!(node.level, level, "leaves must sit at a uniform depth");
            assert!(
                node.count >= self.config.min_branches,
                "non-root node below minimum fill"
            );
        }
        assert!(node.count <= node.capacity(), "count above capacity");
        assert_eq!(
            node.count,
            node.occupied().count(),
            "count out of sync with occupied slots"
        );
        for (_, b) in node.occupied() {
            match b.payload {
                Payload::Record(_) => assert!(node.is_leaf(), "record branch in internal node"),
                Payload::Child(c) => {
                    assert!(!node.is_leaf(), "child branch in leaf");
                    assert_eq!(
                        b.rect,
                        self.arena[c].cover(),
                        "branch rect must be the exact cover of its child"
                    );
                    self.check_node(c, Some(node.level - 1));
                }
            }
        }
    }
}
