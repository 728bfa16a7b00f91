// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node and branch storage: fixed-capacity branch slots in an arena of
//! nodes addressed by stable indices.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::rect::{Rect, VolumeMetric};

/// Stable handle to a node in the arena.
///
/// Indices survive unrelated mutations; a freed index may be reissued for a
/// later allocation, so they must not be held across a free.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(u32);

impl NodeIndex {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Node indices are intentionally 32-bit; an arena cannot outgrow u32."
    )]
    pub(crate) const fn new(i: usize) -> Self {
        Self(i as u32)
    }

    pub(crate) const fn get(self) -> usize {
        self.0 as usize
    }
}

/// What a branch points at, decided structurally rather than by the owning
/// node's level.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Payload<R> {
    /// Subtree owned by this branch. Only valid in internal nodes.
    Child(NodeIndex),
    /// Caller-supplied record. Only valid in leaves.
    Record(R),
}

/// A bounding rectangle paired with a payload.
///
/// When occupied, `rect` is the exact minimum bounding rectangle of
/// everything reachable beneath the branch.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Branch<const D: usize, R> {
    pub(crate) rect: Rect<D>,
    pub(crate) payload: Payload<R>,
}

/// A tree node: a level tag, an occupied count, and fixed-capacity branch
/// slots. Unoccupied slots may appear anywhere and are reused by the next
/// [`Node::push_branch`].
#[derive(Clone, Debug)]
pub(crate) struct Node<const D: usize, R> {
    /// 0 for leaves, height above the leaf level otherwise.
    pub(crate) level: u32,
    /// Number of occupied slots.
    pub(crate) count: usize,
    pub(crate) slots: Box<[Option<Branch<D, R>>]>,
}

impl<const D: usize, R: Copy> Node<D, R> {
    fn new(level: u32, capacity: usize) -> Self {
        Self {
            level,
            count: 0,
            slots: vec![None; capacity].into_boxed_slice(),
        }
    }

    fn reinit(&mut self, level: u32, capacity: usize) {
        self.level = level;
        self.count = 0;
        if self.slots.len() == capacity {
            self.slots.fill(None);
        } else {
            self.slots = vec![None; capacity].into_boxed_slice();
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.level == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots in ascending slot order.
    pub(crate) fn occupied(&self) -> impl Iterator<Item = (usize, &Branch<D, R>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|b| (i, b)))
    }

    /// Minimum bounding rectangle of all occupied branches.
    ///
    /// Returns [`Rect::NULL`] for an empty node.
    pub(crate) fn cover(&self) -> Rect<D> {
        self.occupied()
            .fold(Rect::NULL, |acc, (_, b)| acc.union(&b.rect))
    }

    /// Slot index of the occupied branch whose rectangle grows the least
    /// (by `metric`) when combined with `rect`.
    ///
    /// Ties go to the branch with the smaller current measure, then to the
    /// lowest slot index, so the choice is deterministic for a given tree.
    pub(crate) fn pick_branch(&self, rect: &Rect<D>, metric: VolumeMetric) -> usize {
        let mut best: Option<(usize, f64, f64)> = None;
        for (i, b) in self.occupied() {
            let area = metric.measure(&b.rect);
            let increase = metric.measure(&b.rect.union(rect)) - area;
            let better = match best {
                None => true,
                Some((_, best_incr, best_area)) => {
                    increase < best_incr || (increase == best_incr && area < best_area)
                }
            };
            if better {
                best = Some((i, increase, area));
            }
        }
        best.expect("pick_branch requires a non-empty node").0
    }

    /// Place `branch` into the first empty slot. The caller must have
    /// checked for room; overflow is handled by the split path instead.
    pub(crate) fn push_branch(&mut self, branch: Branch<D, R>) {
        debug_assert!(self.count < self.capacity(), "push_branch on a full node");
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .expect("count below capacity implies an empty slot");
        self.slots[slot] = Some(branch);
        self.count += 1;
    }

    /// Reset slot `i` to empty without compacting the remaining slots.
    pub(crate) fn disconnect(&mut self, i: usize) {
        debug_assert!(self.slots[i].is_some(), "disconnect of an empty slot");
        self.slots[i] = None;
        self.count -= 1;
    }

    /// Remove and return every occupied branch in slot order, leaving the
    /// node empty.
    pub(crate) fn take_branches(&mut self) -> Vec<Branch<D, R>> {
        let out: Vec<_> = self.slots.iter_mut().filter_map(Option::take).collect();
        self.count = 0;
        out
    }
}

/// Arena of nodes. Nodes are allocated singly, mutated in place, and
/// released individually back onto a free list.
#[derive(Clone, Debug)]
pub(crate) struct Arena<const D: usize, R> {
    nodes: Vec<Node<D, R>>,
    free: Vec<NodeIndex>,
}

impl<const D: usize, R: Copy> Arena<D, R> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Allocate an empty node, reusing a freed slot when one is available.
    pub(crate) fn alloc(&mut self, level: u32, capacity: usize) -> NodeIndex {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx.get()].reinit(level, capacity);
            idx
        } else {
            self.nodes.push(Node::new(level, capacity));
            NodeIndex::new(self.nodes.len() - 1)
        }
    }

    /// Release one node. Children reachable from it must have been released
    /// or re-homed first.
    pub(crate) fn free(&mut self, idx: NodeIndex) {
        let node = &mut self.nodes[idx.get()];
        node.slots.fill(None);
        node.count = 0;
        self.free.push(idx);
    }

    /// Nodes currently allocated (not on the free list).
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}

impl<const D: usize, R> core::ops::Index<NodeIndex> for Arena<D, R> {
    type Output = Node<D, R>;

    fn index(&self, idx: NodeIndex) -> &Self::Output {
        &self.nodes[idx.get()]
    }
}

impl<const D: usize, R> core::ops::IndexMut<NodeIndex> for Arena<D, R> {
    fn index_mut(&mut self, idx: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[idx.get()]
    }
}
