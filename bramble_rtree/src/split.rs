// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overflow splitting: partition a full node's branches plus one overflow
//! branch into two groups, each meeting the minimum fill.

use alloc::vec::Vec;

use crate::node::Branch;
use crate::rect::VolumeMetric;

/// Seed-and-distribute strategy used when a node overflows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Guttman's quadratic split: seed with the pair wasting the most
    /// volume, then repeatedly place the branch with the strongest group
    /// preference. Better trees, O(n^2) per split.
    #[default]
    Quadratic,
    /// Linear split: seed with the most separated pair along the best
    /// axis, then distribute the rest in index order, alternating groups.
    /// Cheaper splits, looser trees.
    Linear,
}

/// Partition `branches` (a node's capacity plus the overflow branch) into
/// two non-empty groups, each with at least `min_fill` members.
///
/// Every input branch lands in exactly one group. Tie-breaks are
/// deterministic so identical insertion sequences produce identical trees.
pub(crate) fn partition<const D: usize, R: Copy>(
    branches: Vec<Branch<D, R>>,
    strategy: SplitStrategy,
    metric: VolumeMetric,
    min_fill: usize,
) -> (Vec<Branch<D, R>>, Vec<Branch<D, R>>) {
    debug_assert!(branches.len() >= 2, "split requires at least two branches");
    debug_assert!(
        2 * min_fill <= branches.len(),
        "min fill must leave room for two groups"
    );
    match strategy {
        SplitStrategy::Quadratic => quadratic(branches, metric, min_fill),
        SplitStrategy::Linear => linear(branches, min_fill),
    }
}

fn quadratic<const D: usize, R: Copy>(
    branches: Vec<Branch<D, R>>,
    metric: VolumeMetric,
    min_fill: usize,
) -> (Vec<Branch<D, R>>, Vec<Branch<D, R>>) {
    let n = branches.len();

    // Seeds: the pair whose combined rectangle wastes the most volume
    // relative to the pair's own volumes. Strict comparison keeps the
    // lowest-indexed pair on ties.
    let (mut seed1, mut seed2) = (0, 1);
    let mut worst = f64::NEG_INFINITY;
    for i in 0..n {
        let vi = metric.measure(&branches[i].rect);
        for j in (i + 1)..n {
            let combined = branches[i].rect.union(&branches[j].rect);
            let waste = metric.measure(&combined) - vi - metric.measure(&branches[j].rect);
            if waste > worst {
                worst = waste;
                seed1 = i;
                seed2 = j;
            }
        }
    }

    let mut group1 = Vec::with_capacity(n);
    let mut group2 = Vec::with_capacity(n);
    let mut cover1 = branches[seed1].rect;
    let mut cover2 = branches[seed2].rect;
    group1.push(branches[seed1]);
    group2.push(branches[seed2]);

    let mut remaining: Vec<usize> = (0..n).filter(|&i| i != seed1 && i != seed2).collect();
    while !remaining.is_empty() {
        // Forced assignment once a group needs every leftover to reach
        // minimum fill, even when locally suboptimal.
        if group1.len() + remaining.len() == min_fill {
            for i in remaining.drain(..) {
                cover1 = cover1.union(&branches[i].rect);
                group1.push(branches[i]);
            }
            break;
        }
        if group2.len() + remaining.len() == min_fill {
            for i in remaining.drain(..) {
                cover2 = cover2.union(&branches[i].rect);
                group2.push(branches[i]);
            }
            break;
        }

        // Pick the branch with the strongest preference for one group.
        // `remaining` stays in ascending index order, so strict comparison
        // resolves ties toward the lowest index.
        let m1 = metric.measure(&cover1);
        let m2 = metric.measure(&cover2);
        let mut pick = 0;
        let (mut pick_d1, mut pick_d2) = (0.0, 0.0);
        let mut pick_pref = f64::NEG_INFINITY;
        for (pos, &i) in remaining.iter().enumerate() {
            let d1 = metric.measure(&cover1.union(&branches[i].rect)) - m1;
            let d2 = metric.measure(&cover2.union(&branches[i].rect)) - m2;
            let pref = (d1 - d2).abs();
            if pref > pick_pref {
                pick_pref = pref;
                pick = pos;
                pick_d1 = d1;
                pick_d2 = d2;
            }
        }
        let i = remaining.remove(pick);
        let to_first = if pick_d1 != pick_d2 {
            pick_d1 < pick_d2
        } else {
            // Equal increase: the currently smaller group wins, then group 1.
            group1.len() <= group2.len()
        };
        if to_first {
            cover1 = cover1.union(&branches[i].rect);
            group1.push(branches[i]);
        } else {
            cover2 = cover2.union(&branches[i].rect);
            group2.push(branches[i]);
        }
    }

    (group1, group2)
}

fn linear<const D: usize, R: Copy>(
    branches: Vec<Branch<D, R>>,
    min_fill: usize,
) -> (Vec<Branch<D, R>>, Vec<Branch<D, R>>) {
    let n = branches.len();

    // Per axis: the branch with the lowest high bound and the branch with
    // the highest low bound; the axis with the greatest normalized
    // separation supplies the seeds.
    let mut best_sep = f64::NEG_INFINITY;
    let (mut seed1, mut seed2) = (0, 1);
    for a in 0..D {
        let mut lowest_high = (0, branches[0].rect.max[a]);
        let mut highest_low = (0, branches[0].rect.min[a]);
        let mut span_min = f64::INFINITY;
        let mut span_max = f64::NEG_INFINITY;
        for (i, b) in branches.iter().enumerate() {
            if b.rect.max[a] < lowest_high.1 {
                lowest_high = (i, b.rect.max[a]);
            }
            if b.rect.min[a] > highest_low.1 {
                highest_low = (i, b.rect.min[a]);
            }
            span_min = span_min.min(b.rect.min[a]);
            span_max = span_max.max(b.rect.max[a]);
        }
        let width = span_max - span_min;
        let sep = if width > 0.0 {
            (highest_low.1 - lowest_high.1) / width
        } else {
            0.0
        };
        if sep > best_sep {
            best_sep = sep;
            seed1 = lowest_high.0;
            seed2 = highest_low.0;
        }
    }
    if seed1 == seed2 {
        // Degenerate input (all rectangles alike); fall back to slot order.
        seed2 = if seed1 == 0 { 1 } else { 0 };
    }

    let mut group1 = Vec::with_capacity(n);
    let mut group2 = Vec::with_capacity(n);
    group1.push(branches[seed1]);
    group2.push(branches[seed2]);

    // Distribute the rest in index order, alternating so both groups reach
    // minimum fill (alternation keeps the sizes within one of each other,
    // and min_fill <= n / 2).
    let mut to_first = true;
    for (i, b) in branches.iter().enumerate() {
        if i == seed1 || i == seed2 {
            continue;
        }
        if to_first {
            group1.push(*b);
        } else {
            group2.push(*b);
        }
        to_first = !to_first;
    }
    debug_assert!(
        group1.len() >= min_fill && group2.len() >= min_fill,
        "alternating distribution must satisfy minimum fill"
    );

    (group1, group2)
}
