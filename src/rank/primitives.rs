/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Vector primitives orchestrated by the rank loops.
//!
//! Functions working on a subset of the vertices take either a range or
//! slices already restricted to it, so that parallel loops can apply them to
//! the partition of each worker.

use super::options::ErrorNorm;
use super::state::RankInputs;
use super::update::{Activation, RankUpdate};
use crate::threads::ThreadContext;
use crate::traits::RankGraph;
use kahan::KahanSum;
use std::ops::Range;

/// Returns the outdegree of each vertex of a graph, given its transpose.
pub fn outdegrees_from_transpose<G: RankGraph>(transpose: &G) -> Box<[usize]> {
    let mut degrees = vec![0; transpose.num_nodes()].into_boxed_slice();
    for &pred in transpose.targets() {
        degrees[pred] += 1;
    }
    degrees
}

/// Returns the scaling factor of each vertex: the damping factor divided by
/// the outdegree, or zero for dead ends.
pub fn scaling_factors(degrees: &[usize], damping: f64) -> Box<[f64]> {
    degrees
        .iter()
        .map(|&d| if d == 0 { 0.0 } else { damping / d as f64 })
        .collect()
}

/// Sets each contribution to the corresponding rank times the corresponding
/// scaling factor.
pub fn refresh_contributions(contributions: &mut [f64], ranks: &[f64], scaling: &[f64]) {
    debug_assert_eq!(contributions.len(), ranks.len());
    debug_assert_eq!(contributions.len(), scaling.len());
    for ((c, &r), &f) in contributions.iter_mut().zip(ranks).zip(scaling) {
        *c = r * f;
    }
}

/// Returns the teleport mass when dead-end rank is not redistributed,
/// (1 − α) / *n*.
#[inline(always)]
pub fn uniform_teleport(damping: f64, n: usize) -> f64 {
    (1.0 - damping) / n as f64
}

/// Returns the total rank of the dead ends in `range`.
pub fn dead_end_rank(ranks: &[f64], degrees: &[usize], range: Range<usize>) -> f64 {
    let mut sum = KahanSum::<f64>::new();
    for v in range {
        if degrees[v] == 0 {
            sum += ranks[v];
        }
    }
    sum.sum()
}

/// Returns the teleport mass redistributing the given dead-end rank
/// uniformly, (1 − α) / *n* + α · *d* / *n*.
#[inline(always)]
pub fn dead_end_teleport(damping: f64, n: usize, dead_end_rank: f64) -> f64 {
    (1.0 - damping) / n as f64 + damping * dead_end_rank / n as f64
}

/// Returns the (partial) error between two estimates restricted to the same
/// vertices.
///
/// Partial errors of disjoint vertex sets are combined by
/// [`combine_errors`].
pub fn error(current: &[f64], previous: &[f64], norm: ErrorNorm) -> f64 {
    debug_assert_eq!(current.len(), previous.len());
    let diffs = current.iter().zip(previous).map(|(&a, &b)| (a - b).abs());
    match norm {
        ErrorNorm::L1 => diffs.fold(KahanSum::<f64>::new(), |s, d| s + d).sum(),
        ErrorNorm::L2 => diffs.fold(KahanSum::<f64>::new(), |s, d| s + d * d).sum(),
        ErrorNorm::LInf => diffs.fold(0.0, f64::max),
    }
}

/// Combines partial errors, in order.
pub fn combine_errors(norm: ErrorNorm, partials: impl IntoIterator<Item = f64>) -> f64 {
    match norm {
        ErrorNorm::L1 | ErrorNorm::L2 => partials
            .into_iter()
            .fold(KahanSum::<f64>::new(), |s, e| s + e)
            .sum(),
        ErrorNorm::LInf => partials.into_iter().fold(0.0, f64::max),
    }
}

/// Recomputes the rank of the active vertices in `range`.
///
/// Inactive vertices are left untouched. In the asynchronous case, the old
/// rank of an updated vertex is saved in `previous` and its contribution is
/// refreshed immediately, so that later updates see it; in the synchronous
/// case `previous` and `contributions` are only read.
#[allow(clippy::too_many_arguments)]
pub fn update_ranks<const ASYNC: bool>(
    current: &mut [f64],
    previous: &mut [f64],
    contributions: &mut [f64],
    inputs: &RankInputs,
    teleport: f64,
    range: Range<usize>,
    thread: &ThreadContext,
    update: &impl RankUpdate,
    active: &(impl Activation + ?Sized),
) {
    for v in range {
        if !active.is_active(v) {
            continue;
        }
        let preds = inputs.predecessors(v);
        let rank = update.rank(thread, v, preds.iter().map(|&u| contributions[u]), teleport);
        if ASYNC {
            previous[v] = current[v];
            contributions[v] = rank * inputs.scaling[v];
        }
        current[v] = rank;
    }
}
