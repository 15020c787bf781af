/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::driver::{Executor, run};
use super::options::{PagerankOptions, PagerankResult};
use super::update::{AllActive, RankUpdate};
use crate::traits::RankGraph;
use dsi_progress_logger::{ProgressLog, no_logging};

/// Computes the rank of every vertex of a graph from scratch.
///
/// **Warning**: since we need to enumerate the _predecessors_ of a vertex,
/// you must pass the **transpose** of the graph.
///
/// `initial`, if present, is the starting estimate, in position order;
/// otherwise, the uniform distribution is used. Every sweep recomputes all
/// vertices. For an empty graph, an empty result with zero iterations is
/// returned without running any sweep.
///
/// # Examples
///
/// ```
/// use dynrank::graphs::keyed_graph::KeyedGraph;
/// use dynrank::rank::{Executor, PagerankOptions, StandardUpdate, static_pagerank};
/// use dynrank::threads::ThreadContext;
///
/// // A directed 4-cycle: all vertices have the same rank
/// let g = KeyedGraph::from_arcs(0..4, [(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
/// let thread = ThreadContext::new();
/// let result = static_pagerank(
///     &g.transpose(),
///     None,
///     &PagerankOptions::default(),
///     &StandardUpdate,
///     Executor::Sequential(&thread),
/// );
///
/// assert!(result.iterations < 500);
/// assert!(result.ranks.iter().all(|&r| (r - 0.25).abs() < 1E-12));
/// ```
///
/// # Panics
///
/// Panics if the length of `initial` does not match the number of vertices.
pub fn static_pagerank<G: RankGraph>(
    transpose: &G,
    initial: Option<&[f64]>,
    options: &PagerankOptions,
    update: &impl RankUpdate,
    executor: Executor,
) -> PagerankResult {
    static_pagerank_with_logging(transpose, initial, options, update, executor, no_logging![])
}

/// Like [`static_pagerank`], but logs progress on the given
/// [`ProgressLog`], one update per sweep.
pub fn static_pagerank_with_logging<G: RankGraph>(
    transpose: &G,
    initial: Option<&[f64]>,
    options: &PagerankOptions,
    update: &impl RankUpdate,
    executor: Executor,
    pl: &mut impl ProgressLog,
) -> PagerankResult {
    if transpose.num_nodes() == 0 {
        return PagerankResult::default();
    }
    run(transpose, initial, options, executor, update, &AllActive, pl)
}
