/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Traversal-bounded dynamic ranking.
//!
//! After a batch of arc deletions and insertions, only vertices reachable
//! from the endpoints of the modified arcs can change rank (as long as the
//! teleport mass does not change). The functions in this module compute this
//! _affected_ set by a reachability visit of the old graph, move it to the
//! positions of the new graph, and run a rank loop recomputing only the
//! affected vertices. Since unaffected vertices do not change, they do not
//! contribute to the error, and the computation stops as soon as the affected
//! vertices have converged.

use super::driver::{Executor, run};
use super::options::{PagerankOptions, PagerankResult};
use super::update::RankUpdate;
use crate::traits::RankGraph;
use crate::visits::DepthFirst;
use dsi_progress_logger::{ProgressLog, no_logging};
use std::convert::Infallible;
use std::ops::ControlFlow::{self, Continue};

/// Returns, for each vertex of `graph`, whether it is reachable from an
/// endpoint of one of the given arcs.
///
/// Arcs are expressed as pairs of keys; endpoints not in `graph` are ignored.
pub fn affected_vertices<G: RankGraph>(
    graph: &G,
    deletions: &[(G::Key, G::Key)],
    insertions: &[(G::Key, G::Key)],
) -> Box<[bool]> {
    let roots = deletions
        .iter()
        .chain(insertions)
        .flat_map(|&(src, dst)| [src, dst])
        .filter_map(|key| graph.node(key));
    let mut visit = DepthFirst::new(graph);
    let Continue(()) = visit.visit(roots, |_| -> ControlFlow<Infallible> { Continue(()) });
    visit.into_known()
}

/// Moves a per-vertex marking of `old` to the positions of `new`, matching
/// vertices by key.
///
/// Vertices of `new` that are not in `old` are not marked.
///
/// # Panics
///
/// Panics if the length of `marks` does not match the number of vertices of
/// `old`.
pub fn reindex_affected<G: RankGraph, H: RankGraph<Key = G::Key>>(
    old: &G,
    marks: &[bool],
    new: &H,
) -> Box<[bool]> {
    assert_eq!(marks.len(), old.num_nodes());
    (0..new.num_nodes())
        .map(|v| old.node(new.key(v)).is_some_and(|u| marks[u]))
        .collect()
}

/// Moves the ranks of the vertices of `old` to the positions of `new`,
/// matching vertices by key.
///
/// Vertices of `new` that are not in `old` receive rank 1 / *n*, where *n* is
/// the number of vertices of `new`. The result is not normalized.
///
/// # Panics
///
/// Panics if the length of `ranks` does not match the number of vertices of
/// `old`.
pub fn reorder_ranks<G: RankGraph, H: RankGraph<Key = G::Key>>(
    old: &G,
    ranks: &[f64],
    new: &H,
) -> Box<[f64]> {
    assert_eq!(ranks.len(), old.num_nodes());
    let n = new.num_nodes();
    (0..n)
        .map(|v| match old.node(new.key(v)) {
            Some(u) => ranks[u],
            None => 1.0 / n as f64,
        })
        .collect()
}

/// Computes the rank of the vertices of a graph after a batch of arc
/// deletions and insertions, recomputing only the vertices reachable in the
/// old graph from the endpoints of the modified arcs.
///
/// `old` and `old_transpose` are the graph before the batch and its
/// transpose; `new` and `new_transpose` are the graph after the batch and its
/// transpose. Arcs are expressed as pairs of keys. `initial` is the starting
/// estimate, in the position order of `new` (usually the result of the
/// previous computation, moved by [`reorder_ranks`]): unaffected vertices keep
/// their initial rank. If `initial` is `None`, the uniform distribution is
/// used.
///
/// Vertices of `new` not reachable in `old` from a modified arc (in
/// particular, new vertices not incident to a modified arc) are not
/// recomputed. Error is measured only on recomputed vertices, so the
/// tolerance is guaranteed only on the affected set.
///
/// For an empty new graph, an empty result with zero iterations is returned
/// without running any sweep.
///
/// # Panics
///
/// Panics if the length of `initial` does not match the number of vertices of
/// `new`, or if a graph and its transpose have a different number of
/// vertices.
#[allow(clippy::too_many_arguments)]
pub fn dynamic_pagerank<G: RankGraph, H: RankGraph<Key = G::Key>>(
    old: &G,
    old_transpose: &H,
    new: &G,
    new_transpose: &H,
    deletions: &[(G::Key, G::Key)],
    insertions: &[(G::Key, G::Key)],
    initial: Option<&[f64]>,
    options: &PagerankOptions,
    update: &impl RankUpdate,
    executor: Executor,
) -> PagerankResult {
    dynamic_pagerank_with_logging(
        old,
        old_transpose,
        new,
        new_transpose,
        deletions,
        insertions,
        initial,
        options,
        update,
        executor,
        no_logging![],
    )
}

/// Like [`dynamic_pagerank`], but logs progress on the given
/// [`ProgressLog`], one update per sweep.
#[allow(clippy::too_many_arguments)]
pub fn dynamic_pagerank_with_logging<G: RankGraph, H: RankGraph<Key = G::Key>>(
    old: &G,
    old_transpose: &H,
    new: &G,
    new_transpose: &H,
    deletions: &[(G::Key, G::Key)],
    insertions: &[(G::Key, G::Key)],
    initial: Option<&[f64]>,
    options: &PagerankOptions,
    update: &impl RankUpdate,
    executor: Executor,
    pl: &mut impl ProgressLog,
) -> PagerankResult {
    assert_eq!(old.num_nodes(), old_transpose.num_nodes());
    assert_eq!(new.num_nodes(), new_transpose.num_nodes());
    if new_transpose.num_nodes() == 0 {
        return PagerankResult::default();
    }

    let affected = reindex_affected(old, &affected_vertices(old, deletions, insertions), new);
    log::info!(
        "{} deletions, {} insertions: {} affected vertices out of {}",
        deletions.len(),
        insertions.len(),
        affected.iter().filter(|&&a| a).count(),
        affected.len()
    );

    run(
        new_transpose,
        initial,
        options,
        executor,
        update,
        &*affected,
        pl,
    )
}
