/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::options::PagerankOptions;
use super::primitives;
use super::state::{RankBuffers, RankInputs};
use super::update::{Activation, RankUpdate};
use crate::threads::{ThreadContext, any_cancelled, assign_partitions, partition};
use kahan::KahanSum;
use rayon::ThreadPool;
use rayon::prelude::*;
use std::ops::Range;
use sync_cell_slice::SyncSlice;

/// Splits the part of `slice` covered by the partitions of the given
/// contexts into disjoint mutable chunks, one per context.
fn split_partitions<'a>(slice: &'a mut [f64], threads: &[ThreadContext]) -> Vec<&'a mut [f64]> {
    let mut chunks = Vec::with_capacity(threads.len());
    let mut rest = slice;
    let mut offset = 0;
    for thread in threads {
        let part = thread.partition();
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(part.start - offset);
        let (chunk, tail) = tail.split_at_mut(part.len());
        chunks.push(chunk);
        rest = tail;
        offset = part.end;
    }
    chunks
}

/// Performs parallel rank sweeps until convergence, cancellation, or
/// exhaustion of the iteration budget, and returns the number of sweeps
/// performed.
///
/// The algorithm is the same as that of [`seq_loop`](super::seq::seq_loop),
/// but `range` is split into contiguous, disjoint partitions, which are
/// assigned to the given contexts; each of the four phases of a sweep
/// (teleport mass, rank update, contribution refresh, error) is then run in
/// parallel on `thread_pool`, one task per context, and completes before the
/// next phase starts. Partial teleport masses and errors are combined in
/// context order, so results are reproducible for a given number of contexts.
///
/// The loop stops after a sweep if the token of any context is cancelled.
///
/// In the synchronous case the ranks computed are identical to those of
/// [`seq_loop`](super::seq::seq_loop), except for the rounding of the
/// dead-end rank, which is summed by partition. In the asynchronous case
/// updates see the contributions refreshed earlier in the same sweep within
/// their own partition, whereas contributions of other partitions are read
/// from a snapshot taken at the start of the sweep. Thus, results do not
/// depend on scheduling, and with a single context they are identical to
/// those of [`seq_loop`](super::seq::seq_loop); with more contexts the
/// relaxation is weaker, and the estimate after a given number of sweeps
/// differs from the sequential one, although the limit is the same.
///
/// # Panics
///
/// Panics if `threads` is empty.
#[allow(clippy::too_many_arguments)]
pub fn par_loop<const ASYNC: bool, const DEAD: bool>(
    buffers: &mut RankBuffers,
    inputs: &RankInputs,
    options: &PagerankOptions,
    range: Range<usize>,
    threads: &[ThreadContext],
    thread_pool: &ThreadPool,
    update: &impl RankUpdate,
    active: &(impl Activation + ?Sized),
) -> usize {
    let n = inputs.num_nodes();
    assign_partitions(threads, range);
    let mut iterations = 0;
    // Start-of-sweep contributions, read across partitions in asynchronous sweeps
    let mut snapshot = if ASYNC {
        buffers.contributions.clone()
    } else {
        Box::default()
    };

    thread_pool.install(|| {
        while iterations < options.max_iterations {
            if !ASYNC && iterations > 0 {
                std::mem::swap(&mut buffers.current, &mut buffers.previous);
            }

            let teleport = if DEAD {
                let latest: &[f64] = if ASYNC {
                    &buffers.current
                } else {
                    &buffers.previous
                };
                // The dead-end rank is needed for all vertices, not only for
                // those in the range, so we use a partition of 0..n.
                let partials: Vec<f64> = (0..threads.len())
                    .into_par_iter()
                    .map(|i| {
                        primitives::dead_end_rank(
                            latest,
                            inputs.degrees,
                            partition(0..n, threads.len(), i),
                        )
                    })
                    .collect();
                let dead_end_rank = partials
                    .into_iter()
                    .fold(KahanSum::<f64>::new(), |s, r| s + r)
                    .sum();
                primitives::dead_end_teleport(options.damping, n, dead_end_rank)
            } else {
                primitives::uniform_teleport(options.damping, n)
            };

            if ASYNC && iterations > 0 {
                snapshot.copy_from_slice(&buffers.contributions);
            }

            {
                let snapshot = &snapshot;
                let current = buffers.current.as_sync_slice();
                let previous = buffers.previous.as_sync_slice();
                let contributions = buffers.contributions.as_sync_slice();
                threads.par_iter().for_each(|thread| {
                    let part = thread.partition();
                    for v in part.clone() {
                        if !active.is_active(v) {
                            continue;
                        }
                        // SAFETY: each thread writes only the ranks and
                        // contributions of its own partition. In the
                        // asynchronous case contributions of other partitions
                        // are read from the snapshot; in the synchronous case
                        // contributions are not written.
                        unsafe {
                            let rank = update.rank(
                                thread,
                                v,
                                inputs.predecessors(v).iter().map(|&u| {
                                    if ASYNC && !part.contains(&u) {
                                        snapshot[u]
                                    } else {
                                        contributions[u].get()
                                    }
                                }),
                                teleport,
                            );
                            if ASYNC {
                                previous[v].set(current[v].get());
                                contributions[v].set(rank * inputs.scaling[v]);
                            }
                            current[v].set(rank);
                        }
                    }
                });
            }
            iterations += 1;

            let current = &buffers.current;
            split_partitions(&mut buffers.contributions, threads)
                .into_par_iter()
                .zip(threads.par_iter())
                .for_each(|(chunk, thread)| {
                    let part = thread.partition();
                    primitives::refresh_contributions(
                        chunk,
                        &current[part.clone()],
                        &inputs.scaling[part],
                    );
                });

            let previous = &buffers.previous;
            let partials: Vec<f64> = threads
                .par_iter()
                .map(|thread| {
                    let part = thread.partition();
                    primitives::error(&current[part.clone()], &previous[part], options.norm)
                })
                .collect();
            let error = primitives::combine_errors(options.norm, partials);
            log::debug!("Sweep {iterations}: error = {error}");

            if error < options.tolerance {
                break;
            }
            if any_cancelled(threads) {
                break;
            }
        }
    });

    iterations
}
