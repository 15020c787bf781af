/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::options::PagerankOptions;
use super::primitives;
use super::state::{RankBuffers, RankInputs};
use super::update::{Activation, RankUpdate};
use crate::threads::ThreadContext;
use std::ops::Range;

/// Performs sequential rank sweeps until convergence, cancellation, or
/// exhaustion of the iteration budget, and returns the number of sweeps
/// performed.
///
/// At each sweep:
///
/// 1. the teleport mass is computed (uniformly, or redistributing the rank of
///    dead ends if `DEAD` is true);
/// 2. the rank of each active vertex in `range` is recomputed by `update`;
/// 3. the contributions of _all_ vertices in `range` are refreshed, as
///    inactive vertices still feed their active successors;
/// 4. the error between the current and the previous estimate over `range` is
///    computed using the norm in `options`.
///
/// The loop stops when the error falls below the tolerance, when the token of
/// `thread` is found cancelled after a sweep, or after
/// [`max_iterations`](PagerankOptions::max_iterations) sweeps.
///
/// If `ASYNC` is false, each sweep reads only the estimate of the previous
/// one, and the two estimates are exchanged by ownership between sweeps;
/// otherwise updates see contributions refreshed earlier in the same sweep.
/// In both cases, on return the latest estimate is in
/// [`buffers.current`](RankBuffers::current).
///
/// `range` is recorded as the partition of `thread`, as
/// [`par_loop`](super::par::par_loop) does for each of its contexts.
///
/// `buffers` must have been initialized consistently (e.g., by
/// [`RankBuffers::new`]), with equal current and previous estimates.
#[allow(clippy::too_many_arguments)]
pub fn seq_loop<const ASYNC: bool, const DEAD: bool>(
    buffers: &mut RankBuffers,
    inputs: &RankInputs,
    options: &PagerankOptions,
    range: Range<usize>,
    thread: &ThreadContext,
    update: &impl RankUpdate,
    active: &(impl Activation + ?Sized),
) -> usize {
    let n = inputs.num_nodes();
    thread.set_partition(range.clone());
    let mut iterations = 0;

    while iterations < options.max_iterations {
        if !ASYNC && iterations > 0 {
            std::mem::swap(&mut buffers.current, &mut buffers.previous);
        }

        let teleport = if DEAD {
            // The latest estimate is the previous one in synchronous sweeps
            let latest = if ASYNC {
                &buffers.current
            } else {
                &buffers.previous
            };
            primitives::dead_end_teleport(
                options.damping,
                n,
                primitives::dead_end_rank(latest, inputs.degrees, 0..n),
            )
        } else {
            primitives::uniform_teleport(options.damping, n)
        };

        primitives::update_ranks::<ASYNC>(
            &mut buffers.current,
            &mut buffers.previous,
            &mut buffers.contributions,
            inputs,
            teleport,
            range.clone(),
            thread,
            update,
            active,
        );
        iterations += 1;

        primitives::refresh_contributions(
            &mut buffers.contributions[range.clone()],
            &buffers.current[range.clone()],
            &inputs.scaling[range.clone()],
        );

        let error = primitives::error(
            &buffers.current[range.clone()],
            &buffers.previous[range.clone()],
            options.norm,
        );
        log::debug!("Sweep {iterations}: error = {error}");

        if error < options.tolerance {
            break;
        }
        if thread.is_cancelled() {
            break;
        }
    }

    iterations
}
