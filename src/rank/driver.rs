/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::options::{PagerankOptions, PagerankResult, Synchronization, Teleport};
use super::par::par_loop;
use super::primitives;
use super::seq::seq_loop;
use super::state::{RankBuffers, RankInputs};
use super::update::{Activation, RankUpdate};
use crate::threads::{ThreadContext, any_cancelled};
use crate::traits::RankGraph;
use dsi_progress_logger::ProgressLog;
use rayon::ThreadPool;
use std::time::Instant;

/// Selects the loop running the sweeps of a driver.
///
/// Thread contexts (and thread pools) are owned by the caller, who can thus
/// cancel their tokens while a computation is running.
#[derive(Debug, Clone, Copy)]
pub enum Executor<'a> {
    /// Runs [`seq_loop`] with the given context.
    Sequential(&'a ThreadContext),
    /// Runs [`par_loop`] on the given pool, with one partition per context.
    Parallel {
        thread_pool: &'a ThreadPool,
        threads: &'a [ThreadContext],
    },
}

impl Executor<'_> {
    /// Returns whether any context of this executor has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Executor::Sequential(thread) => thread.is_cancelled(),
            Executor::Parallel { threads, .. } => any_cancelled(threads),
        }
    }
}

fn dispatch<const ASYNC: bool, const DEAD: bool>(
    buffers: &mut RankBuffers,
    inputs: &RankInputs,
    options: &PagerankOptions,
    executor: Executor,
    update: &impl RankUpdate,
    active: &(impl Activation + ?Sized),
) -> usize {
    let n = inputs.num_nodes();
    match executor {
        Executor::Sequential(thread) => {
            seq_loop::<ASYNC, DEAD>(buffers, inputs, options, 0..n, thread, update, active)
        }
        Executor::Parallel {
            thread_pool,
            threads,
        } => par_loop::<ASYNC, DEAD>(
            buffers,
            inputs,
            options,
            0..n,
            threads,
            thread_pool,
            update,
            active,
        ),
    }
}

/// Sets up the per-run vectors of a non-empty graph, runs the loop selected
/// by the options and the executor, and packages the result.
pub(crate) fn run<G: RankGraph>(
    transpose: &G,
    initial: Option<&[f64]>,
    options: &PagerankOptions,
    executor: Executor,
    update: &impl RankUpdate,
    active: &(impl Activation + ?Sized),
    pl: &mut impl ProgressLog,
) -> PagerankResult {
    let n = transpose.num_nodes();
    debug_assert!(n > 0);

    pl.info(format_args!("Computing outdegrees and scaling factors..."));
    let degrees = primitives::outdegrees_from_transpose(transpose);
    let scaling = primitives::scaling_factors(&degrees, options.damping);
    let inputs = RankInputs::new(transpose, &scaling, &degrees);
    let mut buffers = RankBuffers::new(initial, &scaling);

    log::info!("Options: {options}");
    log::info!(
        "Initial ranks: {}",
        if initial.is_some() { "custom" } else { "uniform" }
    );
    log::info!(
        "{} dead ends",
        degrees.iter().filter(|&&d| d == 0).count()
    );

    pl.item_name("sweep");
    pl.expected_updates(Some(options.max_iterations));
    pl.start(format!(
        "Computing PageRank on {n} nodes (damping={})...",
        options.damping
    ));

    let start = Instant::now();
    let iterations = match (options.synchronization, options.teleport) {
        (Synchronization::Synchronous, Teleport::Uniform) => {
            dispatch::<false, false>(&mut buffers, &inputs, options, executor, update, active)
        }
        (Synchronization::Synchronous, Teleport::DeadEndAware) => {
            dispatch::<false, true>(&mut buffers, &inputs, options, executor, update, active)
        }
        (Synchronization::Asynchronous, Teleport::Uniform) => {
            dispatch::<true, false>(&mut buffers, &inputs, options, executor, update, active)
        }
        (Synchronization::Asynchronous, Teleport::DeadEndAware) => {
            dispatch::<true, true>(&mut buffers, &inputs, options, executor, update, active)
        }
    };
    let time = start.elapsed();

    pl.update_with_count(iterations);
    pl.done();

    let faulted = executor.is_cancelled();
    if faulted {
        log::warn!("Stopped by cancellation after {iterations} sweeps");
    } else if iterations == options.max_iterations {
        log::info!("Iteration budget exhausted ({iterations} sweeps)");
    } else {
        log::info!("Converged after {iterations} sweeps");
    }

    PagerankResult {
        ranks: buffers.into_ranks(),
        iterations,
        faulted,
        time,
    }
}
