/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Worker contexts and cooperative cancellation.
//!
//! Rank loops do not own threads: the caller hands them one
//! [`ThreadContext`] per worker (a single one for sequential loops). Each
//! context carries the bounds of the vertex partition the worker is
//! responsible for, and a [`CancellationToken`] that can be cancelled from
//! outside (e.g., by a test harness simulating a fault) and is sampled by the
//! loops once per completed sweep.

use crossbeam_utils::CachePadded;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A shared cancellation flag.
///
/// Clones share the same flag. Cancellation is cooperative: a loop observing
/// a cancelled token stops after completing the current sweep, never in the
/// middle of one.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clears a previous cancellation request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Returns whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The state of a worker, as seen by rank loops.
///
/// Partition bounds are interior-mutable, so that parallel loops can assign
/// partitions to contexts they merely borrow.
#[derive(Debug, Default)]
pub struct ThreadContext {
    start: CachePadded<AtomicUsize>,
    end: CachePadded<AtomicUsize>,
    token: CancellationToken,
}

impl ThreadContext {
    /// Creates a context with an empty partition and a fresh token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with an empty partition sharing the given token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Creates `n` contexts, each with its own token.
    pub fn many(n: usize) -> Box<[Self]> {
        (0..n).map(|_| Self::new()).collect()
    }

    /// Returns the partition currently assigned to this context.
    pub fn partition(&self) -> Range<usize> {
        self.start.load(Ordering::Acquire)..self.end.load(Ordering::Acquire)
    }

    /// Assigns a partition to this context.
    pub fn set_partition(&self, range: Range<usize>) {
        self.start.store(range.start, Ordering::Release);
        self.end.store(range.end, Ordering::Release);
    }

    /// Returns the cancellation token of this context.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns whether the token of this context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Returns whether any of the given contexts has been cancelled.
pub fn any_cancelled(threads: &[ThreadContext]) -> bool {
    threads.iter().any(ThreadContext::is_cancelled)
}

/// Returns the `index`-th of `parts` contiguous, disjoint partitions covering
/// `range`.
///
/// The first `range.len() % parts` partitions contain one more element than
/// the others; with more partitions than elements, the trailing partitions
/// are empty.
pub fn partition(range: Range<usize>, parts: usize, index: usize) -> Range<usize> {
    debug_assert!(index < parts);
    let base = range.len() / parts;
    let extra = range.len() % parts;
    let start = range.start + index * base + index.min(extra);
    start..start + base + usize::from(index < extra)
}

/// Splits `range` into contiguous, disjoint partitions covering it, one per
/// context, and assigns them.
///
/// Partitions are those returned by [`partition`].
///
/// # Panics
///
/// Panics if `threads` is empty.
pub fn assign_partitions(threads: &[ThreadContext], range: Range<usize>) {
    assert!(!threads.is_empty(), "At least one thread context is needed");
    for (i, thread) in threads.iter().enumerate() {
        thread.set_partition(partition(range.clone(), threads.len(), i));
    }
}
