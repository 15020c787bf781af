/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Per-vertex capabilities used by the rank loops.
//!
//! A [`RankUpdate`] computes the new rank of a vertex from the contributions
//! of its predecessors and the teleport mass of the sweep; an [`Activation`]
//! tells the loops which vertices must be recomputed. Alternate ranking rules
//! and activation policies can be plugged in without touching the loops.

use crate::threads::ThreadContext;
use kahan::KahanSum;

/// Computes the new rank of a vertex.
pub trait RankUpdate: Sync {
    /// Returns the new rank of `node`.
    ///
    /// `contributions` enumerates the contributions of the predecessors of
    /// `node` (their rank times their scaling factor, which already includes
    /// the damping factor), and `teleport` is the teleport mass of the sweep.
    /// `thread` is the context of the worker performing the update.
    fn rank(
        &self,
        thread: &ThreadContext,
        node: usize,
        contributions: impl Iterator<Item = f64>,
        teleport: f64,
    ) -> f64;
}

/// The standard PageRank update: the teleport mass plus the (compensated) sum
/// of the incoming contributions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardUpdate;

impl RankUpdate for StandardUpdate {
    #[inline(always)]
    fn rank(
        &self,
        _thread: &ThreadContext,
        _node: usize,
        contributions: impl Iterator<Item = f64>,
        teleport: f64,
    ) -> f64 {
        let mut sigma = KahanSum::<f64>::new();
        for c in contributions {
            sigma += c;
        }
        teleport + sigma.sum()
    }
}

/// Tells whether a vertex must be recomputed.
///
/// Implemented by [`AllActive`] and by slices, boxed slices and vectors of
/// Booleans (membership by position).
pub trait Activation: Sync {
    fn is_active(&self, node: usize) -> bool;
}

/// All vertices are active.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllActive;

impl Activation for AllActive {
    #[inline(always)]
    fn is_active(&self, _node: usize) -> bool {
        true
    }
}

impl Activation for [bool] {
    #[inline(always)]
    fn is_active(&self, node: usize) -> bool {
        self[node]
    }
}

impl Activation for Box<[bool]> {
    #[inline(always)]
    fn is_active(&self, node: usize) -> bool {
        self[node]
    }
}

impl Activation for Vec<bool> {
    #[inline(always)]
    fn is_active(&self, node: usize) -> bool {
        self[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_update() {
        let thread = ThreadContext::new();
        let rank = StandardUpdate.rank(&thread, 0, [0.1, 0.2, 0.3].into_iter(), 0.05);
        assert!((rank - 0.65).abs() < 1E-15);
        assert_eq!(StandardUpdate.rank(&thread, 0, std::iter::empty(), 0.05), 0.05);
    }

    #[test]
    fn test_activation() {
        let marks = vec![true, false, true];
        assert!(marks.is_active(0));
        assert!(!marks.as_slice().is_active(1));
        assert!(AllActive.is_active(1));
        let boxed = marks.into_boxed_slice();
        assert!(boxed.is_active(2));
    }
}
