/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::primitives;
use crate::traits::RankGraph;

/// The static, per-run inputs of a rank loop.
///
/// All vectors are indexed by vertex position. The CSR arrays are those of
/// the _transpose_ of the graph, so that the arcs leaving a vertex lead to
/// its predecessors.
#[derive(Debug, Clone)]
pub struct RankInputs<'a> {
    /// Degree-cumulative offsets of the transpose.
    pub offsets: &'a [usize],
    /// Concatenated predecessor lists.
    pub targets: &'a [usize],
    /// The scaling factor of each vertex (its contribution per unit of rank).
    pub scaling: &'a [f64],
    /// The outdegree (in the original graph) of each vertex.
    pub degrees: &'a [usize],
}

impl<'a> RankInputs<'a> {
    /// Creates the inputs of a loop from the transpose of a graph and
    /// precomputed scaling factors and outdegrees.
    ///
    /// # Panics
    ///
    /// Panics if the lengths of `scaling` or `degrees` do not match the number
    /// of vertices.
    pub fn new<G: RankGraph>(transpose: &'a G, scaling: &'a [f64], degrees: &'a [usize]) -> Self {
        let n = transpose.num_nodes();
        assert_eq!(
            scaling.len(),
            n,
            "Scaling vector length ({}) does not match the number of nodes ({n})",
            scaling.len()
        );
        assert_eq!(
            degrees.len(),
            n,
            "Degree vector length ({}) does not match the number of nodes ({n})",
            degrees.len()
        );
        Self {
            offsets: transpose.offsets(),
            targets: transpose.targets(),
            scaling,
            degrees,
        }
    }

    /// Returns the number of vertices.
    pub fn num_nodes(&self) -> usize {
        self.degrees.len()
    }

    /// Returns the predecessors of the vertex at position `node`.
    #[inline(always)]
    pub fn predecessors(&self, node: usize) -> &'a [usize] {
        &self.targets[self.offsets[node]..self.offsets[node + 1]]
    }
}

/// The rank estimates and contributions owned by a loop for the duration of a
/// run.
///
/// On return from a loop, [`current`](Self::current) always holds the latest
/// estimate. In synchronous loops the two estimates are exchanged by
/// ownership at the start of every sweep but the first, so that
/// [`previous`](Self::previous) holds the estimate computed by the last sweep
/// while [`current`](Self::current) is being rewritten; in asynchronous loops
/// the current estimate is updated in place and the previous estimate keeps,
/// for each updated vertex, the value it had before its last update.
#[derive(Debug, Clone, PartialEq)]
pub struct RankBuffers {
    pub current: Box<[f64]>,
    pub previous: Box<[f64]>,
    pub contributions: Box<[f64]>,
}

impl RankBuffers {
    /// Allocates buffers for `scaling.len()` vertices, initialized with the
    /// given ranks or, if `initial` is `None`, with the uniform distribution.
    ///
    /// Contributions are initialized accordingly.
    ///
    /// # Panics
    ///
    /// Panics if the length of `initial` does not match the number of vertices.
    pub fn new(initial: Option<&[f64]>, scaling: &[f64]) -> Self {
        let n = scaling.len();
        let current: Box<[f64]> = match initial {
            Some(q) => {
                assert_eq!(
                    q.len(),
                    n,
                    "Initial rank vector length ({}) does not match the number of nodes ({n})",
                    q.len()
                );
                q.into()
            }
            None => vec![1.0 / n as f64; n].into_boxed_slice(),
        };
        let mut contributions = vec![0.0; n].into_boxed_slice();
        primitives::refresh_contributions(&mut contributions, &current, scaling);
        Self {
            previous: current.clone(),
            current,
            contributions,
        }
    }

    /// Consumes the buffers, returning the latest estimate.
    pub fn into_ranks(self) -> Box<[f64]> {
        self.current
    }
}
