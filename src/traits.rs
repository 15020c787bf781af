/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The graph interface consumed by the rank computations.
//!
//! The ranking code never stores or mutates graphs: it only needs a snapshot
//! exposing its arcs in compressed sparse-row form and a stable enumeration of
//! vertex keys. Vertex _positions_ (the indices `0..num_nodes()`) are used to
//! align every per-vertex vector; _keys_ are used to relate two snapshots of
//! the same evolving graph, in which the same vertex may sit at different
//! positions.

use std::fmt::Debug;
use std::hash::Hash;

/// A graph snapshot in compressed sparse-row form with keyed vertices.
///
/// The successors of the vertex at position `v` are
/// `targets()[offsets()[v]..offsets()[v + 1]]`, so `offsets()` has length
/// `num_nodes() + 1`.
pub trait RankGraph {
    /// The type of vertex keys.
    type Key: Copy + Eq + Hash + Debug;

    /// Returns the number of vertices.
    fn num_nodes(&self) -> usize;

    /// Returns the degree-cumulative offsets, of length
    /// [`num_nodes`](Self::num_nodes) + 1.
    fn offsets(&self) -> &[usize];

    /// Returns the concatenated successor lists.
    fn targets(&self) -> &[usize];

    /// Returns the key of the vertex at position `node`.
    fn key(&self, node: usize) -> Self::Key;

    /// Returns the position of the vertex with the given key, if present.
    fn node(&self, key: Self::Key) -> Option<usize>;

    /// Returns the number of arcs.
    fn num_arcs(&self) -> usize {
        self.targets().len()
    }

    /// Returns the successors of the vertex at position `node`.
    fn successors(&self, node: usize) -> &[usize] {
        let offsets = self.offsets();
        &self.targets()[offsets[node]..offsets[node + 1]]
    }

    /// Returns the outdegree of the vertex at position `node`.
    fn outdegree(&self, node: usize) -> usize {
        let offsets = self.offsets();
        offsets[node + 1] - offsets[node]
    }
}

impl<G: RankGraph> RankGraph for &G {
    type Key = G::Key;

    fn num_nodes(&self) -> usize {
        (**self).num_nodes()
    }

    fn offsets(&self) -> &[usize] {
        (**self).offsets()
    }

    fn targets(&self) -> &[usize] {
        (**self).targets()
    }

    fn key(&self, node: usize) -> Self::Key {
        (**self).key(node)
    }

    fn node(&self, key: Self::Key) -> Option<usize> {
        (**self).node(key)
    }
}
