/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::RankGraph;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Errors raised while building a [`KeyedGraph`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError<K: Debug> {
    #[error("Duplicate vertex key {0:?}")]
    DuplicateKey(K),
    #[error("Arc ({src:?}, {dst:?}) refers to an unknown vertex key")]
    UnknownKey { src: K, dst: K },
}

/// An immutable compressed sparse-row graph whose vertices carry keys.
///
/// Positions follow the order in which keys were provided at construction
/// time. Successor lists are sorted by position and contain no duplicates;
/// self-loops are kept.
///
/// Snapshots are never mutated: to apply a batch of arc deletions and
/// insertions, build a new snapshot.
///
/// # Examples
///
/// ```
/// use dynrank::graphs::keyed_graph::KeyedGraph;
/// use dynrank::traits::RankGraph;
///
/// let g = KeyedGraph::from_arcs([10, 20, 30], [(10, 20), (20, 30), (30, 10)]).unwrap();
/// assert_eq!(g.num_nodes(), 3);
/// assert_eq!(g.successors(0), &[1]);
/// assert_eq!(g.node(30), Some(2));
///
/// let t = g.transpose();
/// assert_eq!(t.successors(0), &[2]);
/// ```
#[derive(Debug, Clone)]
pub struct KeyedGraph<K> {
    keys: Box<[K]>,
    positions: HashMap<K, usize>,
    offsets: Box<[usize]>,
    targets: Box<[usize]>,
}

impl<K: Copy + Eq + Hash + Debug> Default for KeyedGraph<K> {
    fn default() -> Self {
        Self {
            keys: Box::default(),
            positions: HashMap::new(),
            offsets: vec![0].into_boxed_slice(),
            targets: Box::default(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> KeyedGraph<K> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with the given vertex keys (in position order) and
    /// arcs, expressed as pairs of keys.
    ///
    /// Duplicate arcs are collapsed.
    pub fn from_arcs(
        keys: impl IntoIterator<Item = K>,
        arcs: impl IntoIterator<Item = (K, K)>,
    ) -> Result<Self, GraphError<K>> {
        let keys: Box<[K]> = keys.into_iter().collect();
        let mut positions = HashMap::with_capacity(keys.len());
        for (pos, &key) in keys.iter().enumerate() {
            if positions.insert(key, pos).is_some() {
                return Err(GraphError::DuplicateKey(key));
            }
        }

        let mut pairs = Vec::new();
        for (src, dst) in arcs {
            match (positions.get(&src), positions.get(&dst)) {
                (Some(&u), Some(&v)) => pairs.push((u, v)),
                _ => return Err(GraphError::UnknownKey { src, dst }),
            }
        }

        Ok(Self::from_position_pairs(keys, positions, pairs))
    }

    /// Builds the CSR arrays from arcs expressed by position.
    fn from_position_pairs(
        keys: Box<[K]>,
        positions: HashMap<K, usize>,
        mut pairs: Vec<(usize, usize)>,
    ) -> Self {
        pairs.sort_unstable();
        pairs.dedup();

        let n = keys.len();
        let mut offsets = vec![0; n + 1];
        for &(src, _) in &pairs {
            offsets[src + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }
        let targets = pairs.into_iter().map(|(_, dst)| dst).collect();

        Self {
            keys,
            positions,
            offsets: offsets.into_boxed_slice(),
            targets,
        }
    }

    /// Returns the vertex keys in position order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Returns the transpose of this graph.
    ///
    /// Vertex keys and positions are preserved.
    pub fn transpose(&self) -> Self {
        let pairs = (0..self.num_nodes())
            .flat_map(|src| self.successors(src).iter().map(move |&dst| (dst, src)))
            .collect();
        Self::from_position_pairs(self.keys.clone(), self.positions.clone(), pairs)
    }
}

impl<K: Copy + Eq + Hash + Debug> RankGraph for KeyedGraph<K> {
    type Key = K;

    fn num_nodes(&self) -> usize {
        self.keys.len()
    }

    fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    fn targets(&self) -> &[usize] {
        &self.targets
    }

    fn key(&self, node: usize) -> K {
        self.keys[node]
    }

    fn node(&self, key: K) -> Option<usize> {
        self.positions.get(&key).copied()
    }
}
