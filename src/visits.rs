/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Depth-first reachability visits.
//!
//! The visit accepts a callback that is invoked once per newly discovered
//! node and returns a [`ControlFlow<E, ()>`]. If the callback returns a
//! [`Break`](ControlFlow::Break), the visit is interrupted and the
//! [`Break`](ControlFlow::Break) value is returned to the caller. For
//! uninterruptible visits use [`Infallible`](std::convert::Infallible) as
//! `E`: the result can then be destructured with an irrefutable
//! `let Continue(()) = ...` pattern.
//!
//! Known nodes are remembered across calls to [`visit`](DepthFirst::visit),
//! so visiting from several roots in sequence computes the union of the
//! reachable sets, each node being reported exactly once.

use crate::traits::RankGraph;
use std::ops::ControlFlow::{self, Continue};

/// A sequential depth-first visit which does not keep track of predecessors.
///
/// This is an iterative implementation that does not need a large stack size:
/// the visit path is kept in an explicit stack of pairs made of a node and the
/// index of the next successor to scan.
///
/// # Examples
///
/// ```
/// use dynrank::graphs::keyed_graph::KeyedGraph;
/// use dynrank::visits::DepthFirst;
/// use std::convert::Infallible;
/// use std::ops::ControlFlow::{self, Continue};
///
/// let graph = KeyedGraph::from_arcs(0..5, [(0, 1), (1, 2), (2, 0), (3, 4)]).unwrap();
/// let mut visit = DepthFirst::new(&graph);
/// let mut order = vec![];
/// let Continue(()) = visit.visit([1], |node| -> ControlFlow<Infallible> {
///     order.push(node);
///     Continue(())
/// });
/// assert_eq!(order, vec![1, 2, 0]);
/// assert_eq!(visit.known(), &[true, true, true, false, false]);
/// ```
pub struct DepthFirst<'a, G: RankGraph> {
    graph: &'a G,
    stack: Vec<(usize, usize)>,
    known: Box<[bool]>,
}

impl<'a, G: RankGraph> DepthFirst<'a, G> {
    /// Creates a new visit on the given graph.
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            stack: Vec::with_capacity(16),
            known: vec![false; graph.num_nodes()].into_boxed_slice(),
        }
    }

    /// Visits the graph from each of the given roots in turn.
    ///
    /// Roots that are already known are skipped.
    ///
    /// # Panics
    ///
    /// Panics if a root is not a valid node position.
    pub fn visit<E>(
        &mut self,
        roots: impl IntoIterator<Item = usize>,
        mut callback: impl FnMut(usize) -> ControlFlow<E, ()>,
    ) -> ControlFlow<E, ()> {
        for root in roots {
            if self.known[root] {
                continue;
            }
            self.known[root] = true;
            callback(root)?;
            self.stack.push((root, 0));

            while let Some((node, next)) = self.stack.last_mut() {
                let succ = self.graph.successors(*node);
                if *next == succ.len() {
                    self.stack.pop();
                    continue;
                }
                let succ = succ[*next];
                *next += 1;
                if !self.known[succ] {
                    self.known[succ] = true;
                    if let ControlFlow::Break(b) = callback(succ) {
                        self.stack.clear();
                        return ControlFlow::Break(b);
                    }
                    self.stack.push((succ, 0));
                }
            }
        }
        Continue(())
    }

    /// Returns, for each node, whether it has been discovered.
    pub fn known(&self) -> &[bool] {
        &self.known
    }

    /// Consumes the visit, returning the known-node marks.
    pub fn into_known(self) -> Box<[bool]> {
        self.known
    }

    /// Forgets all known nodes.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.known.fill(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::keyed_graph::KeyedGraph;
    use std::convert::Infallible;

    #[test]
    fn test_union_of_roots() {
        let graph = KeyedGraph::from_arcs(0..6, [(0, 1), (2, 3), (3, 2), (4, 5)]).unwrap();
        let mut visit = DepthFirst::new(&graph);
        let mut count = 0;
        let Continue(()) = visit.visit([0, 3, 1], |_| -> ControlFlow<Infallible> {
            count += 1;
            Continue(())
        });
        assert_eq!(count, 4);
        assert_eq!(visit.known(), &[true, true, true, true, false, false]);

        visit.reset();
        assert!(visit.known().iter().all(|&k| !k));
    }

    #[test]
    fn test_break() {
        let graph = KeyedGraph::from_arcs(0..4, [(0, 1), (1, 2), (2, 3)]).unwrap();
        let mut visit = DepthFirst::new(&graph);
        let result = visit.visit([0], |node| {
            if node == 2 {
                ControlFlow::Break(node)
            } else {
                Continue(())
            }
        });
        assert_eq!(result, ControlFlow::Break(2));
        assert!(!visit.known()[3]);
    }
}
