/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Implementations of graphs.

pub mod keyed_graph;

pub mod prelude {
    pub use super::keyed_graph::{GraphError, KeyedGraph};
}
