/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Iterative PageRank, static and dynamic.
//!
//! The rank of a vertex is computed by repeatedly redistributing rank along
//! arcs: at each _sweep_, the new rank of an active vertex *v* is
//!
//! > *C*₀ + ∑_(*u* → *v*) *f*(*u*) · *r*(*u*),
//!
//! where *f*(*u*) = α / *d*⁺(*u*) is the _scaling factor_ of *u* (zero if *u*
//! is a dead end), α is the damping factor, and *C*₀ is the _teleport mass_.
//! The product *f*(*u*) · *r*(*u*) is the _contribution_ of *u*. With
//! [uniform teleport](Teleport::Uniform) *C*₀ = (1 − α) / *n*, and the rank of
//! dead ends is lost at each sweep; with [dead-end aware
//! teleport](Teleport::DeadEndAware) the rank of dead ends is added back,
//! multiplied by α / *n*, and the total mass is preserved.
//!
//! Sweeps are [synchronous or asynchronous](Synchronization) and continue
//! until the [error](ErrorNorm) between successive estimates falls below the
//! tolerance, until a [cancellation
//! token](crate::threads::CancellationToken) is observed, or until the
//! iteration budget is exhausted.
//!
//! Loops ([`seq_loop`] and [`par_loop`]) are monomorphized on the two
//! Boolean axes, and parameterized by a [`RankUpdate`] and an
//! [`Activation`]. Drivers set up the per-run vectors and select the loop:
//!
//! - [`static_pagerank`] recomputes all vertices;
//! - [`dynamic_pagerank`] recomputes only the vertices that can be affected
//!   by a batch of arc deletions and insertions.
//!
//! **Warning**: since we need to enumerate the _predecessors_ of a vertex,
//! drivers need the **transpose** of the graph.

mod driver;
pub mod dynamic;
pub mod options;
pub mod par;
pub mod primitives;
pub mod seq;
pub mod state;
pub mod static_rank;
pub mod update;

pub use driver::Executor;
pub use dynamic::{
    affected_vertices, dynamic_pagerank, dynamic_pagerank_with_logging, reindex_affected,
    reorder_ranks,
};
pub use options::{ErrorNorm, PagerankOptions, PagerankResult, Synchronization, Teleport};
pub use par::par_loop;
pub use seq::seq_loop;
pub use state::{RankBuffers, RankInputs};
pub use static_rank::{static_pagerank, static_pagerank_with_logging};
pub use update::{Activation, AllActive, RankUpdate, StandardUpdate};
