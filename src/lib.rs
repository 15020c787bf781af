/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]

pub mod graphs;
pub mod rank;
pub mod threads;
pub mod traits;
pub mod visits;

pub mod prelude {
    pub use crate::graphs::prelude::*;
    pub use crate::rank::*;
    pub use crate::threads::{CancellationToken, ThreadContext};
    pub use crate::traits::RankGraph;
    pub use crate::visits::DepthFirst;
}
