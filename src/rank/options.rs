/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::bail;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// The norm used to measure the difference between successive rank
/// estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorNorm {
    /// Sum of absolute differences.
    #[default]
    L1,
    /// Sum of squared differences (the square of the Euclidean distance).
    L2,
    /// Maximum absolute difference.
    LInf,
}

impl Display for ErrorNorm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorNorm::L1 => f.write_str("l1"),
            ErrorNorm::L2 => f.write_str("l2"),
            ErrorNorm::LInf => f.write_str("linf"),
        }
    }
}

impl FromStr for ErrorNorm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "l1" => ErrorNorm::L1,
            "l2" => ErrorNorm::L2,
            "linf" | "li" | "l-inf" => ErrorNorm::LInf,
            _ => bail!("Unknown error norm {s:?} (expected l1, l2 or linf)"),
        })
    }
}

/// Whether a sweep reads only the estimate of the previous sweep, or also
/// the values already updated in the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Synchronization {
    /// Jacobi-style: every update of a sweep reads the previous estimate, and
    /// the current and previous estimates are exchanged between sweeps.
    #[default]
    Synchronous,
    /// Gauss–Seidel-style relaxation: an update may read contributions
    /// refreshed earlier in the same sweep. In parallel loops this happens
    /// within the partition of each worker.
    Asynchronous,
}

/// How the teleport mass of a sweep is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Teleport {
    /// Constant (1 − α) / *n*. The rank of dead ends is lost at each sweep,
    /// so the total mass decreases if there are dead ends.
    #[default]
    Uniform,
    /// (1 − α) / *n* plus α / *n* times the rank of dead ends, which is thus
    /// redistributed uniformly and the total mass is preserved.
    DeadEndAware,
}

impl Display for Teleport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Teleport::Uniform => f.write_str("uniform"),
            Teleport::DeadEndAware => f.write_str("dead-end aware"),
        }
    }
}

impl Display for Synchronization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Synchronization::Synchronous => f.write_str("synchronous"),
            Synchronization::Asynchronous => f.write_str("asynchronous"),
        }
    }
}

/// Options of a rank computation.
///
/// Setters validate their argument and can be chained:
///
/// ```
/// use dynrank::rank::{ErrorNorm, PagerankOptions, Teleport};
///
/// let mut options = PagerankOptions::default();
/// options
///     .damping(0.9)
///     .tolerance(1E-8)
///     .norm(ErrorNorm::LInf)
///     .teleport(Teleport::DeadEndAware);
/// assert_eq!(options.max_iterations, PagerankOptions::DEFAULT_MAX_ITERATIONS);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagerankOptions {
    /// The damping factor α.
    pub damping: f64,
    /// The iteration stops when the error falls below this threshold.
    pub tolerance: f64,
    /// The maximum number of sweeps.
    pub max_iterations: usize,
    /// The norm used to compute the error.
    pub norm: ErrorNorm,
    pub synchronization: Synchronization,
    pub teleport: Teleport,
}

impl PagerankOptions {
    pub const DEFAULT_DAMPING: f64 = 0.85;
    pub const DEFAULT_TOLERANCE: f64 = 1E-10;
    pub const DEFAULT_MAX_ITERATIONS: usize = 500;

    /// Sets the damping factor α.
    ///
    /// # Panics
    ///
    /// Panics if `damping` is not in the interval [0 . . 1).
    pub fn damping(&mut self, damping: f64) -> &mut Self {
        assert!(
            // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
            (0.0..1.0).contains(&damping),
            "The damping factor must be in [0 . . 1), got {damping}"
        );
        self.damping = damping;
        self
    }

    /// Sets the convergence tolerance.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is NaN or not positive.
    pub fn tolerance(&mut self, tolerance: f64) -> &mut Self {
        assert!(!tolerance.is_nan(), "The tolerance cannot be NaN");
        assert!(tolerance > 0.0, "The tolerance must be positive, got {tolerance}");
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of sweeps.
    pub fn max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the error norm.
    pub fn norm(&mut self, norm: ErrorNorm) -> &mut Self {
        self.norm = norm;
        self
    }

    pub fn synchronization(&mut self, synchronization: Synchronization) -> &mut Self {
        self.synchronization = synchronization;
        self
    }

    pub fn teleport(&mut self, teleport: Teleport) -> &mut Self {
        self.teleport = teleport;
        self
    }
}

impl Default for PagerankOptions {
    fn default() -> Self {
        Self {
            damping: Self::DEFAULT_DAMPING,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            norm: ErrorNorm::default(),
            synchronization: Synchronization::default(),
            teleport: Teleport::default(),
        }
    }
}

impl Display for PagerankOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(damping: {}, tolerance: {}, max iterations: {}, norm: {}, {}, {} teleport)",
            self.damping,
            self.tolerance,
            self.max_iterations,
            self.norm,
            self.synchronization,
            self.teleport
        )
    }
}

/// The outcome of a rank computation.
///
/// The computation never fails: a run that converged, a run that exhausted
/// its iteration budget, and a run stopped by a cancelled
/// [token](crate::threads::CancellationToken) are told apart by comparing
/// [`iterations`](Self::iterations) with the cap and by
/// [`faulted`](Self::faulted).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagerankResult {
    /// The rank of each vertex, in position order.
    pub ranks: Box<[f64]>,
    /// The number of sweeps performed.
    pub iterations: usize,
    /// Whether a cancelled token was observed on return.
    pub faulted: bool,
    /// The time spent iterating.
    pub time: Duration,
}
