/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank by power iteration with absorption at a node subset.
//!
//! Given a (possibly empty) subset *R* of nodes, let Π be the diagonal matrix
//! that zeroes the entries of a vector at *R*. Starting from the normalized
//! all-ones vector with entries at *R* zeroed, [`ProjectedPageRank`] iterates
//!
//! > **x** ← Π *G* **x** / ‖Π *G* **x**‖₁
//!
//! (or the same with *G*ᵀ, for the [left](Direction::Left) direction), where *G*
//! is the [Google matrix](crate::google). At the fixed point, **x** is the
//! dominant eigenvector of the restriction of *G* to the complement of *R*,
//! and the mass removed at *R* in one step is one minus the associated
//! eigenvalue.
//!
//! With an empty subset, the fixed point is the usual PageRank vector, with
//! dangling nodes redistributing their mass uniformly.
//!
//! # Stopping Criteria
//!
//! Every [`check_interval`](ProjectedPageRank::check_interval) iterations,
//! and at the last one, the solver computes the relative difference
//!
//! > ∑ᵢ |*xᵢ* − *yᵢ*| / (|*xᵢ*| + |*yᵢ*|)
//!
//! between the current approximation **x** and the previous one **y**
//! (skipping the terms with zero denominator), and evaluates the
//! [predicate](Predicate) passed to [`run`](ProjectedPageRank::run).
//! Independently of the predicate, the number of iterations is bounded by
//! [`max_iter`](super::max_iter)(α) + 1. Hitting the bound is not an error:
//! the last approximation is kept.
//!
//! The usual choice is [`preds::default_policy`], which stops when the
//! relative difference is below [`EPS`](super::EPS), or when it is below
//! 10⁻³ but no longer decreasing fast enough.

pub mod preds {
    //! Predicates implementing stopping conditions.
    //!
    //! The implementation of [`ProjectedPageRank`](super::ProjectedPageRank)
    //! requires a [predicate](Predicate) to stop the algorithm. This module
    //! provides a few such predicates: they evaluate to true if the
    //! computation should be stopped.
    //!
    //! You can combine the predicates using the `and` and `or` methods provided
    //! by the [`Predicate`] trait.
    //!
    //! # Examples
    //! ```
    //! # fn main() -> Result<(), Box<dyn std::error::Error>> {
    //! use predicates::prelude::*;
    //! use rgm_algo::rank::pagerank::preds::{MaxIter, RelNorm, Stall};
    //!
    //! let mut predicate = RelNorm::try_from(1E-10)?.boxed();
    //! predicate = predicate.or(Stall::new(0.15)).or(MaxIter::from(100)).boxed();
    //! #     Ok(())
    //! # }
    //! ```

    use anyhow::ensure;
    use predicates::{BoxPredicate, Predicate, prelude::*, reflection::PredicateReflection};
    use std::fmt::Display;

    #[doc(hidden)]
    /// This structure is passed to stopping predicates to provide the
    /// information that is needed to evaluate them.
    #[derive(Debug)]
    pub struct PredParams {
        pub iteration: usize,
        pub rel_diff: f64,
        pub prev_rel_diff: f64,
        pub l1_diff: f64,
    }

    /// The standard stopping policy for reset probability `alpha`:
    /// [`RelNorm::default()`] or [`Stall::new(alpha)`](Stall::new).
    pub fn default_policy(alpha: f64) -> BoxPredicate<PredParams> {
        RelNorm::default().or(Stall::new(alpha)).boxed()
    }

    /// Stops after at most the provided number of iterations.
    #[derive(Debug, Clone)]
    pub struct MaxIter {
        max_iter: usize,
    }

    impl MaxIter {
        pub const DEFAULT_MAX_ITER: usize = usize::MAX;
    }

    impl From<usize> for MaxIter {
        fn from(max_iter: usize) -> Self {
            MaxIter { max_iter }
        }
    }

    impl Default for MaxIter {
        fn default() -> Self {
            Self::from(Self::DEFAULT_MAX_ITER)
        }
    }

    impl Display for MaxIter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(max iter: {})", self.max_iter))
        }
    }

    impl PredicateReflection for MaxIter {}

    impl Predicate<PredParams> for MaxIter {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.iteration >= self.max_iter
        }
    }

    /// Stops when the relative difference between successive approximations
    /// falls below a given threshold.
    #[derive(Debug, Clone)]
    pub struct RelNorm {
        threshold: f64,
    }

    impl RelNorm {
        pub const DEFAULT_THRESHOLD: f64 = super::super::EPS;
    }

    impl TryFrom<Option<f64>> for RelNorm {
        type Error = anyhow::Error;
        fn try_from(threshold: Option<f64>) -> anyhow::Result<Self> {
            Ok(match threshold {
                Some(threshold) => {
                    ensure!(!threshold.is_nan());
                    ensure!(threshold > 0.0, "The threshold must be positive");
                    RelNorm { threshold }
                }
                None => Self::default(),
            })
        }
    }

    impl TryFrom<f64> for RelNorm {
        type Error = anyhow::Error;
        fn try_from(threshold: f64) -> anyhow::Result<Self> {
            Some(threshold).try_into()
        }
    }

    impl Default for RelNorm {
        fn default() -> Self {
            RelNorm {
                threshold: Self::DEFAULT_THRESHOLD,
            }
        }
    }

    impl Display for RelNorm {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(relative norm: {})", self.threshold))
        }
    }

    impl PredicateReflection for RelNorm {}
    impl Predicate<PredParams> for RelNorm {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.rel_diff < self.threshold
        }
    }

    /// Stops when the relative difference is small but has stopped
    /// decreasing geometrically.
    ///
    /// The predicate is true when the relative difference is below
    /// [`Stall::THRESHOLD`] and, multiplied by 1 + α / 2, exceeds the relative
    /// difference measured at the previous check.
    #[derive(Debug, Clone)]
    pub struct Stall {
        factor: f64,
    }

    impl Stall {
        pub const THRESHOLD: f64 = 1E-3;

        pub fn new(alpha: f64) -> Self {
            Stall {
                factor: 1.0 + alpha / 2.0,
            }
        }
    }

    impl Display for Stall {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(stall factor: {})", self.factor))
        }
    }

    impl PredicateReflection for Stall {}
    impl Predicate<PredParams> for Stall {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.rel_diff < Self::THRESHOLD
                && pred_params.rel_diff * self.factor > pred_params.prev_rel_diff
        }
    }
}

use crate::google::GoogleMatrix;
use crate::utils::StopSignal;
use crate::utils::math::{diff_norm_rel, diff_norm1, normalize};
use dsi_progress_logger::{ProgressLog, no_logging};
use predicates::Predicate;
use rgm::traits::RandomAccessGraph;

/// Which eigenvector to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// The right eigenvector, iterating *G*. This is the default.
    #[default]
    Right,
    /// The left eigenvector, iterating *G*ᵀ.
    Left,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Right => f.write_str("right"),
            Direction::Left => f.write_str("left"),
        }
    }
}

/// Why the last run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// The stopping predicate was satisfied.
    Converged,
    /// The iteration cap was reached.
    #[default]
    MaxIter,
    /// The [stop signal](ProjectedPageRank::stop_signal) was raised.
    Interrupted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Converged => f.write_str("converged"),
            StopReason::MaxIter => f.write_str("iteration cap reached"),
            StopReason::Interrupted => f.write_str("interrupted"),
        }
    }
}

/// A summary of how a run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    pub iterations: usize,
    pub rel_diff: f64,
    pub l1_diff: f64,
    pub reason: StopReason,
}

/// Computes PageRank-like vectors by power iteration, absorbing mass at a
/// subset of nodes.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run). After completion the rank vector is available via the
/// [`rank`](Self::rank) method, and the mass absorbed by the subset at the
/// last iteration via [`absorbed_mass`](Self::absorbed_mass).
///
/// # Examples
///
/// ```
/// use rgm::prelude::*;
/// use rgm_algo::rank::pagerank::{ProjectedPageRank, preds};
///
/// // 0 → 1, 0 → 2, 1 → 2, 2 → 0, 3 → 0, 4 → 3
/// let graph = CsrGraph::from_arcs(5, [(0, 1), (0, 2), (1, 2), (2, 0), (3, 0), (4, 3)])?;
///
/// let mut pr = ProjectedPageRank::new(&graph);
/// pr.alpha(0.15);
/// pr.run(preds::default_policy(0.15));
///
/// assert_eq!(pr.rank().len(), 5);
/// assert!((pr.rank().iter().sum::<f64>() - 1.0).abs() < 1E-12);
/// assert_eq!(pr.absorbed_mass(), 0.0);
/// # Ok::<(), rgm::Error>(())
/// ```
///
/// Absorbing at node 0, and computing the left eigenvector:
///
/// ```
/// use rgm::prelude::*;
/// use rgm_algo::rank::pagerank::{Direction, ProjectedPageRank, preds};
///
/// let graph = CsrGraph::from_arcs(5, [(0, 1), (0, 2), (1, 2), (2, 0), (3, 0), (4, 3)])?;
///
/// let mut pr = ProjectedPageRank::new(&graph);
/// pr.alpha(0.15).subset(&[0]).direction(Direction::Left);
/// pr.run(preds::default_policy(0.15));
///
/// assert_eq!(pr.rank()[0], 0.0);
/// assert!(pr.absorbed_mass() > 0.0 && pr.absorbed_mass() < 1.0);
/// # Ok::<(), rgm::Error>(())
/// ```
pub struct ProjectedPageRank<'a, G: RandomAccessGraph + ?Sized> {
    graph: &'a G,
    alpha: f64,
    subset: &'a [usize],
    direction: Direction,
    check_interval: usize,
    stop_signal: StopSignal,

    rank: Box<[f64]>,
    absorbed_mass: f64,
    iteration: usize,
    rel_diff: f64,
    l1_diff: f64,
    stop_reason: StopReason,
}

impl<G: RandomAccessGraph + ?Sized> std::fmt::Debug for ProjectedPageRank<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectedPageRank")
            .field("alpha", &self.alpha)
            .field("subset_len", &self.subset.len())
            .field("direction", &self.direction)
            .field("check_interval", &self.check_interval)
            .field("absorbed_mass", &self.absorbed_mass)
            .field("iteration", &self.iteration)
            .field("rel_diff", &self.rel_diff)
            .field("stop_reason", &self.stop_reason)
            .finish_non_exhaustive()
    }
}

impl<'a, G: RandomAccessGraph + ?Sized> ProjectedPageRank<'a, G> {
    /// Creates a new computation with an empty subset.
    pub fn new(graph: &'a G) -> Self {
        let n = graph.num_nodes();
        Self {
            graph,
            alpha: super::DEFAULT_ALPHA,
            subset: &[],
            direction: Direction::default(),
            check_interval: super::DEFAULT_CHECK_INTERVAL,
            stop_signal: StopSignal::never(),
            rank: vec![0.0; n].into_boxed_slice(),
            absorbed_mass: 0.0,
            iteration: 0,
            rel_diff: f64::INFINITY,
            l1_diff: f64::INFINITY,
            stop_reason: StopReason::default(),
        }
    }

    /// Sets the reset probability α.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the interval [0 . . 1).
    pub fn alpha(&mut self, alpha: f64) -> &mut Self {
        assert!(
            // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
            (0.0..1.0).contains(&alpha),
            "The reset probability must be in [0 . . 1), got {alpha}"
        );
        self.alpha = alpha;
        self
    }

    /// Sets the subset of nodes absorbing mass.
    ///
    /// # Panics
    ///
    /// Panics if the subset contains a node that is not in the graph.
    pub fn subset(&mut self, subset: &'a [usize]) -> &mut Self {
        let n = self.graph.num_nodes();
        if let Some(&node) = subset.iter().find(|&&node| node >= n) {
            panic!("Node {node} of the subset is not smaller than the number of nodes ({n})");
        }
        self.subset = subset;
        self
    }

    /// Sets the [direction](Direction) of the iteration.
    pub fn direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self
    }

    /// Sets the number of iterations between two evaluations of the stopping
    /// predicate.
    ///
    /// Zero is treated as one.
    pub fn check_interval(&mut self, check_interval: usize) -> &mut Self {
        self.check_interval = check_interval.max(1);
        self
    }

    /// Sets a [signal](StopSignal) interrupting the computation.
    pub fn stop_signal(&mut self, stop_signal: StopSignal) -> &mut Self {
        self.stop_signal = stop_signal;
        self
    }

    /// Returns the rank vector.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Consumes the computation, returning the rank vector.
    pub fn into_rank(self) -> Box<[f64]> {
        self.rank
    }

    /// Returns the mass absorbed by the subset at the last iteration.
    ///
    /// For the [right](Direction::Right) direction this is the mass found at
    /// the subset before zeroing it; for the [left](Direction::Left) direction
    /// it is one minus the norm of the vector after zeroing the subset.
    pub fn absorbed_mass(&self) -> f64 {
        self.absorbed_mass
    }

    /// Returns the number of iterations performed by the last call to
    /// [`run`](Self::run).
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the relative difference measured at the last check.
    pub fn rel_diff(&self) -> f64 {
        self.rel_diff
    }

    /// Returns the 𝓁₁ difference measured at the last check.
    pub fn l1_diff(&self) -> f64 {
        self.l1_diff
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    /// Returns a summary of the last run.
    pub fn convergence(&self) -> Convergence {
        Convergence {
            iterations: self.iteration,
            rel_diff: self.rel_diff,
            l1_diff: self.l1_diff,
            reason: self.stop_reason,
        }
    }

    /// Runs the computation until the given predicate is satisfied.
    pub fn run(&mut self, predicate: impl Predicate<preds::PredParams>) {
        self.run_with_logging(predicate, no_logging![]);
    }

    /// Runs the computation until the given predicate is satisfied, logging
    /// progress.
    ///
    /// `pl` counts iterations. Its options will be preserved, making thus
    /// possible to customize the logs.
    pub fn run_with_logging(
        &mut self,
        predicate: impl Predicate<preds::PredParams>,
        pl: &mut impl ProgressLog,
    ) {
        let n = self.graph.num_nodes();
        self.iteration = 0;
        self.rel_diff = f64::INFINITY;
        self.l1_diff = f64::INFINITY;
        self.absorbed_mass = 0.0;
        self.stop_reason = StopReason::Converged;
        if n == 0 {
            return;
        }

        let google = GoogleMatrix::new(self.graph, self.alpha);
        let max_iter = super::max_iter(self.alpha);

        log::info!("Direction: {}", self.direction);
        log::info!("Alpha: {}", self.alpha);
        log::info!("Subset size: {}", self.subset.len());
        log::info!("Stopping criterion: {}", predicate);

        self.rank.fill(1.0);
        normalize(&mut self.rank);
        let mut prev = self.rank.clone();

        let mut mass = self.absorb();
        let mut norm = normalize(&mut self.rank);
        if self.direction == Direction::Left {
            mass = 1.0 - norm;
        }
        let mut prev_mass = mass;
        let mut rel_diff = 1E40;

        pl.item_name("iteration");
        pl.expected_updates(Some(max_iter + 1));
        pl.start(format!(
            "Computing {} vector (alpha={})...",
            self.direction, self.alpha
        ));

        self.stop_reason = StopReason::MaxIter;
        for i in 0..=max_iter {
            if self.stop_signal.is_raised() {
                self.stop_reason = StopReason::Interrupted;
                break;
            }

            std::mem::swap(&mut prev, &mut self.rank);
            match self.direction {
                Direction::Right => google.mul(&mut self.rank, &prev, true),
                Direction::Left => google.mul_transpose(&mut self.rank, &prev, true),
            }
            mass = self.absorb();
            norm = normalize(&mut self.rank);
            if self.direction == Direction::Left {
                mass = 1.0 - norm;
            }
            self.iteration = i + 1;
            pl.light_update();

            if i % self.check_interval == 0 || i == max_iter {
                let prev_rel_diff = rel_diff;
                self.l1_diff = diff_norm1(&self.rank, &prev);
                rel_diff = diff_norm_rel(&self.rank, &prev);
                self.rel_diff = rel_diff;
                log::debug!(
                    "Iteration {i}: l1 diff = {}, rel diff = {rel_diff}, absorbed mass = {mass}, mass delta = {}, norm = {norm}",
                    self.l1_diff,
                    (mass - prev_mass).abs()
                );
                prev_mass = mass;

                if predicate.eval(&preds::PredParams {
                    iteration: self.iteration,
                    rel_diff,
                    prev_rel_diff,
                    l1_diff: self.l1_diff,
                }) {
                    self.stop_reason = StopReason::Converged;
                    break;
                }
            }
        }

        pl.done();
        self.absorbed_mass = mass;

        match self.stop_reason {
            StopReason::Converged => log::info!(
                "Converged after {} iterations (rel diff = {}, absorbed mass = {})",
                self.iteration,
                self.rel_diff,
                self.absorbed_mass
            ),
            reason => log::warn!(
                "Stopped after {} iterations: {reason} (rel diff = {}, absorbed mass = {})",
                self.iteration,
                self.rel_diff,
                self.absorbed_mass
            ),
        }
    }

    /// Zeroes the rank at the subset, returning the removed mass.
    fn absorb(&mut self) -> f64 {
        let mut mass = 0.0;
        for &node in self.subset {
            mass += self.rank[node];
            self.rank[node] = 0.0;
        }
        mass
    }
}
