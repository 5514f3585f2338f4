/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The dominant eigenpair of the Google matrix restricted to the complement
//! of a node subset.

use super::pagerank::{Convergence, Direction, ProjectedPageRank, preds};
use crate::utils::StopSignal;
use crate::utils::math::{scalar_product, scale, set_scaled, sub_scaled};
use rgm::traits::RandomAccessGraph;
use rgm::utils::NodeSubset;
use rgm::{Error, Result};

/// Options for [`EigenPair::compute_with_options`].
#[derive(Debug, Clone)]
pub struct EigenPairOptions {
    /// The number of iterations between two convergence checks.
    pub check_interval: usize,
    /// A signal interrupting the three computations.
    pub stop_signal: StopSignal,
}

impl Default for EigenPairOptions {
    fn default() -> Self {
        Self {
            check_interval: super::DEFAULT_CHECK_INTERVAL,
            stop_signal: StopSignal::never(),
        }
    }
}

/// The dominant right and left eigenvectors of the Google matrix with the
/// rows and columns of a subset removed, together with the unrestricted
/// PageRank vector.
///
/// The left eigenvector is scaled so that its scalar product with the right
/// eigenvector is one; the right eigenvector and the PageRank vector sum to
/// one. The [mass](Self::dlambda) absorbed by the subset in one step is one
/// minus the associated eigenvalue.
#[derive(Debug, Clone)]
pub struct EigenPair {
    right: Box<[f64]>,
    left: Box<[f64]>,
    pagerank: Box<[f64]>,
    dlambda: f64,
    dlambda_left: f64,
    biorthogonality: f64,
    convergence: [Convergence; 3],
}

impl EigenPair {
    /// Computes the eigenpair for `subset` with reset probability `alpha` and
    /// default options.
    ///
    /// # Errors
    ///
    /// Returns a [dimension error](Error::Dimension) if the subset contains
    /// a node that is not in the graph.
    pub fn compute<G: RandomAccessGraph + Sync + ?Sized>(
        graph: &G,
        alpha: f64,
        subset: &NodeSubset,
    ) -> Result<Self> {
        Self::compute_with_options(graph, alpha, subset, &EigenPairOptions::default())
    }

    /// Computes the eigenpair for `subset` with reset probability `alpha`.
    ///
    /// The left, right and unrestricted vectors are computed concurrently on
    /// the current Rayon thread pool.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the interval [0 . . 1).
    pub fn compute_with_options<G: RandomAccessGraph + Sync + ?Sized>(
        graph: &G,
        alpha: f64,
        subset: &NodeSubset,
        options: &EigenPairOptions,
    ) -> Result<Self> {
        subset.check(graph.num_nodes())?;

        let solve = |subset: &[usize], direction: Direction| {
            let mut pr = ProjectedPageRank::new(graph);
            pr.alpha(alpha)
                .subset(subset)
                .direction(direction)
                .check_interval(options.check_interval)
                .stop_signal(options.stop_signal.clone());
            pr.run(preds::default_policy(alpha));
            let convergence = pr.convergence();
            let mass = pr.absorbed_mass();
            (pr.into_rank(), mass, convergence)
        };

        let (left, (right, pagerank)) = rayon::join(
            || solve(subset, Direction::Left),
            || {
                rayon::join(
                    || solve(subset, Direction::Right),
                    || solve(&[], Direction::Right),
                )
            },
        );
        let (mut left, dlambda_left, left_conv) = left;
        let (right, dlambda, right_conv) = right;
        let (pagerank, _, pr_conv) = pagerank;

        let factor = 1.0 / scalar_product(&left, &right);
        scale(&mut left, factor);
        let biorthogonality = scalar_product(&left, &right);

        log::info!("dlambda = {dlambda}");
        log::info!(
            "|dlambda (right) - dlambda (left)| = {}",
            (dlambda - dlambda_left).abs()
        );
        log::info!("left · right = {biorthogonality}");

        Ok(Self {
            right,
            left,
            pagerank,
            dlambda,
            dlambda_left,
            biorthogonality,
            convergence: [right_conv, left_conv, pr_conv],
        })
    }

    /// Creates an eigenpair from precomputed vectors.
    ///
    /// No normalization is performed; the PageRank vector is set to `right`.
    ///
    /// # Errors
    ///
    /// Returns a [dimension error](Error::Dimension) if the two vectors have
    /// different lengths.
    pub fn from_parts(right: Box<[f64]>, left: Box<[f64]>, dlambda: f64) -> Result<Self> {
        if left.len() != right.len() {
            return Err(Error::Dimension {
                what: "left eigenvector",
                expected: right.len(),
                got: left.len(),
            });
        }
        let biorthogonality = scalar_product(&left, &right);
        let convergence = Convergence {
            iterations: 0,
            rel_diff: 0.0,
            l1_diff: 0.0,
            reason: super::StopReason::Converged,
        };
        Ok(Self {
            pagerank: right.clone(),
            right,
            left,
            dlambda,
            dlambda_left: dlambda,
            biorthogonality,
            convergence: [convergence; 3],
        })
    }

    /// Returns the length of the vectors.
    pub fn len(&self) -> usize {
        self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.right.is_empty()
    }

    pub fn right(&self) -> &[f64] {
        &self.right
    }

    pub fn left(&self) -> &[f64] {
        &self.left
    }

    /// Returns the unrestricted PageRank vector.
    pub fn pagerank(&self) -> &[f64] {
        &self.pagerank
    }

    /// Returns the mass absorbed by the subset, as measured by the right
    /// iteration.
    pub fn dlambda(&self) -> f64 {
        self.dlambda
    }

    /// Returns the mass absorbed by the subset, as measured by the left
    /// iteration.
    pub fn dlambda_left(&self) -> f64 {
        self.dlambda_left
    }

    /// Returns the dominant eigenvalue, that is, one minus
    /// [`dlambda`](Self::dlambda).
    pub fn eigenvalue(&self) -> f64 {
        1.0 - self.dlambda
    }

    /// Returns the scalar product of the left and right eigenvectors after
    /// normalization.
    pub fn biorthogonality(&self) -> f64 {
        self.biorthogonality
    }

    /// Returns how the right, left and PageRank iterations ended, in this
    /// order.
    pub fn convergence(&self) -> &[Convergence; 3] {
        &self.convergence
    }

    /// Replaces `v` with its projection on the right eigenvector, divided by
    /// `f`.
    ///
    /// # Panics
    ///
    /// Panics if the length of `v` is not the length of the eigenvectors.
    pub fn project_p(&self, v: &mut [f64], f: f64) {
        let sp = scalar_product(&self.left, v) / f;
        set_scaled(v, sp, &self.right);
    }

    /// Removes from `v` its component along the right eigenvector.
    ///
    /// # Panics
    ///
    /// Panics if the length of `v` is not the length of the eigenvectors.
    pub fn project_q(&self, v: &mut [f64]) {
        let sp = scalar_product(&self.left, v);
        sub_scaled(v, sp, &self.right);
    }
}
