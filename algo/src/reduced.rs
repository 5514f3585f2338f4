/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The reduced Google matrix of a node subset.
//!
//! Let *R* be a subset of *n*ᵣ nodes and *S* its complement, and write the
//! [Google matrix](crate::google) in block form with blocks *G*ᵣᵣ, *G*ᵣₛ,
//! *G*ₛᵣ and *G*ₛₛ. The reduced Google matrix is
//!
//! > *G*_R = *G*ᵣᵣ + *G*ᵣₛ (1 − *G*ₛₛ)⁻¹ *G*ₛᵣ,
//!
//! that is, the transition matrix between nodes of *R* obtained by summing
//! over all paths through *S*. The matrix (1 − *G*ₛₛ)⁻¹ is dominated by the
//! leading eigenvalue λ꜀ = 1 − δλ of *G*ₛₛ, which is close to one, so it
//! is split using the projector *P* = ψ_R ψ_Lᵀ on the leading
//! [eigenpair](crate::rank::EigenPair) and its complement *Q* = 1 − *P*:
//!
//! - *G*_pr = *G*ᵣₛ *P* *G*ₛᵣ / δλ, the contribution of the leading mode;
//! - *G*_qr = *G*ᵣₛ *Q* (1 − *G*ₛₛ)⁻¹ *Q* *G*ₛᵣ, the remaining indirect
//!   contribution, computed by summing the Neumann series of *Q* *G*ₛₛ;
//! - *G*_I = *G*_pr + *G*_qr, the whole indirect contribution;
//! - *G*_R = *G*ᵣᵣ + *G*_I.
//!
//! Each column is computed independently, in parallel, with private scratch
//! vectors. The Neumann series is summed until adding a new term leaves the
//! sum unchanged, or for at most [`max_iter`](crate::rank::max_iter)(α)
//! terms.

use crate::google::GoogleMatrix;
use crate::rank::EigenPair;
use crate::utils::StopSignal;
use crate::utils::math::{add_assign, diff_norm1, norm1};
use dsi_progress_logger::{ConcurrentProgressLog, no_logging};
use rayon::prelude::*;
use rgm::traits::RandomAccessGraph;
use rgm::utils::{Matrix, NodeSubset};
use rgm::{Error, Result};

/// How the computation of a column ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnReport {
    /// The number of terms of the Neumann series that were summed.
    pub iterations: usize,
    /// The 𝓁₁ norm of the last change of the sum.
    pub quality: f64,
    /// Whether the [stop signal](ReducedGoogleMatrix::stop_signal) was
    /// raised.
    pub interrupted: bool,
}

impl ColumnReport {
    /// Whether the last term of the series did not change the sum.
    pub fn converged(&self) -> bool {
        self.quality <= 0.0
    }
}

/// The five *n*ᵣ × *n*ᵣ matrices computed by [`ReducedGoogleMatrix`].
///
/// Row and column indices follow the order of the node subset.
#[derive(Debug, Clone)]
pub struct ReducedMatrices {
    /// *G*ᵣᵣ, the one-step transitions within the subset.
    pub g_rr: Matrix<f64>,
    /// *G*_pr, the contribution of the leading mode.
    pub g_pr: Matrix<f64>,
    /// *G*_qr, the indirect contribution of the other modes.
    pub g_qr: Matrix<f64>,
    /// *G*_I = *G*_pr + *G*_qr.
    pub g_i: Matrix<f64>,
    /// *G*_R = *G*ᵣᵣ + *G*_I.
    pub g_r: Matrix<f64>,
    /// One report per column.
    pub columns: Vec<ColumnReport>,
}

impl ReducedMatrices {
    fn new(nr: usize) -> Self {
        Self {
            g_rr: Matrix::new(nr, nr),
            g_pr: Matrix::new(nr, nr),
            g_qr: Matrix::new(nr, nr),
            g_i: Matrix::new(nr, nr),
            g_r: Matrix::new(nr, nr),
            columns: Vec::with_capacity(nr),
        }
    }
}

/// Scratch space of a worker.
struct Scratch {
    input: Box<[f64]>,
    output: Box<[f64]>,
    s: Box<[f64]>,
    t: Box<[f64]>,
    f: Box<[f64]>,
    f2: Box<[f64]>,
}

impl Scratch {
    fn new(n: usize) -> Self {
        let zeros = || vec![0.0; n].into_boxed_slice();
        Self {
            input: zeros(),
            output: zeros(),
            s: zeros(),
            t: zeros(),
            f: zeros(),
            f2: zeros(),
        }
    }
}

/// The columns of the four computed matrices for a subset node.
struct Column {
    rr: Box<[f64]>,
    pr: Box<[f64]>,
    qr: Box<[f64]>,
    gi: Box<[f64]>,
    report: ColumnReport,
}

/// Computes the reduced Google matrix of a subset, and its components.
///
/// # Examples
///
/// ```
/// use rgm::prelude::*;
/// use rgm_algo::rank::EigenPair;
/// use rgm_algo::reduced::ReducedGoogleMatrix;
///
/// let graph = CsrGraph::from_arcs(4, [(0, 1), (1, 2), (2, 3), (3, 0), (3, 1)])?;
/// let subset = NodeSubset::from(vec![0, 2]);
///
/// let eigenpair = EigenPair::compute(&graph, 0.15, &subset)?;
/// let reduced = ReducedGoogleMatrix::new(&graph, 0.15, &subset)?;
/// let matrices = reduced.compute(&eigenpair)?;
///
/// assert_eq!(matrices.g_r.rows(), 2);
/// // G_R is column stochastic
/// for col in 0..2 {
///     assert!((matrices.g_r.column(col).sum::<f64>() - 1.0).abs() < 1E-10);
/// }
/// # Ok::<(), rgm::Error>(())
/// ```
#[derive(Debug)]
pub struct ReducedGoogleMatrix<'a, G: RandomAccessGraph + Sync + ?Sized> {
    graph: &'a G,
    alpha: f64,
    subset: &'a NodeSubset,
    stop_signal: StopSignal,
}

impl<'a, G: RandomAccessGraph + Sync + ?Sized> ReducedGoogleMatrix<'a, G> {
    /// Creates a new computation.
    ///
    /// # Errors
    ///
    /// Returns a [dimension error](Error::Dimension) if the subset contains
    /// a node that is not in the graph.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the interval [0 . . 1).
    pub fn new(graph: &'a G, alpha: f64, subset: &'a NodeSubset) -> Result<Self> {
        assert!(
            // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
            (0.0..1.0).contains(&alpha),
            "The reset probability must be in [0 . . 1), got {alpha}"
        );
        subset.check(graph.num_nodes())?;
        Ok(Self {
            graph,
            alpha,
            subset,
            stop_signal: StopSignal::never(),
        })
    }

    /// Sets a [signal](StopSignal) interrupting the computation of the
    /// Neumann series.
    pub fn stop_signal(&mut self, stop_signal: StopSignal) -> &mut Self {
        self.stop_signal = stop_signal;
        self
    }

    /// Computes the matrices using the given eigenpair, which must have been
    /// computed for the same graph, reset probability and subset.
    pub fn compute(&self, eigenpair: &EigenPair) -> Result<ReducedMatrices> {
        self.compute_with_logging(eigenpair, no_logging![])
    }

    /// Computes the matrices using the given eigenpair, which must have been
    /// computed for the same graph, reset probability and subset, logging
    /// progress.
    ///
    /// `cpl` counts columns. Its options will be preserved, making thus
    /// possible to customize the logs.
    ///
    /// # Errors
    ///
    /// Returns a [dimension error](Error::Dimension) if the length of the
    /// eigenvectors is not the number of nodes of the graph.
    pub fn compute_with_logging(
        &self,
        eigenpair: &EigenPair,
        cpl: &mut impl ConcurrentProgressLog,
    ) -> Result<ReducedMatrices> {
        let n = self.graph.num_nodes();
        if eigenpair.len() != n {
            return Err(Error::Dimension {
                what: "eigenvector",
                expected: n,
                got: eigenpair.len(),
            });
        }

        let nr = self.subset.len();
        let google = GoogleMatrix::new(self.graph, self.alpha);
        let max_iter = crate::rank::max_iter(self.alpha);

        cpl.item_name("column");
        cpl.expected_updates(Some(nr));
        cpl.start(format!(
            "Computing reduced matrices (alpha={}, {nr} nodes, dlambda={})...",
            self.alpha,
            eigenpair.dlambda()
        ));

        let columns: Vec<Column> = (0..nr)
            .into_par_iter()
            .map_init(
                || (Scratch::new(n), cpl.clone()),
                |(scratch, pl), i| {
                    let column = self.column(&google, eigenpair, max_iter, i, scratch);
                    pl.update();
                    column
                },
            )
            .collect();

        cpl.done();

        let mut matrices = ReducedMatrices::new(nr);
        for (i, column) in columns.into_iter().enumerate() {
            matrices.g_rr.set_column(i, &column.rr);
            matrices.g_pr.set_column(i, &column.pr);
            matrices.g_qr.set_column(i, &column.qr);
            matrices.g_i.set_column(i, &column.gi);
            for j in 0..nr {
                matrices.g_r[(j, i)] = column.rr[j] + column.gi[j];
            }
            matrices.columns.push(column.report);
        }

        let interrupted = matrices.columns.iter().filter(|c| c.interrupted).count();
        let unconverged = matrices
            .columns
            .iter()
            .filter(|c| !c.interrupted && !c.converged())
            .count();
        if interrupted > 0 {
            log::warn!("{interrupted} columns were interrupted");
        }
        if unconverged > 0 {
            log::warn!("{unconverged} columns reached the iteration cap ({max_iter})");
        }

        Ok(matrices)
    }

    /// Computes column `i`.
    fn column(
        &self,
        google: &GoogleMatrix<&G>,
        eigenpair: &EigenPair,
        max_iter: usize,
        i: usize,
        sc: &mut Scratch,
    ) -> Column {
        let nodes = self.subset.as_slice();
        let nr = nodes.len();

        sc.input.fill(0.0);
        sc.input[nodes[i]] = 1.0;
        google.mul(&mut sc.output, &sc.input, true);

        let mut rr = vec![0.0; nr].into_boxed_slice();
        for (j, &node) in nodes.iter().enumerate() {
            rr[j] = sc.output[node];
            sc.output[node] = 0.0;
        }

        sc.s.copy_from_slice(&sc.output);
        eigenpair.project_p(&mut sc.output, eigenpair.dlambda());
        eigenpair.project_q(&mut sc.s);
        sc.f.copy_from_slice(&sc.s);

        // Neumann series of Q G_ss
        let mut report = ColumnReport {
            iterations: 0,
            quality: f64::INFINITY,
            interrupted: false,
        };
        for l in 0..max_iter {
            if self.stop_signal.is_raised() {
                report.interrupted = true;
                break;
            }
            sc.t.copy_from_slice(&sc.s);
            google.mul(&mut sc.f2, &sc.f, false);
            std::mem::swap(&mut sc.f, &mut sc.f2);
            for &node in nodes {
                sc.f[node] = 0.0;
            }
            eigenpair.project_q(&mut sc.f);
            add_assign(&mut sc.s, &sc.f);
            report.quality = diff_norm1(&sc.t, &sc.s);
            report.iterations = l + 1;
            if l % 10 == 0 {
                log::debug!(
                    "Column {i}, term {l}: quality = {}, norm = {}",
                    report.quality,
                    norm1(&sc.f)
                );
            }
            if report.quality <= 0.0 {
                break;
            }
        }

        let mut gather = |v: &[f64]| {
            google.mul(&mut sc.f, v, false);
            nodes.iter().map(|&node| sc.f[node]).collect::<Box<[f64]>>()
        };
        let pr = gather(&sc.output);
        let qr = gather(&sc.s);
        add_assign(&mut sc.output, &sc.s);
        let gi = gather(&sc.output);

        Column {
            rr,
            pr,
            qr,
            gi,
            report,
        }
    }
}
