/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The damped Google matrix of a graph as a linear operator.
//!
//! Let *S* be the column-stochastic matrix of the graph, in which node *j*
//! with outdegree *dⱼ* > 0 sends weight 1/*dⱼ* to each of its successors, let
//! **d** be the characteristic vector of dangling nodes, **e** the all-ones
//! vector, *N* the number of nodes, and α the _reset probability_ (the
//! complement of the usual damping factor). The Google matrix is
//!
//! > *G* = (1 − α) (*S* + **e** **d**ᵀ / *N*) + α **e** **e**ᵀ / *N*,
//!
//! that is, dangling nodes redistribute their mass uniformly, and at each step
//! a fraction α of the mass is teleported uniformly.
//!
//! [`GoogleMatrix::mul`] computes *G* **x**, and
//! [`GoogleMatrix::mul_transpose`] computes *G*ᵀ **x**; in the latter,
//! the dangling contribution **d** **e**ᵀ **x** / *N* only reaches dangling
//! nodes. Both run in time *O*(*N* + *M*) and do not allocate.
//!
//! When the input vector is known to sum to one, the teleportation term
//! α **e** **e**ᵀ **x** / *N* is simply α / *N*: this is what happens when
//! `normalize` is true. Otherwise, the sum of the input is computed, so that
//! the operator preserves the total mass of any vector. If α is zero, no
//! damping is applied at all, so no rounding error is introduced.

use rgm::traits::RandomAccessGraph;

/// The damped Google matrix of a graph.
///
/// # Examples
///
/// ```
/// use rgm::prelude::*;
/// use rgm_algo::google::GoogleMatrix;
///
/// // 0 → 1, 1 → 2; node 2 is dangling
/// let graph = CsrGraph::from_arcs(3, [(0, 1), (1, 2)])?;
/// let google = GoogleMatrix::new(&graph, 0.0);
///
/// let mut out = [0.0; 3];
/// google.mul(&mut out, &[0.0, 0.0, 1.0], true);
/// assert!(out.iter().all(|&x| (x - 1.0 / 3.0).abs() < 1E-15));
/// # Ok::<(), rgm::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GoogleMatrix<G: RandomAccessGraph> {
    graph: G,
    alpha: f64,
}

impl<G: RandomAccessGraph> GoogleMatrix<G> {
    /// Creates the Google matrix of `graph` with reset probability `alpha`.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the interval [0 . . 1).
    pub fn new(graph: G, alpha: f64) -> Self {
        assert!(
            // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
            (0.0..1.0).contains(&alpha),
            "The reset probability must be in [0 . . 1), got {alpha}"
        );
        Self { graph, alpha }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    /// Computes `out` = *G* `input`.
    ///
    /// If `normalize` is true, `input` is assumed to sum to one.
    ///
    /// # Panics
    ///
    /// Panics if the length of `out` or `input` is not the number of nodes.
    pub fn mul(&self, out: &mut [f64], input: &[f64], normalize: bool) {
        let n = self.check_lengths(out, input);

        // Dangling nodes: 1/N e dᵀ
        let mut sum = 0.0;
        let dangling = self.graph.dangling_nodes();
        if !dangling.is_empty() {
            for &node in dangling {
                sum += input[node];
            }
            sum /= n as f64;
        }
        out.fill(sum);

        // S in
        for node in 0..n {
            let succ = self.graph.successors(node);
            if succ.is_empty() {
                continue;
            }
            let val = input[node] / self.graph.outdegree(node) as f64;
            for &s in succ {
                out[s] += val;
            }
        }

        self.damp(out, input, normalize);
    }

    /// Computes `out` = *G*ᵀ `input`.
    ///
    /// If `normalize` is true, `input` is assumed to sum to one.
    ///
    /// # Panics
    ///
    /// Panics if the length of `out` or `input` is not the number of nodes.
    pub fn mul_transpose(&self, out: &mut [f64], input: &[f64], normalize: bool) {
        let n = self.check_lengths(out, input);

        out.fill(0.0);
        // Dangling nodes: 1/N d eᵀ
        let dangling = self.graph.dangling_nodes();
        if !dangling.is_empty() {
            let sum = input.iter().sum::<f64>() / n as f64;
            for &node in dangling {
                out[node] += sum;
            }
        }

        // Sᵀ in
        for (node, x) in out.iter_mut().enumerate() {
            let succ = self.graph.successors(node);
            if succ.is_empty() {
                continue;
            }
            let mut sum = 0.0;
            for &s in succ {
                sum += input[s];
            }
            *x += sum / self.graph.outdegree(node) as f64;
        }

        self.damp(out, input, normalize);
    }

    /// Applies the damping factor and adds the teleportation term.
    fn damp(&self, out: &mut [f64], input: &[f64], normalize: bool) {
        if self.alpha == 0.0 {
            return;
        }
        let val = 1.0 - self.alpha;
        for x in out.iter_mut() {
            *x *= val;
        }
        let mut sum = if normalize {
            1.0
        } else {
            input.iter().sum::<f64>()
        };
        sum *= self.alpha / out.len() as f64;
        for x in out.iter_mut() {
            *x += sum;
        }
    }

    fn check_lengths(&self, out: &[f64], input: &[f64]) -> usize {
        let n = self.graph.num_nodes();
        assert_eq!(
            input.len(),
            n,
            "Input vector length ({}) does not match the number of nodes ({n})",
            input.len()
        );
        assert_eq!(
            out.len(),
            n,
            "Output vector length ({}) does not match the number of nodes ({n})",
            out.len()
        );
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgm::graphs::csr_graph::CsrGraph;

    #[test]
    fn test_transpose_is_adjoint() -> anyhow::Result<()> {
        // 0 → 1, 0 → 3, 1 → 2, 2 → 0, 2 → 1; node 3 is dangling
        let graph = CsrGraph::from_arcs(4, [(0, 1), (0, 3), (1, 2), (2, 0), (2, 1)])?;
        for alpha in [0.0, 0.15, 0.5] {
            let google = GoogleMatrix::new(&graph, alpha);
            let x = [0.1, 0.4, 0.3, 0.2];
            let y = [0.7, -0.2, 0.05, 1.1];
            let mut gx = [0.0; 4];
            let mut gty = [0.0; 4];
            google.mul(&mut gx, &x, false);
            google.mul_transpose(&mut gty, &y, false);
            let lhs: f64 = y.iter().zip(gx.iter()).map(|(a, b)| a * b).sum();
            let rhs: f64 = gty.iter().zip(x.iter()).map(|(a, b)| a * b).sum();
            assert!((lhs - rhs).abs() < 1E-14, "alpha={alpha}: {lhs} != {rhs}");
        }
        Ok(())
    }

    #[test]
    fn test_transpose_fixes_ones() -> anyhow::Result<()> {
        // Gᵀ e = e, since G is column stochastic
        let graph = CsrGraph::from_arcs(4, [(0, 1), (0, 3), (1, 2), (2, 0), (2, 1)])?;
        let google = GoogleMatrix::new(&graph, 0.15);
        let mut out = [0.0; 4];
        google.mul_transpose(&mut out, &[1.0; 4], false);
        for x in out {
            assert!((x - 1.0).abs() < 1E-15);
        }
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_wrong_length() {
        let graph = CsrGraph::from_arcs(3, [(0, 1), (1, 2)]).unwrap();
        let google = GoogleMatrix::new(&graph, 0.15);
        let mut out = [0.0; 2];
        google.mul(&mut out, &[1.0, 0.0, 0.0], true);
    }

    #[test]
    #[should_panic]
    fn test_wrong_alpha() {
        let graph = CsrGraph::new();
        GoogleMatrix::new(&graph, 1.0);
    }
}
