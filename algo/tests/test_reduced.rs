/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rgm::prelude::*;
use rgm_algo::prelude::*;

const ALPHA: f64 = 0.15;

/// Returns the dense Google matrix of a graph.
fn dense(graph: &CsrGraph, alpha: f64) -> Vec<Vec<f64>> {
    let n = graph.num_nodes();
    let mut g = vec![vec![alpha / n as f64; n]; n];
    for j in 0..n {
        let d = graph.outdegree(j);
        if d == 0 {
            for row in g.iter_mut() {
                row[j] += (1.0 - alpha) / n as f64;
            }
        } else {
            for &i in graph.successors(j) {
                g[i][j] += (1.0 - alpha) / d as f64;
            }
        }
    }
    g
}

fn random_graph(n: usize, p: f64, seed: u64) -> anyhow::Result<CsrGraph> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut arcs = Vec::new();
    for src in 0..n {
        for dst in 0..n {
            if dst != src && rng.random_bool(p) {
                arcs.push((src, dst));
            }
        }
    }
    Ok(CsrGraph::from_arcs(n, arcs)?)
}

#[test]
fn test_three_nodes_dense() -> anyhow::Result<()> {
    // 0 → 1, 0 → 2, 2 → 0, 2 → 1; node 1 is dangling
    let graph = CsrGraph::from_arcs(3, [(0, 1), (0, 2), (2, 0), (2, 1)])?;
    let g = dense(&graph, ALPHA);

    for r in 0..3 {
        let subset = NodeSubset::from(vec![r]);
        let pair = EigenPair::compute(&graph, ALPHA, &subset)?;
        let matrices = ReducedGoogleMatrix::new(&graph, ALPHA, &subset)?.compute(&pair)?;

        // The complement of the subset, and G_ss
        let s: Vec<usize> = (0..3).filter(|&x| x != r).collect();
        let (a, b, c, d) = (g[s[0]][s[0]], g[s[0]][s[1]], g[s[1]][s[0]], g[s[1]][s[1]]);

        // (1 - G_ss)⁻¹
        let det = (1.0 - a) * (1.0 - d) - b * c;
        let inv = [[(1.0 - d) / det, b / det], [c / det, (1.0 - a) / det]];

        // Leading eigenvalue and eigenvectors of G_ss
        let lambda = (a + d) / 2.0 + (((a - d) / 2.0).powi(2) + b * c).sqrt();
        let psi_r = [b, lambda - a];
        let psi_l = [c, lambda - a];
        let norm = psi_l[0] * psi_r[0] + psi_l[1] * psi_r[1];

        let mut g_i = 0.0;
        let mut g_pr = 0.0;
        for x in 0..2 {
            for y in 0..2 {
                g_i += g[r][s[x]] * inv[x][y] * g[s[y]][r];
                g_pr += g[r][s[x]] * psi_r[x] * psi_l[y] / norm * g[s[y]][r];
            }
        }
        g_pr /= 1.0 - lambda;
        let g_qr = g_i - g_pr;

        assert!((pair.dlambda() - (1.0 - lambda)).abs() < 1E-10);
        assert!((matrices.g_rr[(0, 0)] - g[r][r]).abs() < 1E-9);
        assert!((matrices.g_pr[(0, 0)] - g_pr).abs() < 1E-9);
        assert!((matrices.g_qr[(0, 0)] - g_qr).abs() < 1E-9);
        assert!((matrices.g_i[(0, 0)] - g_i).abs() < 1E-9);
        assert!((matrices.g_r[(0, 0)] - (g[r][r] + g_i)).abs() < 1E-9);
        assert!(matrices.columns[0].converged());
    }
    Ok(())
}

#[test]
fn test_column_stochastic() -> anyhow::Result<()> {
    let graph = random_graph(60, 0.06, 5)?;
    let subset = NodeSubset::from(vec![1, 7, 22, 23, 50]);
    let pair = EigenPair::compute(&graph, ALPHA, &subset)?;
    let matrices = ReducedGoogleMatrix::new(&graph, ALPHA, &subset)?.compute(&pair)?;

    for col in 0..subset.len() {
        assert!((matrices.g_r.column(col).sum::<f64>() - 1.0).abs() < 1E-10);
        for row in 0..subset.len() {
            let (i, pr, qr) = (
                matrices.g_i[(row, col)],
                matrices.g_pr[(row, col)],
                matrices.g_qr[(row, col)],
            );
            assert!((i - pr - qr).abs() < 1E-12);
            assert_eq!(
                matrices.g_r[(row, col)],
                matrices.g_rr[(row, col)] + matrices.g_i[(row, col)]
            );
        }
    }
    Ok(())
}

#[test]
fn test_thread_independence() -> anyhow::Result<()> {
    let graph = random_graph(40, 0.1, 17)?;
    let subset = NodeSubset::from(vec![0, 5, 9, 31]);
    let pair = EigenPair::compute(&graph, ALPHA, &subset)?;
    let reduced = ReducedGoogleMatrix::new(&graph, ALPHA, &subset)?;

    let parallel = reduced.compute(&pair)?;
    let sequential = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()?
        .install(|| reduced.compute(&pair))?;

    assert_eq!(parallel.g_rr, sequential.g_rr);
    assert_eq!(parallel.g_pr, sequential.g_pr);
    assert_eq!(parallel.g_qr, sequential.g_qr);
    assert_eq!(parallel.g_i, sequential.g_i);
    assert_eq!(parallel.g_r, sequential.g_r);
    assert_eq!(parallel.columns, sequential.columns);
    Ok(())
}

#[test]
fn test_column_order() -> anyhow::Result<()> {
    // Permuting the subset permutes rows and columns
    let graph = random_graph(30, 0.12, 23)?;
    let subset = NodeSubset::from(vec![2, 11, 19]);
    let permuted = NodeSubset::from(vec![19, 2, 11]);
    // Position of each node of subset in permuted
    let perm = [1, 2, 0];

    let a = ReducedGoogleMatrix::new(&graph, ALPHA, &subset)?
        .compute(&EigenPair::compute(&graph, ALPHA, &subset)?)?;
    let b = ReducedGoogleMatrix::new(&graph, ALPHA, &permuted)?
        .compute(&EigenPair::compute(&graph, ALPHA, &permuted)?)?;

    for row in 0..3 {
        for col in 0..3 {
            let x = a.g_r[(row, col)];
            let y = b.g_r[(perm[row], perm[col])];
            assert!((x - y).abs() < 1E-10, "{x} != {y}");
        }
    }
    Ok(())
}

#[test]
fn test_empty_subset() -> anyhow::Result<()> {
    let graph = random_graph(10, 0.2, 1)?;
    let subset = NodeSubset::empty();
    let pair = EigenPair::compute(&graph, ALPHA, &subset)?;
    let matrices = ReducedGoogleMatrix::new(&graph, ALPHA, &subset)?.compute(&pair)?;
    assert_eq!(matrices.g_r.rows(), 0);
    assert!(matrices.columns.is_empty());
    Ok(())
}

#[test]
fn test_subset_out_of_range() -> anyhow::Result<()> {
    let graph = random_graph(10, 0.2, 1)?;
    let subset = NodeSubset::from(vec![11]);
    assert!(matches!(
        ReducedGoogleMatrix::new(&graph, ALPHA, &subset),
        Err(Error::Dimension {
            expected: 10,
            got: 11,
            ..
        })
    ));
    Ok(())
}
