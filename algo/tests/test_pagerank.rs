/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rgm::prelude::*;
use rgm_algo::prelude::*;
use rgm_algo::utils::math::normalize;
use std::io::Write;

/// Builds a random strongly connected graph: a Hamiltonian cycle plus random
/// arcs.
fn strongly_connected(n: usize, p: f64, seed: u64) -> anyhow::Result<CsrGraph> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut arcs = Vec::new();
    for src in 0..n {
        let mut succ = vec![(src + 1) % n];
        for dst in 0..n {
            if dst != src && rng.random_bool(p) {
                succ.push(dst);
            }
        }
        succ.sort_unstable();
        succ.dedup();
        arcs.extend(succ.into_iter().map(|dst| (src, dst)));
    }
    Ok(CsrGraph::from_arcs(n, arcs)?)
}

#[test]
fn test_normalize() {
    let mut rng = SmallRng::seed_from_u64(0);
    for len in [1, 2, 10, 1000] {
        let mut v: Vec<f64> = (0..len).map(|_| rng.random::<f64>() + 1E-3).collect();
        normalize(&mut v);
        assert!((v.iter().sum::<f64>() - 1.0).abs() < 1E-12);
    }
}

#[test]
fn test_cycle_is_uniform() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cycle.dat_reduce");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "4\n4\n1 2\n2 3\n3 4\n4 1")?;
    drop(file);

    let graph = CsrGraph::with_path(&path).load()?;
    assert_eq!(graph.first_pos(), &[0, 1, 2, 3, 4]);
    assert_eq!(graph.outdegrees(), &[1, 1, 1, 1]);
    assert!(graph.dangling_nodes().is_empty());

    let mut pr = ProjectedPageRank::new(&graph);
    pr.alpha(0.15).run(preds::default_policy(0.15));
    assert_eq!(pr.stop_reason(), StopReason::Converged);
    for &x in pr.rank() {
        assert!((x - 0.25).abs() < 1E-10);
    }

    let pair = EigenPair::compute(&graph, 0.15, &NodeSubset::empty())?;
    for &x in pair.pagerank() {
        assert!((x - 0.25).abs() < 1E-10);
    }
    Ok(())
}

#[test]
fn test_stationary() -> anyhow::Result<()> {
    // The PageRank vector is a fixed point of the Google matrix
    let graph = CsrGraph::from_arcs(5, [(0, 1), (0, 2), (1, 2), (2, 0), (3, 0), (4, 3)])?;
    let mut pr = ProjectedPageRank::new(&graph);
    pr.alpha(0.15).check_interval(1);
    pr.run(preds::default_policy(0.15));
    assert_eq!(pr.absorbed_mass(), 0.0);

    let google = GoogleMatrix::new(&graph, 0.15);
    let mut out = vec![0.0; 5];
    google.mul(&mut out, pr.rank(), true);
    for (x, y) in out.iter().zip(pr.rank()) {
        assert!((x - y).abs() < 1E-12, "{out:?} != {:?}", pr.rank());
    }
    // Nodes 3 and 4 only receive teleportation
    assert!((pr.rank()[4] - 0.15 / 5.0).abs() < 1E-12);
    Ok(())
}

#[test]
fn test_left_without_subset_is_constant() -> anyhow::Result<()> {
    // Gᵀ is row stochastic, so its dominant eigenvector is constant
    let graph = strongly_connected(50, 0.1, 3)?;
    let mut pr = ProjectedPageRank::new(&graph);
    pr.direction(Direction::Left).run(preds::default_policy(0.15));
    for &x in pr.rank() {
        assert!((x - 1.0 / 50.0).abs() < 1E-12);
    }
    assert!(pr.absorbed_mass().abs() < 1E-12);
    Ok(())
}

#[test]
fn test_biorthogonality() -> anyhow::Result<()> {
    for seed in 0..4 {
        let graph = strongly_connected(80, 0.05, seed)?;
        let subset = NodeSubset::from(vec![3, 17, 42, 60]);
        let pair = EigenPair::compute(&graph, 0.15, &subset)?;

        let dot = pair
            .left()
            .iter()
            .zip(pair.right())
            .map(|(a, b)| a * b)
            .sum::<f64>();
        assert!((dot - 1.0).abs() < 1E-10);
        assert!((pair.biorthogonality() - 1.0).abs() < 1E-10);
        assert!((pair.right().iter().sum::<f64>() - 1.0).abs() < 1E-12);
        assert!((pair.pagerank().iter().sum::<f64>() - 1.0).abs() < 1E-12);
        for &node in subset.iter() {
            assert_eq!(pair.right()[node], 0.0);
            assert_eq!(pair.left()[node], 0.0);
        }
        // Left and right iterations agree on the eigenvalue
        assert!(pair.dlambda() > 0.0 && pair.dlambda() < 1.0);
        assert!((pair.dlambda() - pair.dlambda_left()).abs() < 1E-10);
    }
    Ok(())
}

#[test]
fn test_eigenvector() -> anyhow::Result<()> {
    // Π G ψ = (1 - dlambda) ψ
    let graph = strongly_connected(60, 0.08, 11)?;
    let subset = NodeSubset::from(vec![0, 1, 30]);
    let pair = EigenPair::compute(&graph, 0.15, &subset)?;
    let google = GoogleMatrix::new(&graph, 0.15);
    let mut out = vec![0.0; 60];
    google.mul(&mut out, pair.right(), true);
    for &node in subset.iter() {
        out[node] = 0.0;
    }
    for (x, y) in out.iter().zip(pair.right()) {
        assert!((x - pair.eigenvalue() * y).abs() < 1E-12);
    }
    Ok(())
}

#[test]
fn test_subset_out_of_range() -> anyhow::Result<()> {
    let graph = strongly_connected(10, 0.1, 0)?;
    let subset = NodeSubset::from(vec![2, 10]);
    assert!(matches!(
        EigenPair::compute(&graph, 0.15, &subset),
        Err(Error::Dimension {
            expected: 10,
            got: 10,
            ..
        })
    ));
    Ok(())
}
