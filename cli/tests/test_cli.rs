/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use rgm_cli::cli_main;
use std::path::{Path, PathBuf};

// 0 → 1, 0 → 2, 2 → 0, 2 → 1 (node 1 is dangling)
const GRAPH: &str = "3\n4\n1 2\n1 3\n3 1\n3 2\n";

fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

fn arg(path: &Path) -> String {
    path.display().to_string()
}

/// Parses a matrix file into (row, col, value, names) entries.
fn read_matrix(path: &Path) -> Result<Vec<(usize, usize, f64, Vec<String>)>> {
    let mut entries = vec![];
    for line in std::fs::read_to_string(path)?.lines() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        entries.push((
            fields[0].parse()?,
            fields[1].parse()?,
            fields[2].parse()?,
            fields[3..].iter().map(|s| s.to_string()).collect(),
        ));
    }
    Ok(entries)
}

#[test]
fn test_reduce() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_file(dir.path(), "tiny.dat_reduce", GRAPH)?;
    let nodes = write_file(dir.path(), "pair.nodes", "2\n0\n1\n")?;
    let names = write_file(dir.path(), "pair.names", "Zero\nOne\n")?;
    let results = dir.path().join("out");
    let vectors = dir.path().join("vectors");

    cli_main([
        "rgm",
        "reduce",
        arg(&graph).as_str(),
        "0.15",
        "-5",
        "0",
        "0",
        arg(&nodes).as_str(),
        arg(&names).as_str(),
        "--results-dir",
        arg(&results).as_str(),
        "--vectors",
        arg(&vectors).as_str(),
        "--fmt",
        "json",
        "-j",
        "2",
    ])?;

    for prefix in ["GR", "Grr", "Gpr", "Gqr", "GI"] {
        let path = results.join(format!("{prefix}_tiny_pair_2.dat"));
        let entries = read_matrix(&path)?;
        assert_eq!(entries.len(), 4, "{}", path.display());
        assert_eq!(entries[1].0, 0);
        assert_eq!(entries[1].1, 1);
        assert_eq!(entries[1].3, ["Zero", "One"]);
    }

    // The reduced matrix is column stochastic
    let g_r = read_matrix(&results.join("GR_tiny_pair_2.dat"))?;
    for col in 0..2 {
        let sum: f64 = g_r.iter().filter(|e| e.1 == col).map(|e| e.2).sum();
        assert!((sum - 1.0).abs() < 1E-10, "column {col} sums to {sum}");
    }

    // G_R = G_rr + G_pr + G_qr
    let g_rr = read_matrix(&results.join("Grr_tiny_pair_2.dat"))?;
    let g_pr = read_matrix(&results.join("Gpr_tiny_pair_2.dat"))?;
    let g_qr = read_matrix(&results.join("Gqr_tiny_pair_2.dat"))?;
    for i in 0..4 {
        assert!((g_r[i].2 - g_rr[i].2 - g_pr[i].2 - g_qr[i].2).abs() < 1E-12);
    }

    for what in ["pagerank", "right", "left"] {
        let path = vectors.join(format!("{what}_tiny_pair_2.json"));
        let values: Vec<f64> = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(values.len(), 3);
    }
    let pagerank: Vec<f64> = serde_json::from_str(&std::fs::read_to_string(
        vectors.join("pagerank_tiny_pair_2.json"),
    )?)?;
    assert!((pagerank.iter().sum::<f64>() - 1.0).abs() < 1E-10);

    Ok(())
}

#[test]
fn test_reduce_selected_matrices() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_file(dir.path(), "tiny.dat_reduce", GRAPH)?;
    let nodes = write_file(dir.path(), "one.nodes", "1\n2\n")?;
    let results = dir.path().join("Results");

    cli_main([
        "rgm",
        "reduce",
        arg(&graph).as_str(),
        "0.15",
        "10",
        "0",
        "0",
        arg(&nodes).as_str(),
        "--results-dir",
        arg(&results).as_str(),
        "--matrices",
        "g-r,g-i",
        "--precision",
        "6",
    ])?;

    assert!(results.join("GR_tiny_one_1.dat").exists());
    assert!(results.join("GI_tiny_one_1.dat").exists());
    assert!(!results.join("Grr_tiny_one_1.dat").exists());
    assert!(!results.join("Gpr_tiny_one_1.dat").exists());

    let g_r = std::fs::read_to_string(results.join("GR_tiny_one_1.dat"))?;
    assert_eq!(g_r, "0\t0\t1.000000\n\n");
    Ok(())
}

#[test]
fn test_reduce_bad_subset() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_file(dir.path(), "tiny.dat_reduce", GRAPH)?;
    let nodes = write_file(dir.path(), "far.nodes", "1\n3\n")?;

    let result = cli_main([
        "rgm",
        "reduce",
        arg(&graph).as_str(),
        "0.15",
        "10",
        "0",
        "0",
        arg(&nodes).as_str(),
        "--results-dir",
        arg(&dir.path().join("Results")).as_str(),
    ]);
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_reduce_bad_alpha() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_file(dir.path(), "tiny.dat_reduce", GRAPH)?;
    let nodes = write_file(dir.path(), "one.nodes", "1\n0\n")?;

    let result = cli_main([
        "rgm",
        "reduce",
        arg(&graph).as_str(),
        "1.0",
        "10",
        "0",
        "0",
        arg(&nodes).as_str(),
    ]);
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_pagerank() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_file(dir.path(), "cycle.dat_reduce", "4\n4\n1 2\n2 3\n3 4\n4 1\n")?;
    let output = dir.path().join("rank.json");

    cli_main([
        "rgm",
        "pr",
        arg(&graph).as_str(),
        "-o",
        arg(&output).as_str(),
        "--fmt",
        "json",
        "--alpha",
        "0.3",
    ])?;

    let rank: Vec<f64> = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(rank.len(), 4);
    for value in rank {
        assert!((value - 0.25).abs() < 1E-10);
    }
    Ok(())
}

#[test]
fn test_pagerank_max_iter() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let graph = write_file(dir.path(), "tiny.dat_reduce", GRAPH)?;
    let output = dir.path().join("rank.txt");

    cli_main([
        "rgm",
        "pagerank",
        arg(&graph).as_str(),
        "-o",
        arg(&output).as_str(),
        "--max-iter",
        "0",
    ])?;

    // Stops at the first check, after a single multiplication
    let rank: Vec<f64> = std::fs::read_to_string(&output)?
        .lines()
        .map(str::parse)
        .collect::<Result<_, _>>()?;
    assert_eq!(rank.len(), 3);
    Ok(())
}
