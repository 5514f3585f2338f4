/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{FloatVectorFormat, GlobalArgs};
use anyhow::{Context, Result, ensure};
use clap::Parser;
use dsi_progress_logger::{ProgressLog, progress_logger};
use predicates::prelude::*;
use rgm::graphs::csr_graph::CsrGraph;
use rgm_algo::rank::pagerank::preds::{self, MaxIter};
use rgm_algo::rank::{DEFAULT_ALPHA, DEFAULT_CHECK_INTERVAL, ProjectedPageRank};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pagerank",
    about = "Computes PageRank by power iteration.",
    long_about = None
)]
pub struct CliArgs {
    /// The graph file (usually with extension .dat_reduce).
    pub graph: PathBuf,

    #[arg(short, long)]
    /// Where to store the rank vector.
    pub output: PathBuf,

    #[arg(short, long, default_value_t = DEFAULT_ALPHA)]
    /// The reset probability α, that is, one minus the damping factor (must be
    /// in the interval [0 . . 1)).
    pub alpha: f64,

    #[arg(long)]
    /// Loads only the arcs between the first LIMIT nodes.
    pub limit: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_CHECK_INTERVAL)]
    /// The number of iterations between two convergence checks.
    pub check_interval: usize,

    #[arg(long)]
    /// Maximum number of iterations.
    pub max_iter: Option<usize>,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The output format for the rank vector.
    pub fmt: FloatVectorFormat,

    #[arg(long)]
    /// Decimal digits for text output formats.
    pub precision: Option<usize>,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(
        // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
        (0.0..1.0).contains(&args.alpha),
        "The reset probability must be in [0 . . 1), got {}",
        args.alpha
    );

    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let graph = CsrGraph::with_path(&args.graph)
        .limit(args.limit)
        .load_with_logging(&mut pl)
        .with_context(|| format!("Could not load the graph from {}", args.graph.display()))?;

    // Build stopping predicate
    let mut predicate = preds::default_policy(args.alpha);
    if let Some(max_iter) = args.max_iter {
        predicate = predicate.or(MaxIter::from(max_iter)).boxed();
    }

    let mut pr = ProjectedPageRank::new(&graph);
    pr.alpha(args.alpha).check_interval(args.check_interval);
    pr.run_with_logging(predicate, &mut pl);

    log::info!(
        "Completed after {} iteration(s): {} (rel diff = {})",
        pr.iterations(),
        pr.stop_reason(),
        pr.rel_diff()
    );

    args.fmt.store(&args.output, pr.rank(), args.precision)?;

    Ok(())
}
