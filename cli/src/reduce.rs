/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{
    FloatVectorFormat, GlobalArgs, MatrixKind, NumThreadsArg, get_thread_pool, parse_duration,
    store_matrix,
};
use anyhow::{Context, Result, ensure};
use clap::Parser;
use dsi_progress_logger::{ProgressLog, concurrent_progress_logger, progress_logger};
use rgm::prelude::*;
use rgm::utils::NODES_EXTENSION;
use rgm_algo::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "reduce",
    about = "Computes the reduced Google matrix of a subset of nodes, and its components.",
    long_about = None
)]
pub struct CliArgs {
    /// The graph file (usually with extension .dat_reduce).
    pub graph: PathBuf,

    /// The reset probability α, that is, one minus the damping factor (must be
    /// in the interval [0 . . 1)).
    pub delta_alpha: f64,

    #[arg(allow_negative_numbers = true)]
    /// The number of iterations between two convergence checks of the
    /// eigenvector computations (nonpositive values are treated as 1).
    pub iprint: i64,

    #[arg(allow_negative_numbers = true)]
    /// Legacy parameter, accepted and ignored.
    pub print_number: i64,

    #[arg(allow_negative_numbers = true)]
    /// Legacy parameter, accepted and ignored.
    pub ten_number: i64,

    /// The file containing the subset of nodes (usually with extension .nodes).
    pub nodes: PathBuf,

    /// A file containing the names of the nodes of the subset, one per line,
    /// used to annotate the output.
    pub names: Option<PathBuf>,

    #[arg(long)]
    /// Loads only the arcs between the first LIMIT nodes.
    pub limit: Option<usize>,

    #[arg(long, default_value = "Results")]
    /// The directory where matrices will be stored.
    pub results_dir: PathBuf,

    #[arg(long, value_enum, value_delimiter = ',', default_values_t = MatrixKind::ALL.to_vec())]
    /// The matrices to store.
    pub matrices: Vec<MatrixKind>,

    #[arg(long)]
    /// Decimal digits for matrices and vectors (default: shortest exact
    /// representation).
    pub precision: Option<usize>,

    #[arg(long)]
    /// A directory where the PageRank vector and the right and left
    /// eigenvectors will be stored.
    pub vectors: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The output format for vectors.
    pub fmt: FloatVectorFormat,

    #[arg(long, value_parser = parse_duration)]
    /// Stops all iterations after this time (same syntax as --log-interval),
    /// keeping the current approximations.
    pub deadline: Option<Duration>,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(
        // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
        (0.0..1.0).contains(&args.delta_alpha),
        "The reset probability must be in [0 . . 1), got {}",
        args.delta_alpha
    );
    let alpha = args.delta_alpha;
    let check_interval = args.iprint.max(1) as usize;

    log::info!(
        "Graph: {}, delta_alpha: {alpha}, iprint: {}, print_number: {}, ten_number: {}",
        args.graph.display(),
        args.iprint,
        args.print_number,
        args.ten_number
    );
    log::info!("Node subset: {}", args.nodes.display());
    if let Some(names) = &args.names {
        log::info!("Node names: {}", names.display());
    }

    let mut pl = progress_logger![];
    let mut cpl = concurrent_progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
        cpl.log_interval(log_interval);
    }

    let thread_pool = get_thread_pool(args.num_threads.num_threads)?;

    let loader = CsrGraph::with_path(&args.graph).limit(args.limit);
    let graph = loader
        .load_with_logging(&mut pl)
        .with_context(|| format!("Could not load the graph from {}", args.graph.display()))?;
    let subset = NodeSubset::load(&args.nodes)
        .with_context(|| format!("Could not load the node subset from {}", args.nodes.display()))?;
    let nr = subset.len();
    log::info!("Read a subset of {nr} nodes");

    let names = match &args.names {
        None => None,
        Some(path) => {
            let names = load_node_names(path)
                .with_context(|| format!("Could not load node names from {}", path.display()))?;
            if names.len() < nr {
                log::warn!(
                    "Only {} names for {nr} nodes: output will not be annotated",
                    names.len()
                );
                None
            } else {
                Some(names)
            }
        }
    };

    let stop_signal = match args.deadline {
        Some(deadline) => StopSignal::never().timeout(deadline),
        None => StopSignal::never(),
    };
    let options = EigenPairOptions {
        check_interval,
        stop_signal: stop_signal.clone(),
    };

    let (eigenpair, matrices) = thread_pool.install(|| -> Result<_> {
        log::info!("Computing the eigenpair...");
        let eigenpair = EigenPair::compute_with_options(&graph, alpha, &subset, &options)?;
        let mut reduced = ReducedGoogleMatrix::new(&graph, alpha, &subset)?;
        reduced.stop_signal(stop_signal);
        let matrices = reduced.compute_with_logging(&eigenpair, &mut cpl)?;
        Ok((eigenpair, matrices))
    })?;

    for (what, convergence) in ["right", "left", "PageRank"]
        .iter()
        .zip(eigenpair.convergence())
    {
        log::info!(
            "The {what} vector {} after {} iterations (rel diff = {})",
            convergence.reason,
            convergence.iterations,
            convergence.rel_diff
        );
    }
    if let Some(max) = matrices.columns.iter().map(|c| c.iterations).max() {
        log::info!("The Neumann series needed at most {max} terms");
    }

    let graph_name = loader.base_name();
    let nodes_name = base_name(&args.nodes, NODES_EXTENSION);
    let mut stored = Vec::with_capacity(args.matrices.len());
    for &kind in &args.matrices {
        if stored.contains(&kind) {
            continue;
        }
        stored.push(kind);
        let path = args.results_dir.join(format!(
            "{}_{graph_name}_{nodes_name}_{nr}.dat",
            kind.prefix()
        ));
        store_matrix(
            &path,
            kind.select(&matrices),
            names.as_deref(),
            args.precision,
        )?;
    }

    if let Some(dir) = &args.vectors {
        let ext = args.fmt.extension();
        for (what, values) in [
            ("pagerank", eigenpair.pagerank()),
            ("right", eigenpair.right()),
            ("left", eigenpair.left()),
        ] {
            let path = dir.join(format!("{what}_{graph_name}_{nodes_name}_{nr}.{ext}"));
            args.fmt.store(&path, values, args.precision)?;
        }
    }

    Ok(())
}
