/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

use anyhow::{Context, Result, anyhow, bail, ensure};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rgm::utils::Matrix;
use rgm_algo::reduced::ReducedMatrices;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use std::time::SystemTime;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    pub fn version_string() -> String {
        format!(
            "{}
git info: {} {} {}
build info: built on {} for {} with {}",
            PKG_VERSION,
            GIT_VERSION.unwrap_or(""),
            GIT_COMMIT_HASH.unwrap_or(""),
            match GIT_DIRTY {
                None => "",
                Some(true) => "(dirty)",
                Some(false) => "(clean)",
            },
            BUILD_DATE,
            TARGET,
            RUSTC_VERSION
        )
    }
}

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(...,  value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = rayon::current_num_threads().max(1), value_parser = num_threads_parser)]
    /// The number of threads to use.
    pub num_threads: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
/// Formats for storing vectors of floats.
pub enum FloatVectorFormat {
    /// ASCII format, one float per line.
    Ascii,
    /// A JSON Array.
    Json,
}

impl FloatVectorFormat {
    /// Returns the customary extension of files in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FloatVectorFormat::Ascii => "txt",
            FloatVectorFormat::Json => "json",
        }
    }

    /// Stores float values in the specified `path` using the format defined by
    /// `self`.
    ///
    /// `precision` will be used to truncate the float values to the specified
    /// number of decimal digits. If `None`,
    /// [zmij](https://crates.io/crates/zmij) formatting will be used.
    pub fn store<F>(&self, path: impl AsRef<Path>, values: &[F], precision: Option<usize>) -> Result<()>
    where
        F: core::fmt::Display + Copy + zmij::Float,
    {
        create_parent_dir(&path)?;
        let path_display = path.as_ref().display();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Could not create vector at {}", path_display))?;
        let mut file = BufWriter::new(file);
        let mut buf = zmij::Buffer::new();

        match self {
            FloatVectorFormat::Ascii => {
                log::info!("Storing in ASCII format at {}", path_display);
                for word in values.iter() {
                    match precision {
                        None => writeln!(file, "{}", buf.format(*word)),
                        Some(precision) => writeln!(file, "{word:.precision$}"),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
            }
            FloatVectorFormat::Json => {
                log::info!("Storing in JSON format at {}", path_display);
                write!(file, "[")?;
                for word in values.iter().take(values.len().saturating_sub(1)) {
                    match precision {
                        None => write!(file, "{}, ", buf.format(*word)),
                        Some(precision) => write!(file, "{word:.precision$}, "),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
                if let Some(last) = values.last() {
                    match precision {
                        None => write!(file, "{}", buf.format(*last)),
                        Some(precision) => write!(file, "{last:.precision$}"),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
                write!(file, "]")?;
            }
        }

        file.flush()
            .with_context(|| format!("Could not write vector to {}", path_display))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// The matrices computed by the `reduce` command.
pub enum MatrixKind {
    /// The reduced Google matrix.
    #[value(name = "g-r")]
    GR,
    /// The direct transitions within the subset.
    #[value(name = "g-rr")]
    Grr,
    /// The contribution of the leading mode.
    #[value(name = "g-pr")]
    Gpr,
    /// The indirect contribution of the other modes.
    #[value(name = "g-qr")]
    Gqr,
    /// The whole indirect contribution.
    #[value(name = "g-i")]
    GI,
}

impl MatrixKind {
    pub const ALL: [MatrixKind; 5] = [
        MatrixKind::GR,
        MatrixKind::Grr,
        MatrixKind::Gpr,
        MatrixKind::Gqr,
        MatrixKind::GI,
    ];

    /// Returns the prefix of the names of files containing this matrix.
    pub fn prefix(&self) -> &'static str {
        match self {
            MatrixKind::GR => "GR",
            MatrixKind::Grr => "Grr",
            MatrixKind::Gpr => "Gpr",
            MatrixKind::Gqr => "Gqr",
            MatrixKind::GI => "GI",
        }
    }

    /// Returns this matrix out of a computation.
    pub fn select<'a>(&self, matrices: &'a ReducedMatrices) -> &'a Matrix<f64> {
        match self {
            MatrixKind::GR => &matrices.g_r,
            MatrixKind::Grr => &matrices.g_rr,
            MatrixKind::Gpr => &matrices.g_pr,
            MatrixKind::Gqr => &matrices.g_qr,
            MatrixKind::GI => &matrices.g_i,
        }
    }
}

/// Stores a matrix in text format.
///
/// For each row, there is a line `row`, `column`, `value` for each column,
/// separated by TABs, followed by an empty line. Indices are zero-based. If
/// `names` is provided, the names of the row and of the column are appended to
/// each line.
///
/// `precision` will be used to truncate the values to the specified number
/// of decimal digits. If `None`, [zmij](https://crates.io/crates/zmij)
/// formatting will be used.
pub fn store_matrix(
    path: impl AsRef<Path>,
    matrix: &Matrix<f64>,
    names: Option<&[String]>,
    precision: Option<usize>,
) -> Result<()> {
    if let Some(names) = names {
        ensure!(
            names.len() >= matrix.rows().max(matrix.cols()),
            "There are {} names, but the matrix is {}x{}",
            names.len(),
            matrix.rows(),
            matrix.cols()
        );
    }
    create_parent_dir(&path)?;
    let path_display = path.as_ref().display();
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Could not create matrix at {}", path_display))?;
    let mut file = BufWriter::new(file);
    let mut buf = zmij::Buffer::new();

    log::info!("Storing matrix at {}", path_display);
    for (row, values) in matrix.iter_rows().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            match precision {
                None => write!(file, "{row}\t{col}\t{}", buf.format(value)),
                Some(precision) => write!(file, "{row}\t{col}\t{value:.precision$}"),
            }
            .with_context(|| format!("Could not write matrix to {}", path_display))?;
            if let Some(names) = names {
                write!(file, "\t{}\t{}", names[row], names[col])?;
            }
            writeln!(file)?;
        }
        writeln!(file)?;
    }

    file.flush()
        .with_context(|| format!("Could not write matrix to {}", path_display))?;
    Ok(())
}

/// Creates a [`ThreadPool`](rayon::ThreadPool) with the given number of threads.
pub fn get_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to create thread pool")?;
    log::info!("Using {} threads", thread_pool.current_num_threads());
    Ok(thread_pool)
}

/// Creates all parent directories of the given file path.
pub fn create_parent_dir(file_path: impl AsRef<Path>) -> Result<()> {
    // ensure that the dst directory exists
    if let Some(parent_dir) = file_path.as_ref().parent() {
        std::fs::create_dir_all(parent_dir).with_context(|| {
            format!(
                "Failed to create the directory {:?}",
                parent_dir.to_string_lossy()
            )
        })?;
    }
    Ok(())
}

/// Parses a duration from a string.
/// For compatibility with Java, if no suffix is given, it is assumed to be in milliseconds.
/// You can use suffixes, the available ones are:
/// - `s` for seconds
/// - `m` for minutes
/// - `h` for hours
/// - `d` for days
///
/// Example: `1d2h3m4s567` this is parsed as: 1 day, 2 hours, 3 minutes, 4 seconds, and 567 milliseconds.
pub fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
pub fn init_env_logger() -> Result<()> {
    use jiff::SpanRound;
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;

        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes "s"
    /// for seconds, "m" for minutes, "h" for hours, and "d" for days. If no
    /// suffix is provided it is assumed to be in milliseconds.
    /// Example: "1d2h3m4s567" is parsed as 1 day + 2 hours + 3 minutes + 4
    /// seconds + 567 milliseconds = 93784567 milliseconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    Reduce(reduce::CliArgs),
    #[clap(name = "pagerank", visible_alias = "pr")]
    PageRank(pagerank::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "rgm", version=build_info::version_string())]
/// Tools computing the reduced Google matrix of a subset of nodes.
///
/// Noteworthy environment variables:
///
/// - RUST_MIN_STACK: minimum thread stack size (in bytes).
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

pub mod pagerank;
pub mod reduce;

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::Reduce(args) => {
            reduce::main(cli.args, args)?;
        }
        SubCommands::PageRank(args) => {
            pagerank::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    let weeks = elapsed_seconds / (60 * 60 * 24 * 7);
    elapsed_seconds %= 60 * 60 * 24 * 7;
    let days = elapsed_seconds / (60 * 60 * 24);
    elapsed_seconds %= 60 * 60 * 24;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;

    for (value, unit) in [(weeks, "week"), (days, "day"), (hours, "hour"), (minutes, "minute")] {
        match value {
            0 => {}
            1 => result.push_str(&format!("1 {unit} ")),
            _ => result.push_str(&format!("{value} {unit}s ")),
        }
    }
    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}
