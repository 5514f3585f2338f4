/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Loading graphs from text files.
//!
//! A graph file contains the number of nodes *N* on the first line, the
//! number of arcs *M* on the second line, and then one arc per line, given as
//! a pair of 1-based node identifiers separated by a space or by a TAB. Arcs
//! must be grouped by source in increasing order, as the loader does not sort
//! them. Empty lines are skipped.
//!
//! In _limited_ mode (see [`GraphLoader::limit`]) the number of nodes is the
//! given limit, arcs with an endpoint beyond the limit are discarded, and the
//! number of arcs is recomputed from the retained ones. The two header lines
//! are skipped without being parsed.

use crate::graphs::csr_graph::CsrGraph;
use crate::traits::RandomAccessGraph;
use crate::{Error, Result};
use dsi_progress_logger::{ProgressLog, no_logging};
use itertools::Itertools;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// The extension stripped from graph files to obtain their base name.
pub const GRAPH_EXTENSION: &str = ".dat_reduce";

/// A builder loading a [`CsrGraph`] from a text file.
///
/// # Examples
///
/// ```no_run
/// use rgm::prelude::*;
///
/// let graph = CsrGraph::with_path("wiki.dat_reduce").limit(Some(1000)).load()?;
/// # Ok::<(), rgm::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct GraphLoader {
    path: PathBuf,
    limit: Option<usize>,
}

impl GraphLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            limit: None,
        }
    }

    /// Sets the node-identifier ceiling of limited mode, or disables limited
    /// mode if `None`.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the path of the graph file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the base name of the graph, that is, its file name without the
    /// [`GRAPH_EXTENSION`].
    pub fn base_name(&self) -> String {
        crate::utils::base_name(&self.path, GRAPH_EXTENSION)
    }

    /// Loads the graph.
    pub fn load(&self) -> Result<CsrGraph> {
        self.load_with_logging(no_logging![])
    }

    /// Loads the graph, logging progress on lines with the given
    /// [`ProgressLog`].
    pub fn load_with_logging(&self, pl: &mut impl ProgressLog) -> Result<CsrGraph> {
        let file = File::open(&self.path).map_err(|e| Error::io(&self.path, e))?;
        self.read(BufReader::new(file), pl)
    }

    /// Parses a graph from a reader; errors refer to the path of this loader.
    pub fn read(&self, reader: impl BufRead, pl: &mut impl ProgressLog) -> Result<CsrGraph> {
        let mut lines = reader.lines().enumerate();

        let (num_nodes, expected_arcs) = match self.limit {
            Some(limit) => {
                // The header is skipped unparsed
                for (_, line) in lines.by_ref().take(2) {
                    line.map_err(|e| Error::io(&self.path, e))?;
                }
                log::info!("Limiting the graph to nodes 1 . . {limit}");
                (limit, None)
            }
            None => {
                let num_nodes = self.header(&mut lines, "number of nodes")?;
                let num_arcs = self.header(&mut lines, "number of arcs")?;
                (num_nodes, Some(num_arcs))
            }
        };

        let mut arcs = Vec::with_capacity(expected_arcs.unwrap_or(0));
        let mut sep = ' ';

        pl.item_name("line");
        pl.expected_updates(expected_arcs);
        pl.start(format!("Reading arcs from {}...", self.path.display()));

        for (line_num, line) in lines {
            let line = line.map_err(|e| Error::io(&self.path, e))?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }

            // Space-separated unless proven otherwise; once we switch to TABs
            // we never switch back
            let mut pair = line.split(sep).collect_tuple::<(&str, &str)>();
            if pair.is_none() {
                sep = '\t';
                pair = line.split(sep).collect_tuple();
            }
            let Some((src, dst)) = pair else {
                return Err(self.error(
                    line_num,
                    format!("Expected two node identifiers, got {line:?}"),
                ));
            };
            let src = self.node_id(line_num, src)?;
            let dst = self.node_id(line_num, dst)?;

            match self.limit {
                Some(limit) => {
                    if src > limit || dst > limit {
                        pl.light_update();
                        continue;
                    }
                }
                None => {
                    if src > num_nodes || dst > num_nodes {
                        return Err(self.error(
                            line_num,
                            format!("Arc {src} → {dst} refers to a node beyond {num_nodes}"),
                        ));
                    }
                }
            }
            if let Some(&(last_src, _)) = arcs.last() {
                if src - 1 < last_src {
                    return Err(self.error(
                        line_num,
                        format!(
                            "Arcs are not grouped by increasing source: {src} follows {}",
                            last_src + 1
                        ),
                    ));
                }
            }
            arcs.push((src - 1, dst - 1));
            pl.light_update();
        }
        pl.done();

        if let Some(expected_arcs) = expected_arcs {
            if arcs.len() != expected_arcs {
                return Err(Error::structural_at(
                    &self.path,
                    None,
                    format!(
                        "The header declares {expected_arcs} arcs, but {} were read",
                        arcs.len()
                    ),
                ));
            }
        }

        let graph = CsrGraph::from_arcs(num_nodes, arcs)
            .map_err(|e| Error::structural_at(&self.path, None, e.to_string()))?;

        log::info!("Read network size: {} nodes", graph.num_nodes());
        log::info!("Read network arcs: {} arcs", graph.num_arcs());
        log::info!(
            "Read network dangling nodes: {} nodes",
            graph.dangling_nodes().len()
        );

        Ok(graph)
    }

    fn header<I>(&self, lines: &mut I, what: &str) -> Result<usize>
    where
        I: Iterator<Item = (usize, std::io::Result<String>)>,
    {
        let Some((line_num, line)) = lines.next() else {
            return Err(Error::structural_at(
                &self.path,
                None,
                format!("Missing header line with the {what}"),
            ));
        };
        let line = line.map_err(|e| Error::io(&self.path, e))?;
        line.trim().parse().map_err(|e| {
            self.error(line_num, format!("Could not parse the {what} {line:?}: {e}"))
        })
    }

    /// Parses a 1-based node identifier.
    fn node_id(&self, line_num: usize, token: &str) -> Result<usize> {
        match token.trim().parse::<usize>() {
            Ok(0) => Err(self.error(line_num, "Node identifiers start from 1")),
            Ok(id) => Ok(id),
            Err(e) => Err(self.error(
                line_num,
                format!("Could not parse node {token:?}: {e}"),
            )),
        }
    }

    fn error(&self, line_num: usize, msg: impl Into<String>) -> Error {
        Error::structural_at(&self.path, Some(line_num + 1), msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str, limit: Option<usize>) -> Result<CsrGraph> {
        GraphLoader::new("test.dat_reduce")
            .limit(limit)
            .read(Cursor::new(text), no_logging![])
    }

    #[test]
    fn test_cycle() -> anyhow::Result<()> {
        let g = parse("4\n4\n1 2\n2 3\n3 4\n4 1\n", None)?;
        assert_eq!(g.first_pos(), &[0, 1, 2, 3, 4]);
        assert_eq!(g.outdegrees(), &[1, 1, 1, 1]);
        assert!(g.dangling_nodes().is_empty());
        Ok(())
    }

    #[test]
    fn test_tabs_and_blank_lines() -> anyhow::Result<()> {
        let g = parse("3\r\n2\r\n1\t2\r\n\r\n2\t3\r\n", None)?;
        assert_eq!(g.successors(0), &[1]);
        assert_eq!(g.successors(1), &[2]);
        assert_eq!(g.dangling_nodes(), &[2]);
        Ok(())
    }

    #[test]
    fn test_arc_count_mismatch() {
        let err = parse("3\n3\n1 2\n2 3\n", None).unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
    }

    #[test]
    fn test_bad_header() {
        let err = parse("three\n2\n1 2\n2 3\n", None).unwrap_err();
        assert!(matches!(err, Error::Structural { line: Some(1), .. }));
        assert!(parse("3\n", None).is_err());
    }

    #[test]
    fn test_bad_lines() {
        assert!(matches!(
            parse("3\n1\n1 2 3\n", None).unwrap_err(),
            Error::Structural { line: Some(3), .. }
        ));
        assert!(parse("3\n1\n0 2\n", None).is_err());
        assert!(parse("3\n1\n1 4\n", None).is_err());
        assert!(parse("3\n2\n2 1\n1 3\n", None).is_err());
    }

    #[test]
    fn test_limited() -> anyhow::Result<()> {
        // The header is ignored in limited mode
        let g = parse("5\n100\n1 2\n1 5\n2 3\n4 1\n5 2\n", Some(3))?;
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_arcs(), 2);
        assert_eq!(g.successors(0), &[1]);
        assert_eq!(g.successors(1), &[2]);
        assert_eq!(g.dangling_nodes(), &[2]);
        Ok(())
    }

    #[test]
    fn test_limited_unparsed_header() -> anyhow::Result<()> {
        let g = parse("many\n?\n1 2\n2 1\n", Some(2))?;
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.num_arcs(), 2);
        assert!(parse("many\n?\n1 2\n", None).is_err());
        Ok(())
    }

    #[test]
    fn test_base_name() {
        assert_eq!(GraphLoader::new("/data/wiki.dat_reduce").base_name(), "wiki");
        assert_eq!(GraphLoader::new("wiki.txt").base_name(), "wiki.txt");
    }
}
