/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Deref;
use std::path::Path;

/// The extension stripped from node-subset files to obtain their base name.
pub const NODES_EXTENSION: &str = ".nodes";

/// An ordered list of distinguished nodes.
///
/// The position of a node in the list is the row/column index used for it in
/// all matrices restricted to the subset. Identifiers are 0-based; use
/// [`check`](NodeSubset::check) to verify them against a graph.
///
/// A node-subset file contains the number of nodes on the first line and
/// then one node identifier per non-empty line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeSubset {
    nodes: Box<[usize]>,
}

impl NodeSubset {
    pub fn new(nodes: impl Into<Box<[usize]>>) -> Self {
        Self {
            nodes: nodes.into(),
        }
    }

    /// Returns an empty subset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a subset from a node-subset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let subset = Self::read(BufReader::new(file), path)?;
        log::info!("Read {} distinguished nodes from {}", subset.len(), path.display());
        Ok(subset)
    }

    /// Parses a subset from a reader; errors refer to `path`.
    pub fn read(reader: impl BufRead, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut lines = reader.lines().enumerate();

        let len = match lines.next() {
            Some((_, line)) => {
                let line = line.map_err(|e| Error::io(path, e))?;
                line.trim().parse::<usize>().map_err(|e| {
                    Error::structural_at(
                        path,
                        Some(1),
                        format!("Could not parse the number of nodes {line:?}: {e}"),
                    )
                })?
            }
            None => {
                return Err(Error::structural_at(path, None, "Empty node-subset file"));
            }
        };

        let mut nodes = Vec::with_capacity(len);
        for (line_num, line) in lines {
            let line = line.map_err(|e| Error::io(path, e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if nodes.len() == len {
                log::warn!(
                    "{}:{}: ignoring nodes beyond the declared {len}",
                    path.display(),
                    line_num + 1
                );
                break;
            }
            let node = line.parse::<usize>().map_err(|e| {
                Error::structural_at(
                    path,
                    Some(line_num + 1),
                    format!("Could not parse node {line:?}: {e}"),
                )
            })?;
            nodes.push(node);
        }

        if nodes.len() < len {
            return Err(Error::structural_at(
                path,
                None,
                format!("Expected {len} nodes, but only {} were found", nodes.len()),
            ));
        }
        Ok(Self::new(nodes))
    }

    /// Checks that all nodes are smaller than `num_nodes`.
    ///
    /// Duplicate nodes are accepted, but logged.
    pub fn check(&self, num_nodes: usize) -> Result<()> {
        if let Some(&node) = self.nodes.iter().find(|&&node| node >= num_nodes) {
            return Err(Error::Dimension {
                what: "distinguished node identifier",
                expected: num_nodes,
                got: node,
            });
        }
        let mut seen = vec![false; num_nodes];
        for &node in self.nodes.iter() {
            if std::mem::replace(&mut seen[node], true) {
                log::warn!("Node {node} appears more than once in the subset");
            }
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.nodes
    }
}

impl Deref for NodeSubset {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.nodes
    }
}

impl From<Vec<usize>> for NodeSubset {
    fn from(nodes: Vec<usize>) -> Self {
        Self::new(nodes)
    }
}

/// Loads node names, one per non-empty line.
///
/// Names are only used to annotate output.
pub fn load_node_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut names = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let line = line.trim_end();
        if !line.is_empty() {
            names.push(line.to_owned());
        }
    }
    log::info!("Read {} node names from {}", names.len(), path.display());
    Ok(names)
}
