/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::load::GraphLoader;
use crate::traits::RandomAccessGraph;
use crate::{Error, Result};
use std::path::Path;

/// A compressed sparse-row graph.
///
/// The graph stores the degree-cumulative function (here called `first_pos`,
/// as the position of the first successor of each node) and the successors
/// of all nodes, grouped by source in increasing order: the successors of
/// node *i* are `successors[first_pos[i]..first_pos[i + 1]]`. The outdegrees
/// and the sorted list of dangling nodes are computed once at construction
/// time, as the stochastic operators read them at every multiplication.
///
/// A `CsrGraph` is immutable: it is built once, either from a list of arcs
/// (see [`from_arcs`](Self::from_arcs)) or from a file (see
/// [`with_path`](Self::with_path)), and then only read.
///
/// # Examples
///
/// ```
/// use rgm::prelude::*;
///
/// // 0 → 1, 1 → 2; node 2 is dangling
/// let g = CsrGraph::from_arcs(3, [(0, 1), (1, 2)])?;
/// assert_eq!(g.first_pos(), &[0, 1, 2, 2]);
/// assert_eq!(g.outdegrees(), &[1, 1, 0]);
/// assert_eq!(g.dangling_nodes(), &[2]);
/// # Ok::<(), rgm::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CsrGraph {
    first_pos: Box<[usize]>,
    successors: Box<[usize]>,
    outdegrees: Box<[usize]>,
    dangling: Box<[usize]>,
}

impl core::default::Default for CsrGraph {
    fn default() -> Self {
        Self {
            first_pos: vec![0].into(),
            successors: vec![].into(),
            outdegrees: vec![].into(),
            dangling: vec![].into(),
        }
    }
}

impl CsrGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a [loader](GraphLoader) for the graph stored in the text file
    /// at `path`.
    pub fn with_path(path: impl AsRef<Path>) -> GraphLoader {
        GraphLoader::new(path)
    }

    /// Creates a graph with `num_nodes` nodes from a list of 0-based arcs.
    ///
    /// Arcs must be grouped by source in increasing order (the order of the
    /// successors of a single node is preserved, but it is not required to be
    /// sorted). Nodes that do not appear as sources are dangling.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Structural`] if an endpoint is not smaller than
    /// `num_nodes` or if sources are not grouped in increasing order.
    pub fn from_arcs(
        num_nodes: usize,
        arcs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self> {
        let arcs = arcs.into_iter();
        let mut first_pos = Vec::with_capacity(num_nodes + 1);
        first_pos.push(0);
        let mut successors = Vec::with_capacity(arcs.size_hint().0);

        let mut last_src = 0;
        for (src, dst) in arcs {
            if src >= num_nodes || dst >= num_nodes {
                return Err(Error::structural(format!(
                    "Arc ({src}, {dst}) has an endpoint outside of [0 . . {num_nodes})"
                )));
            }
            if src < last_src {
                return Err(Error::structural(format!(
                    "Arcs are not grouped by increasing source: {src} follows {last_src}"
                )));
            }
            // Fill the gaps left by nodes without successors
            while last_src < src {
                first_pos.push(successors.len());
                last_src += 1;
            }
            successors.push(dst);
        }
        while first_pos.len() <= num_nodes {
            first_pos.push(successors.len());
        }

        Ok(Self::complete(first_pos.into(), successors.into()))
    }

    /// Creates a graph from its degree-cumulative function and its successors.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::Structural`] if `first_pos` is empty, does not start
    /// at zero, is not monotone, does not end at the number of successors, or
    /// if a successor is not a node of the graph.
    pub fn from_parts(first_pos: Box<[usize]>, successors: Box<[usize]>) -> Result<Self> {
        let Some((&first, &last)) = first_pos.first().zip(first_pos.last()) else {
            return Err(Error::structural("The offset array is empty"));
        };
        if first != 0 {
            return Err(Error::structural(format!(
                "The offset array starts at {first} instead of 0"
            )));
        }
        if last != successors.len() {
            return Err(Error::structural(format!(
                "The offset array ends at {last}, but there are {} successors",
                successors.len()
            )));
        }
        if let Some(i) = first_pos.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::structural(format!(
                "The offset array decreases at position {}",
                i + 1
            )));
        }
        let num_nodes = first_pos.len() - 1;
        if let Some(&succ) = successors.iter().find(|&&succ| succ >= num_nodes) {
            return Err(Error::structural(format!(
                "Successor {succ} is outside of [0 . . {num_nodes})"
            )));
        }
        Ok(Self::complete(first_pos, successors))
    }

    /// Computes outdegrees and dangling nodes from a coherent pair of
    /// offsets and successors.
    fn complete(first_pos: Box<[usize]>, successors: Box<[usize]>) -> Self {
        let outdegrees: Box<[usize]> = first_pos.windows(2).map(|w| w[1] - w[0]).collect();
        let dangling: Box<[usize]> = outdegrees
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(node, _)| node)
            .collect();
        Self {
            first_pos,
            successors,
            outdegrees,
            dangling,
        }
    }

    /// Returns the degree-cumulative function: `first_pos()[i]` is the
    /// position of the first successor of node `i`, and the last entry is the
    /// number of arcs.
    pub fn first_pos(&self) -> &[usize] {
        &self.first_pos
    }

    /// Returns the successors of all nodes, grouped by source.
    pub fn successors_array(&self) -> &[usize] {
        &self.successors
    }

    /// Returns the outdegrees of all nodes.
    pub fn outdegrees(&self) -> &[usize] {
        &self.outdegrees
    }

    pub fn into_inner(self) -> (Box<[usize]>, Box<[usize]>) {
        (self.first_pos, self.successors)
    }
}

impl RandomAccessGraph for CsrGraph {
    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.first_pos.len() - 1
    }

    #[inline(always)]
    fn num_arcs(&self) -> usize {
        self.successors.len()
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.outdegrees[node]
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> &[usize] {
        &self.successors[self.first_pos[node]..self.first_pos[node + 1]]
    }

    #[inline(always)]
    fn dangling_nodes(&self) -> &[usize] {
        &self.dangling
    }
}
