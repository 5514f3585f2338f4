/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Random access to the structure of a static directed graph.
//!
//! The stochastic operators built on top of a graph need, for each node, its
//! outdegree and its successors, and, globally, the list of _dangling_ nodes
//! (nodes without successors), whose mass must be redistributed rather than
//! lost. [`RandomAccessGraph`] exposes exactly this information.

use impl_tools::autoimpl;
use std::rc::Rc;
use std::sync::Arc;

/// A static directed graph with random access to successor lists.
///
/// Nodes are identified by integers in [0 . . [`num_nodes`]). Implementations
/// must be immutable: the same node must always return the same successors.
///
/// [`num_nodes`]: RandomAccessGraph::num_nodes
#[autoimpl(for<S: trait + ?Sized> &S, &mut S, Rc<S>, Arc<S>)]
pub trait RandomAccessGraph {
    /// Returns the number of nodes in the graph.
    fn num_nodes(&self) -> usize;

    /// Returns the number of arcs in the graph.
    fn num_arcs(&self) -> usize;

    /// Returns the outdegree of a node.
    fn outdegree(&self, node: usize) -> usize;

    /// Returns the successors of a node, in the order in which they were
    /// provided at construction time.
    fn successors(&self, node: usize) -> &[usize];

    /// Returns the nodes with no successors, in increasing order.
    fn dangling_nodes(&self) -> &[usize];

    /// Returns true if the graph has at least one dangling node.
    fn has_dangling_nodes(&self) -> bool {
        !self.dangling_nodes().is_empty()
    }
}

/// Checks that two graphs have the same nodes and the same successor lists.
///
/// Successor lists are compared as sequences, so the order of successors
/// matters.
pub fn eq<G0: RandomAccessGraph + ?Sized, G1: RandomAccessGraph + ?Sized>(
    g0: &G0,
    g1: &G1,
) -> bool {
    if g0.num_nodes() != g1.num_nodes() || g0.num_arcs() != g1.num_arcs() {
        return false;
    }
    (0..g0.num_nodes()).all(|node| g0.successors(node) == g1.successors(node))
}
