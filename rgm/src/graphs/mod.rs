/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph implementations.

pub mod csr_graph;
pub mod load;

pub mod prelude {
    pub use super::csr_graph::CsrGraph;
    pub use super::load::GraphLoader;
}
