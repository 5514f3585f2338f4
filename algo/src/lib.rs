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

pub mod google;
pub mod rank;
pub mod reduced;
pub mod utils;

pub mod prelude {
    pub use crate::google::GoogleMatrix;
    pub use crate::rank::pagerank::preds;
    pub use crate::rank::{
        Convergence, Direction, EigenPair, EigenPairOptions, ProjectedPageRank, StopReason,
    };
    pub use crate::reduced::{ColumnReport, ReducedGoogleMatrix, ReducedMatrices};
    pub use crate::utils::StopSignal;
}
