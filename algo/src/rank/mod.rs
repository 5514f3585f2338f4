/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Ranking by power iteration on the Google matrix.

pub mod eigenpair;
pub mod pagerank;

pub use eigenpair::{EigenPair, EigenPairOptions};
pub use pagerank::{Convergence, Direction, ProjectedPageRank, StopReason, preds};

/// The default reset probability.
pub const DEFAULT_ALPHA: f64 = 0.15;

/// The default number of iterations between two convergence checks.
pub const DEFAULT_CHECK_INTERVAL: usize = 10;

/// The target precision of all iterative methods.
pub const EPS: f64 = 1E-13;

/// Returns the maximum number of iterations for reset probability `alpha`.
///
/// This is twice the number of iterations after which the teleportation term
/// alone would shrink an error by a factor of [`EPS`].
pub fn max_iter(alpha: f64) -> usize {
    (-EPS.ln() / (alpha + 3E-7)).floor() as usize * 2
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_max_iter() {
        assert_eq!(super::max_iter(0.15), 398);
        assert_eq!(super::max_iter(0.5), 118);
    }
}
