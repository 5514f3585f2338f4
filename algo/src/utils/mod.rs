/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Utilities.

mod stop;
pub use stop::StopSignal;

/// Module containing dense-vector kernels.
pub mod math {
    pub use super::vectors::*;
}

mod vectors;
