/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

/// Errors raised while building or loading graphs and node subsets, or when
/// combining objects of incompatible sizes.
///
/// All variants are fatal for a run: iterative methods that do not converge
/// never return an error, but rather report their final state.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Two objects that must agree on a size do not.
    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    Dimension {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Malformed graph, node-subset or offset data.
    #[error("{}: {msg}", location(path, line))]
    Structural {
        path: Option<PathBuf>,
        /// The 1-based line number, if the error refers to a line.
        line: Option<usize>,
        msg: String,
    },

    /// An input file could not be opened or read.
    #[error("Could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        Error::Structural {
            path: None,
            line: None,
            msg: msg.into(),
        }
    }

    pub(crate) fn structural_at(
        path: &std::path::Path,
        line: Option<usize>,
        msg: impl Into<String>,
    ) -> Self {
        Error::Structural {
            path: Some(path.to_owned()),
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_owned(),
            source,
        }
    }
}

fn location(path: &Option<PathBuf>, line: &Option<usize>) -> String {
    let mut location = match path {
        Some(path) => path.display().to_string(),
        None => "<memory>".to_string(),
    };
    if let Some(line) = line {
        location.push_str(&format!(":{line}"));
    }
    location
}

pub type Result<T> = std::result::Result<T, Error>;
