/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Miscellaneous utilities.

use std::path::Path;

mod matrix;
pub use matrix::*;

mod node_subset;
pub use node_subset::*;

/// Returns the file name of `path` with `suffix` removed, if present.
///
/// If `path` has no file name, the whole path is returned.
pub fn base_name(path: impl AsRef<Path>, suffix: &str) -> String {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    match name.strip_suffix(suffix) {
        Some(stripped) if !stripped.is_empty() => stripped.to_owned(),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/countries.nodes", ".nodes"), "countries");
        assert_eq!(base_name("countries", ".nodes"), "countries");
        assert_eq!(base_name(".nodes", ".nodes"), ".nodes");
        assert_eq!(base_name("x.nodes.txt", ".nodes"), "x.nodes.txt");
    }
}
