/*
 * SPDX-FileCopyrightText: 2026 The rgm authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let built_rs: PathBuf = [out_dir.as_str(), "built.rs"].iter().collect();
    let mut file = OpenOptions::new()
        .append(true)
        .open(&built_rs)
        .expect("Could not reopen built.rs");
    writeln!(
        file,
        "#[allow(dead_code)]\npub const BUILD_DATE: &str = \"{}\";",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .expect("Could not append the build date");
}
