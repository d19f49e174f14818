// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ralph --help` and `ralph --version` print usage without touching
//! any state directory.

use crate::prelude::ralph_cli;
use tempfile::tempdir;

#[test]
fn help_lists_every_top_level_subcommand() {
    let dir = tempdir().expect("tempdir");
    let assert = ralph_cli(dir.path()).arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    for name in ["project", "issue", "status"] {
        assert!(stdout.contains(name), "--help output missing `{name}`:\n{stdout}");
    }
}

#[test]
fn version_reports_the_crate_version() {
    let dir = tempdir().expect("tempdir");
    ralph_cli(dir.path()).arg("--version").assert().success();
}
