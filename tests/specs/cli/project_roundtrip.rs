// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ralph project add` followed by `ralph project list` round-trips a
//! project through the same durable store `ralphd` reads.

use crate::prelude::ralph_cli;
use tempfile::tempdir;

#[test]
fn a_registered_project_shows_up_in_the_listing() {
    let dir = tempdir().expect("tempdir");

    ralph_cli(dir.path())
        .args([
            "project",
            "add",
            "--name",
            "widgets",
            "--checkout-root",
            "/tmp/widgets",
            "--repo-owner",
            "acme",
            "--repo-name",
            "widgets",
            "--tracker-team",
            "ENG",
            "--tracker-assignee",
            "ralph-bot",
        ])
        .assert()
        .success();

    let assert = ralph_cli(dir.path()).args(["project", "list"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("widgets"));
    assert!(stdout.contains("acme/widgets"));
}

#[test]
fn listing_an_empty_store_says_so() {
    let dir = tempdir().expect("tempdir");
    let assert = ralph_cli(dir.path()).args(["project", "list"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("no registered projects"));
}
