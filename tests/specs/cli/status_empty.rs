// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ralph status` against a freshly initialized state directory reports
//! no registered projects instead of erroring.

use crate::prelude::ralph_cli;
use tempfile::tempdir;

#[test]
fn status_on_an_empty_store_says_so() {
    let dir = tempdir().expect("tempdir");
    let assert = ralph_cli(dir.path()).arg("status").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("no registered projects"));
}

#[test]
fn status_as_json_on_an_empty_store_is_an_empty_array() {
    let dir = tempdir().expect("tempdir");
    let assert = ralph_cli(dir.path()).args(["--format", "json", "status"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).expect("valid json");
    assert_eq!(parsed, serde_json::json!([]));
}
