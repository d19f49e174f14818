// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

/// State directory: RALPH_STATE_DIR > XDG_STATE_HOME/ralph > ~/.local/state/ralph
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RALPH_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("ralph");
    }
    dirs::state_dir().unwrap_or_else(|| PathBuf::from(".")).join("ralph")
}

/// Path to the tracker file consumed by [`ralph_adapters::FileIssueTrackerClient`].
pub fn tracker_file() -> PathBuf {
    std::env::var("RALPH_TRACKER_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join("tracker.json"))
}

/// Agent command to exec for each invocation, plus any fixed leading args.
pub fn agent_command() -> (String, Vec<String>) {
    let command = std::env::var("RALPH_AGENT_COMMAND").unwrap_or_else(|_| "ralph-agent".to_string());
    let args = std::env::var("RALPH_AGENT_ARGS")
        .ok()
        .map(|raw| raw.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    (command, args)
}

/// GitHub token for the code-host client.
pub fn github_token() -> Result<String, std::env::VarError> {
    std::env::var("GITHUB_TOKEN")
}

/// How often each project is reconciled.
pub fn tick_interval() -> Duration {
    std::env::var("RALPH_TICK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(10))
}

/// How often the store's WAL is checkpointed into a fresh snapshot.
pub fn checkpoint_interval() -> Duration {
    std::env::var("RALPH_CHECKPOINT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(300))
}
