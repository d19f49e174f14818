// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git-ops interface: the handful of git subprocess calls every action
//! that touches a worktree needs.

use async_trait::async_trait;
use ralph_core::is_benign_nothing_to_commit;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("{0}")]
    Failed(String),
}

impl GitError {
    /// True when this failure is the git wrapper's "nothing to commit"
    /// outcome (see [`ralph_core::is_benign_nothing_to_commit`] for the
    /// exact, deliberately over-broad match).
    pub fn is_nothing_to_commit(&self) -> bool {
        match self {
            GitError::Failed(message) => is_benign_nothing_to_commit(message),
        }
    }
}

#[async_trait]
pub trait GitOps: Send + Sync {
    async fn commit(&self, workdir: &Path, message: &str) -> Result<(), GitError>;
    async fn push_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError>;
    async fn head_sha(&self, workdir: &Path) -> Result<String, GitError>;
    async fn pull_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_to_commit_is_recognized_from_git_porcelain_message() {
        let err = GitError::Failed("nothing to commit, working tree clean".into());
        assert!(err.is_nothing_to_commit());
    }

    #[test]
    fn generic_exit_code_one_is_also_treated_as_benign() {
        let err = GitError::Failed("git commit exited with code 1".into());
        assert!(err.is_nothing_to_commit());
    }

    #[test]
    fn real_failures_are_not_swallowed() {
        let err = GitError::Failed("fatal: unable to access remote".into());
        assert!(!err.is_nothing_to_commit());
    }
}
