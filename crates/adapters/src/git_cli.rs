// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess-backed [`GitOps`]: shells out to the `git` binary found on
//! `PATH`. Every call runs with `workdir` as the process's working
//! directory; stderr is folded into the returned [`GitError`] message so
//! [`GitError::is_nothing_to_commit`] can pattern-match on it.

use crate::git_ops::{GitError, GitOps};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

pub struct GitCliOps;

impl GitCliOps {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, workdir: &Path, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(workdir)
            .output()
            .await
            .map_err(|err| GitError::Failed(format!("failed to spawn git {args:?}: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output.status.code().unwrap_or(-1);
            return Err(GitError::Failed(format!(
                "git {args:?} exited with code {code}: {}",
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for GitCliOps {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitOps for GitCliOps {
    async fn commit(&self, workdir: &Path, message: &str) -> Result<(), GitError> {
        self.run(workdir, &["add", "-A"]).await?;
        self.run(workdir, &["commit", "-m", message]).await?;
        Ok(())
    }

    async fn push_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError> {
        self.run(workdir, &["push", "origin", branch]).await?;
        Ok(())
    }

    async fn head_sha(&self, workdir: &Path) -> Result<String, GitError> {
        self.run(workdir, &["rev-parse", "HEAD"]).await
    }

    async fn pull_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError> {
        self.run(workdir, &["pull", "origin", branch]).await?;
        Ok(())
    }
}
