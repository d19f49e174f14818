// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fix-checks action: `fixing_checks → in_review`. Re-enters the
//! worktree, feeds the agent truncated failure logs, commits, pushes,
//! and bumps the check-fix cursor regardless of outcome. Once the
//! attempt cap is reached it returns [`ActionError::LoopExhausted`]
//! instead of running another round; pausing the issue itself is the
//! engine loop's job, not this action's — an action never touches
//! `issue.state`.

use super::{from_agent, from_code_host};
use crate::deps::ActionDeps;
use crate::event_log::EventLogHandler;
use crate::prompts::{render_fix_checks_prompt, truncate_log};
use async_trait::async_trait;
use ralph_core::{ActionError, Issue, Store, TransitionAction};
use std::sync::Arc;

const FIX_CHECKS_MAX_TURNS: u32 = 30;

pub struct FixChecksAction {
    deps: Arc<ActionDeps>,
}

impl FixChecksAction {
    pub fn new(deps: Arc<ActionDeps>) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl TransitionAction for FixChecksAction {
    async fn run(&self, issue: &Issue, store: &dyn Store) -> Result<(), ActionError> {
        if issue.cursors.check_fix_attempts >= self.deps.max_fix_attempts {
            return self.give_up(issue, store, issue.cursors.check_fix_attempts).await;
        }

        let project = store.get_project(&issue.project_id).await?;
        let config = self.deps.config.load(&project).await.map_err(super::from_config)?;
        let pr_number = issue
            .pr_number
            .ok_or_else(|| ActionError::PermanentRemote("issue has no open pull request".into()))?;

        let owner = &project.repo_owner;
        let repo = &project.repo_name;
        let pr = self.deps.code_host.fetch_pr(owner, repo, pr_number).await.map_err(from_code_host)?;

        let workdir = project.checkout_root.join(&issue.workspace_name);
        self.deps
            .git
            .pull_branch(&workdir, &issue.branch_name)
            .await
            .map_err(|err| ActionError::Transient(err.to_string()))?;

        let runs = self.deps.code_host.fetch_check_runs(owner, repo, &pr.head_sha).await.map_err(from_code_host)?;
        let mut failed = Vec::new();
        for run in runs.iter().filter(|r| r.has_failed()) {
            let log_bytes =
                self.deps.code_host.fetch_check_run_log(owner, repo, run.id).await.map_err(from_code_host)?;
            let log = truncate_log(&String::from_utf8_lossy(&log_bytes));
            let conclusion = format!("{:?}", run.conclusion);
            failed.push((run.name.clone(), conclusion, log));
        }

        let prompt = render_fix_checks_prompt(issue, &failed, &config);
        let handler =
            EventLogHandler::new(issue.id, store, self.deps.clock.clone(), self.deps.on_build_event.clone());
        self.deps
            .agent
            .invoke_with_events(&prompt, &workdir, FIX_CHECKS_MAX_TURNS, &handler)
            .await
            .map_err(from_agent)?;

        let committed = match self.deps.git.commit(&workdir, &format!("Fix checks for {}", issue.human_id)).await {
            Ok(()) => true,
            Err(err) if err.is_nothing_to_commit() => false,
            Err(err) => return Err(ActionError::Transient(err.to_string())),
        };
        if committed {
            self.deps
                .git
                .push_branch(&workdir, &issue.branch_name)
                .await
                .map_err(|err| ActionError::Transient(err.to_string()))?;
        }

        let attempts = issue.cursors.check_fix_attempts + 1;
        let mut updated = issue.clone();
        updated.cursors.check_fix_attempts = attempts;
        updated.cursors.last_check_sha = pr.head_sha;
        updated.touch(self.deps.clock.now());
        store.update_issue(updated).await?;

        if attempts >= self.deps.max_fix_attempts {
            self.request_help(issue, store, &project, pr_number, attempts).await?;
            return Err(ActionError::LoopExhausted { attempts });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "fix_checks"
    }
}

impl FixChecksAction {
    /// Cursor fields are already at or past the cap when this runs (a
    /// stray re-dispatch after the issue should already be `paused`).
    /// Request help again and report exhaustion without touching a
    /// worktree.
    async fn give_up(&self, issue: &Issue, store: &dyn Store, attempts: u32) -> Result<(), ActionError> {
        let project = store.get_project(&issue.project_id).await?;
        if let Some(pr_number) = issue.pr_number {
            self.request_help(issue, store, &project, pr_number, attempts).await?;
        }
        Err(ActionError::LoopExhausted { attempts })
    }

    /// Posts a best-effort "needs a human" PR comment and logs a
    /// `checks_paused` row. Failure to post is logged, not propagated —
    /// the loop-exhaustion outcome must not be blocked by it.
    async fn request_help(
        &self,
        issue: &Issue,
        store: &dyn Store,
        project: &ralph_core::Project,
        pr_number: u64,
        attempts: u32,
    ) -> Result<(), ActionError> {
        let body = format!(
            "Ralph has attempted to fix failing checks on this PR {attempts} times without success and needs a human to take a look."
        );
        if let Err(err) =
            self.deps.code_host.post_pr_comment(&project.repo_owner, &project.repo_name, pr_number, &body).await
        {
            tracing::warn!(issue_id = %issue.id, error = %err, "failed to post check-fix help request");
        }

        let entry = ralph_core::ActivityLogEntry::new(
            issue.id,
            ralph_core::EventType::ChecksPaused,
            format!("paused after {attempts} failed check-fix attempts"),
            self.deps.clock.now(),
        );
        store.append_activity(entry).await?;
        Ok(())
    }
}
