// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Code-host poller: reconciles every watched issue against the live PR,
//! its check runs, and its reviews, nudging issues between states. See
//! the module-level ordering rule: merge beats checks beats reviews.

use ralph_adapters::{CodeHostClient, TimelineEventKind};
use ralph_core::{
    ActivityLogEntry, Clock, EventType, Issue, IssueState, Project, Store, Transition,
    TransitionAction, TransitionRegistry,
};
use ralph_engine::actions::complete::CompleteAction;
use ralph_engine::actions::NoopAction;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct CodeHostPoller {
    code_host: Arc<dyn CodeHostClient>,
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    complete_action: Arc<CompleteAction>,
}

impl CodeHostPoller {
    pub fn new(
        code_host: Arc<dyn CodeHostClient>,
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        complete_action: Arc<CompleteAction>,
    ) -> Self {
        Self { code_host, store, clock, complete_action }
    }

    /// Reconciles every watched issue of `project` against live code-host
    /// state. Errors fetching any single issue's data are logged and that
    /// issue is skipped this tick — never fatal to the tick itself.
    pub async fn tick_project(&self, project: &Project, cancel: &CancellationToken) {
        let watched: Vec<IssueState> =
            IssueState::ALL.into_iter().filter(|s| s.is_watched_by_code_host_poller()).collect();
        let issues = match self.store.list_issues(&project.id, &watched).await {
            Ok(issues) => issues,
            Err(err) => {
                tracing::warn!(project = %project.name, error = %err, "failed to list watched issues");
                return;
            }
        };

        for issue in issues {
            if cancel.is_cancelled() {
                return;
            }
            if let Err(err) = self.tick_issue(project, &issue).await {
                tracing::warn!(issue_id = %issue.id, error = %err, "code-host poller skipped issue this tick");
            }
        }
    }

    async fn tick_issue(&self, project: &Project, issue: &Issue) -> Result<(), CodeHostPollerError> {
        let Some(pr_number) = issue.pr_number else {
            return Ok(());
        };
        let owner = &project.repo_owner;
        let repo = &project.repo_name;

        if self.code_host.is_pr_merged(owner, repo, pr_number).await? {
            self.complete(issue).await;
            return Ok(());
        }

        if issue.state == IssueState::Failed {
            return Ok(());
        }

        let pr = self.code_host.fetch_pr(owner, repo, pr_number).await?;
        let sha_changed = pr.head_sha != issue.cursors.last_check_sha;
        if sha_changed && issue.state != IssueState::FixingChecks {
            let mut reset = issue.clone();
            reset.cursors.check_fix_attempts = 0;
            reset.touch(self.clock.now());
            self.store.update_issue(reset).await?;
        }

        let runs = self.code_host.fetch_check_runs(owner, repo, &pr.head_sha).await?;
        let all_completed = !runs.is_empty() && runs.iter().all(|r| r.is_completed());
        let has_failed = runs.iter().any(|r| r.has_failed());

        if all_completed {
            let mut with_sha = self.store.get_issue(&issue.id).await?;
            with_sha.cursors.last_check_sha = pr.head_sha.clone();
            with_sha.touch(self.clock.now());
            self.store.update_issue(with_sha).await?;
        }

        if all_completed && has_failed && sha_changed {
            self.fail_checks(issue, &pr.head_sha).await?;
            return Ok(());
        }
        if !all_completed {
            return Ok(());
        }
        if issue.state == IssueState::FixingChecks {
            return Ok(());
        }

        self.evaluate_reviews(project, issue, pr_number).await
    }

    async fn complete(&self, issue: &Issue) {
        let transition = Transition::new(issue.state, IssueState::Completed, self.complete_action.clone());
        match self.execute(&transition, issue, "pull request merged").await {
            Ok(()) => {
                let entry = ActivityLogEntry::new(issue.id, EventType::PrMerged, "pull request merged", self.clock.now());
                if let Err(err) = self.store.append_activity(entry).await {
                    tracing::warn!(issue_id = %issue.id, error = %err, "failed to persist pr_merged activity row");
                }
            }
            Err(err) => {
                tracing::warn!(issue_id = %issue.id, error = %err, "failed to complete merged issue");
            }
        }
    }

    async fn fail_checks(&self, issue: &Issue, sha: &str) -> Result<(), CodeHostPollerError> {
        let action: Arc<dyn TransitionAction> = Arc::new(NoopAction::new("checks_failed"));
        let transition = Transition::new(issue.state, IssueState::FixingChecks, action);
        let detail = format!("check run failed on {sha}");
        self.execute(&transition, issue, &detail).await?;

        let entry = ActivityLogEntry::new(issue.id, EventType::ChecksFailed, detail, self.clock.now());
        self.store.append_activity(entry).await?;
        Ok(())
    }

    async fn evaluate_reviews(
        &self,
        project: &Project,
        issue: &Issue,
        pr_number: u64,
    ) -> Result<(), CodeHostPollerError> {
        let owner = &project.repo_owner;
        let repo = &project.repo_name;
        let reviews = self.code_host.fetch_reviews(owner, repo, pr_number).await?;

        let new_reviews: Vec<_> =
            reviews.into_iter().filter(|r| r.id > issue.cursors.last_review_id).collect();
        if new_reviews.is_empty() {
            return Ok(());
        }
        let new_max_id = new_reviews.iter().map(|r| r.id).max().unwrap_or(issue.cursors.last_review_id);

        let non_bot: Vec<_> =
            new_reviews.into_iter().filter(|r| !ralph_adapters::is_bot_login(&r.user_login)).collect();

        let trust_configured =
            project.trusted_reviewer.username.is_some() || project.trusted_reviewer.user_id.is_some();
        let delegated = if trust_configured {
            self.delegated_trust_set(project, pr_number).await?
        } else {
            HashSet::new()
        };

        let is_actionable = |login: &str| -> bool {
            if !trust_configured {
                return true;
            }
            project.trusted_reviewer.matches_login(login) || delegated.contains(&login.to_ascii_lowercase())
        };

        let mut feedback_triggered = false;
        for review in &non_bot {
            let actionable_state = matches!(
                review.state,
                ralph_adapters::ReviewState::ChangesRequested | ralph_adapters::ReviewState::Commented
            );
            if !actionable_state {
                continue;
            }
            if is_actionable(&review.user_login) {
                feedback_triggered = true;
            } else {
                let entry = ActivityLogEntry::new(
                    issue.id,
                    EventType::UntrustedFeedbackSkipped,
                    format!("{} is not a trusted reviewer", review.user_login),
                    self.clock.now(),
                );
                self.store.append_activity(entry).await?;
            }
        }

        if feedback_triggered {
            let mut bumped = self.store.get_issue(&issue.id).await?;
            bumped.cursors.last_review_id = new_max_id;
            bumped.touch(self.clock.now());
            self.store.update_issue(bumped).await?;

            let action: Arc<dyn TransitionAction> = Arc::new(NoopAction::new("changes_requested"));
            let transition = Transition::new(issue.state, IssueState::AddressingFeedback, action);
            self.execute(&transition, issue, "reviewer requested changes").await?;

            let entry = ActivityLogEntry::new(
                issue.id,
                EventType::ChangesRequested,
                "reviewer requested changes",
                self.clock.now(),
            );
            self.store.append_activity(entry).await?;
        } else {
            let mut bumped = self.store.get_issue(&issue.id).await?;
            bumped.cursors.last_review_id = new_max_id;
            bumped.touch(self.clock.now());
            self.store.update_issue(bumped).await?;
        }

        Ok(())
    }

    /// Replays the PR timeline to derive the set of reviewer logins the
    /// trusted user has delegated review authority to.
    async fn delegated_trust_set(
        &self,
        project: &Project,
        pr_number: u64,
    ) -> Result<HashSet<String>, CodeHostPollerError> {
        let events =
            self.code_host.fetch_timeline(&project.repo_owner, &project.repo_name, pr_number).await?;
        let mut set = HashSet::new();
        for event in events {
            if !project.trusted_reviewer.matches_login(&event.actor_login) {
                continue;
            }
            let Some(reviewer) = event.requested_reviewer_login.as_deref() else { continue };
            match event.kind {
                TimelineEventKind::ReviewRequested => {
                    set.insert(reviewer.to_ascii_lowercase());
                }
                TimelineEventKind::ReviewRequestRemoved => {
                    set.remove(&reviewer.to_ascii_lowercase());
                }
                TimelineEventKind::Other => {}
            }
        }
        Ok(set)
    }

    async fn execute(
        &self,
        transition: &Transition,
        issue: &Issue,
        detail: &str,
    ) -> Result<(), CodeHostPollerError> {
        TransitionRegistry::new()
            .execute(transition, &issue.id, self.store.as_ref(), self.clock.as_ref(), detail.to_string())
            .await
            .map_err(CodeHostPollerError::Execute)
    }
}

#[derive(Debug, thiserror::Error)]
enum CodeHostPollerError {
    #[error(transparent)]
    CodeHost(#[from] ralph_adapters::CodeHostError),
    #[error(transparent)]
    Store(#[from] ralph_core::StoreError),
    #[error(transparent)]
    Execute(ralph_core::ExecuteError),
}
