// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue-tracker poller: ingests newly assigned tracker issues as queued
//! [`Issue`]s, and watches issues waiting on a human approval reply for
//! the marker [`response_needs_approval`] clears.

use ralph_adapters::IssueTrackerClient;
use ralph_core::{Clock, Issue, IssueState, Project, Store, Transition, TransitionRegistry};
use ralph_engine::actions::NoopAction;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct IssueTrackerPoller {
    issue_tracker: Arc<dyn IssueTrackerClient>,
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl IssueTrackerPoller {
    pub fn new(issue_tracker: Arc<dyn IssueTrackerClient>, store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { issue_tracker, store, clock }
    }

    pub async fn tick_project(&self, project: &Project, cancel: &CancellationToken) {
        if let Err(err) = self.ingest_new_issues(project).await {
            tracing::warn!(project = %project.name, error = %err, "failed to ingest new tracker issues");
        }
        if cancel.is_cancelled() {
            return;
        }
        if let Err(err) = self.poll_approvals(project, cancel).await {
            tracing::warn!(project = %project.name, error = %err, "failed to poll approval comments");
        }
    }

    async fn ingest_new_issues(&self, project: &Project) -> Result<(), IssueTrackerPollerError> {
        let assigned =
            self.issue_tracker.list_assigned_issues(&project.tracker_team, &project.tracker_assignee).await?;
        for tracker_issue in assigned {
            if self.store.get_issue_by_tracker_id(&project.id, &tracker_issue.tracker_id).await?.is_some() {
                continue;
            }
            let issue = Issue::new(
                project.id,
                tracker_issue.tracker_id,
                tracker_issue.human_id,
                tracker_issue.title,
                tracker_issue.description,
                self.clock.now(),
            );
            self.store.create_issue(issue).await?;
        }
        Ok(())
    }

    async fn poll_approvals(
        &self,
        project: &Project,
        cancel: &CancellationToken,
    ) -> Result<(), IssueTrackerPollerError> {
        let waiting = self.store.list_issues(&project.id, &[IssueState::WaitingApproval]).await?;
        for issue in waiting {
            if cancel.is_cancelled() {
                return Ok(());
            }
            if let Err(err) = self.poll_one_approval(&issue).await {
                tracing::warn!(issue_id = %issue.id, error = %err, "approval poll skipped issue this tick");
            }
        }
        Ok(())
    }

    async fn poll_one_approval(&self, issue: &Issue) -> Result<(), IssueTrackerPollerError> {
        let comments = self.issue_tracker.fetch_comments(&issue.tracker_id).await?;
        let new_comments: Vec<_> =
            comments.into_iter().filter(|c| c.id > issue.cursors.last_comment_id).collect();
        if new_comments.is_empty() {
            return Ok(());
        }
        let new_max_id = new_comments.iter().map(|c| c.id).max().unwrap_or(issue.cursors.last_comment_id);

        let approved = new_comments.iter().any(|c| !ralph_adapters::response_needs_approval(&c.body));

        if approved {
            let action = Arc::new(NoopAction::new("approved"));
            let transition = Transition::new(issue.state, IssueState::Approved, action);
            TransitionRegistry::new()
                .execute(&transition, &issue.id, self.store.as_ref(), self.clock.as_ref(), "approval marker found")
                .await?;
        } else {
            let mut bumped = self.store.get_issue(&issue.id).await?;
            bumped.cursors.last_comment_id = new_max_id;
            bumped.touch(self.clock.now());
            self.store.update_issue(bumped).await?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
enum IssueTrackerPollerError {
    #[error(transparent)]
    IssueTracker(#[from] ralph_adapters::IssueTrackerError),
    #[error(transparent)]
    Store(#[from] ralph_core::StoreError),
    #[error(transparent)]
    Execute(#[from] ralph_core::ExecuteError),
}
