// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `failed` is the one terminal state the code-host poller still
//! watches: if the PR behind a failed issue is later observed merged,
//! the issue recovers to `completed` without ever re-fetching checks
//! or reviews for it.

use crate::prelude::Harness;
use ralph_core::{Issue, IssueState, Project, Store};

#[tokio::test]
async fn a_failed_issue_completes_once_its_pr_is_merged() {
    let harness = Harness::new();
    let project = Project::builder().build();
    let issue =
        Issue::builder().project_id(project.id).state(IssueState::Failed).pr_number(9u64).build();
    let issue_id = issue.id;

    harness.code_host.set_merged(&project.repo_owner, &project.repo_name, 9, true);
    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    harness.tick_code_host(&project).await;

    assert_eq!(harness.store.get_issue(&issue_id).await.unwrap().state, IssueState::Completed);
}

#[tokio::test]
async fn a_failed_issue_stays_failed_while_its_pr_remains_open() {
    let harness = Harness::new();
    let project = Project::builder().build();
    let issue =
        Issue::builder().project_id(project.id).state(IssueState::Failed).pr_number(10u64).build();
    let issue_id = issue.id;

    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    harness.tick_code_host(&project).await;

    assert_eq!(harness.store.get_issue(&issue_id).await.unwrap().state, IssueState::Failed);
}
