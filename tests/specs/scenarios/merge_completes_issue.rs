// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An issue sitting in review whose pull request gets merged completes,
//! and the merge is recorded on its activity log.

use crate::prelude::Harness;
use ralph_core::{EventType, Issue, IssueState, Project, Store};

#[tokio::test]
async fn merged_pr_completes_the_issue_via_a_single_poller_tick() {
    let harness = Harness::new();
    let project = Project::builder().build();
    let issue = Issue::builder().project_id(project.id).state(IssueState::InReview).pr_number(42u64).build();
    let issue_id = issue.id;

    harness.code_host.set_merged(&project.repo_owner, &project.repo_name, 42, true);
    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    harness.tick_code_host(&project).await;

    let saved = harness.store.get_issue(&issue_id).await.expect("issue present");
    assert_eq!(saved.state, IssueState::Completed);
    assert!(harness.activity_for(&saved).iter().any(|e| e.event_type == EventType::PrMerged));
}
