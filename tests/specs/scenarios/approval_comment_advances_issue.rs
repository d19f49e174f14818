// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An issue waiting on a human approval reply moves to `approved` once
//! the tracker poller sees a comment without the "needs approval"
//! marker, and the engine loop immediately hands it into `building`.

use crate::prelude::Harness;
use ralph_adapters::TrackerComment;
use ralph_core::{Issue, IssueState, Project, Store};

#[tokio::test]
async fn an_approval_reply_moves_the_issue_through_to_building() {
    let harness = Harness::new();
    let project = Project::builder().build();
    let issue = Issue::builder()
        .project_id(project.id)
        .state(IssueState::WaitingApproval)
        .tracker_id("T-9")
        .build();
    let issue_id = issue.id;

    harness.issue_tracker.set_comments(
        "T-9",
        vec![TrackerComment { id: 1, body: "type: approved\nship it".into(), author: "alice".into() }],
    );
    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    harness.tick_issue_tracker(&project).await;
    let approved = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(approved.state, IssueState::Approved);

    harness.tick_engine(&project).await;
    let building = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(building.state, IssueState::Building);
}

#[tokio::test]
async fn a_non_approval_reply_only_advances_the_comment_cursor() {
    let harness = Harness::new();
    let project = Project::builder().build();
    let issue = Issue::builder()
        .project_id(project.id)
        .state(IssueState::WaitingApproval)
        .tracker_id("T-10")
        .build();
    let issue_id = issue.id;

    harness.issue_tracker.set_comments(
        "T-10",
        vec![TrackerComment { id: 1, body: "looks close, one nit".into(), author: "alice".into() }],
    );
    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    harness.tick_issue_tracker(&project).await;

    let saved = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(saved.state, IssueState::WaitingApproval);
    assert_eq!(saved.cursors.last_comment_id, 1);
}
