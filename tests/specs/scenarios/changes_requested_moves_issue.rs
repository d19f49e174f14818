// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A trusted reviewer's `changes_requested` review, with checks green,
//! moves the issue to `addressing_feedback` and bumps its review
//! cursor so the same review is never re-acted on.

use crate::prelude::Harness;
use ralph_adapters::{CheckConclusion, CheckRun, CheckStatus, PullRequest, Review, ReviewState};
use ralph_core::{EventType, Issue, IssueState, Project, Store};

#[tokio::test]
async fn changes_requested_review_advances_the_issue_and_its_cursor() {
    let harness = Harness::new();
    let project = Project::builder().build();
    let issue = Issue::builder().project_id(project.id).state(IssueState::InReview).pr_number(12u64).build();
    let issue_id = issue.id;

    harness.code_host.set_pr(
        &project.repo_owner,
        &project.repo_name,
        PullRequest {
            number: 12,
            head_sha: "sha1".into(),
            html_url: "https://example.test/pr/12".into(),
            title: issue.title.clone(),
            state: "open".into(),
        },
    );
    harness.code_host.set_check_runs(
        &project.repo_owner,
        &project.repo_name,
        "sha1",
        vec![CheckRun { id: 1, name: "ci".into(), status: CheckStatus::Completed, conclusion: Some(CheckConclusion::Success) }],
    );
    harness.code_host.set_reviews(
        &project.repo_owner,
        &project.repo_name,
        12,
        vec![Review { id: 100, state: ReviewState::ChangesRequested, body: String::new(), user_login: "alice".into(), user_id: 1 }],
    );

    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    harness.tick_code_host(&project).await;

    let saved = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(saved.state, IssueState::AddressingFeedback);
    assert_eq!(saved.cursors.last_review_id, 100);
    assert!(harness.activity_for(&saved).iter().any(|e| e.event_type == EventType::ChangesRequested));

    // A second tick with no new reviews must not re-trigger anything.
    harness.tick_code_host(&project).await;
    let resaved = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(resaved.state, IssueState::AddressingFeedback);
}
