// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! With a trusted reviewer configured, a `changes_requested` review from
//! anyone else is logged as skipped rather than acted on — but its id
//! still advances the review cursor so it is never re-considered.

use crate::prelude::Harness;
use ralph_adapters::{CheckConclusion, CheckRun, CheckStatus, PullRequest, Review, ReviewState};
use ralph_core::{EventType, Issue, IssueState, Project, Store, TrustedReviewer};

#[tokio::test]
async fn review_from_an_untrusted_human_is_skipped_but_its_cursor_still_advances() {
    let harness = Harness::new();
    let project = Project::builder()
        .trusted_reviewer(TrustedReviewer { username: Some("alice".into()), user_id: None })
        .build();
    let issue = Issue::builder().project_id(project.id).state(IssueState::InReview).pr_number(20u64).build();
    let issue_id = issue.id;

    harness.code_host.set_pr(
        &project.repo_owner,
        &project.repo_name,
        PullRequest {
            number: 20,
            head_sha: "sha1".into(),
            html_url: "https://example.test/pr/20".into(),
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
        20,
        vec![Review { id: 300, state: ReviewState::ChangesRequested, body: String::new(), user_login: "mallory".into(), user_id: 99 }],
    );

    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    harness.tick_code_host(&project).await;

    let saved = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(saved.state, IssueState::InReview, "an untrusted reviewer must not move the issue");
    assert_eq!(saved.cursors.last_review_id, 300);
    assert!(harness.activity_for(&saved).iter().any(|e| e.event_type == EventType::UntrustedFeedbackSkipped));
}

#[tokio::test]
async fn review_from_the_trusted_reviewer_still_moves_the_issue() {
    let harness = Harness::new();
    let project = Project::builder()
        .trusted_reviewer(TrustedReviewer { username: Some("alice".into()), user_id: None })
        .build();
    let issue = Issue::builder().project_id(project.id).state(IssueState::InReview).pr_number(21u64).build();
    let issue_id = issue.id;

    harness.code_host.set_pr(
        &project.repo_owner,
        &project.repo_name,
        PullRequest {
            number: 21,
            head_sha: "sha1".into(),
            html_url: "https://example.test/pr/21".into(),
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
        21,
        vec![Review { id: 301, state: ReviewState::ChangesRequested, body: String::new(), user_login: "Alice".into(), user_id: 1 }],
    );

    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    harness.tick_code_host(&project).await;

    let saved = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(saved.state, IssueState::AddressingFeedback);
}
