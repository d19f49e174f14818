// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! When a check run fails and a review lands on the same tick, the
//! check failure wins: the issue moves to `fixing_checks` and the
//! review is left unconsulted for the next tick.

use crate::prelude::Harness;
use ralph_adapters::{CheckConclusion, CheckRun, CheckStatus, PullRequest, Review, ReviewState};
use ralph_core::{Issue, IssueState, Project, Store};

#[tokio::test]
async fn a_failing_check_is_handled_before_a_simultaneous_changes_requested_review() {
    let harness = Harness::new();
    let project = Project::builder().build();
    let issue = Issue::builder().project_id(project.id).state(IssueState::InReview).pr_number(11u64).build();
    let issue_id = issue.id;

    harness.code_host.set_pr(
        &project.repo_owner,
        &project.repo_name,
        PullRequest {
            number: 11,
            head_sha: "sha-fail".into(),
            html_url: "https://example.test/pr/11".into(),
            title: issue.title.clone(),
            state: "open".into(),
        },
    );
    harness.code_host.set_check_runs(
        &project.repo_owner,
        &project.repo_name,
        "sha-fail",
        vec![CheckRun { id: 1, name: "ci".into(), status: CheckStatus::Completed, conclusion: Some(CheckConclusion::Failure) }],
    );
    harness.code_host.set_reviews(
        &project.repo_owner,
        &project.repo_name,
        11,
        vec![Review { id: 200, state: ReviewState::ChangesRequested, body: String::new(), user_login: "alice".into(), user_id: 1 }],
    );

    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    harness.tick_code_host(&project).await;

    let saved = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(saved.state, IssueState::FixingChecks);
    assert_eq!(saved.cursors.last_review_id, 0, "the review must not have been consulted this tick");
}
