// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A check failure drives an issue into `fixing_checks` via the
//! code-host poller; once the engine's fix-checks attempts are
//! exhausted the engine loop — not the action — pauses the issue and
//! posts a help request on the pull request.

use crate::prelude::Harness;
use ralph_adapters::{CheckConclusion, CheckRun, CheckStatus, PullRequest};
use ralph_core::{EventType, Issue, IssueState, Project, Store};

#[tokio::test]
async fn a_check_failure_that_never_gets_fixed_eventually_pauses_the_issue() {
    let harness = Harness::new();
    let project = Project::builder().build();
    let issue = Issue::builder().project_id(project.id).state(IssueState::InReview).pr_number(5u64).build();
    let issue_id = issue.id;

    harness.code_host.set_pr(
        &project.repo_owner,
        &project.repo_name,
        PullRequest {
            number: 5,
            head_sha: "sha-break".into(),
            html_url: "https://example.test/pr/5".into(),
            title: issue.title.clone(),
            state: "open".into(),
        },
    );
    harness.code_host.set_check_runs(
        &project.repo_owner,
        &project.repo_name,
        "sha-break",
        vec![CheckRun { id: 1, name: "ci".into(), status: CheckStatus::Completed, conclusion: Some(CheckConclusion::Failure) }],
    );

    harness.seed_project(project.clone());
    harness.seed_issue(issue);

    // Code-host poller notices the failing check and hands the issue to
    // fixing_checks.
    harness.tick_code_host(&project).await;
    let after_failure = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(after_failure.state, IssueState::FixingChecks);

    // Simulate two prior check-fix rounds having already run out of
    // patience, leaving one attempt before the cap.
    let mut almost_exhausted = after_failure.clone();
    almost_exhausted.cursors.check_fix_attempts = 2;
    almost_exhausted.branch_name = "ralph/proj-1".into();
    harness.store.update_issue(almost_exhausted).await.unwrap();

    // The next engine tick drives the final, exhausting attempt.
    harness.tick_engine(&project).await;

    let saved = harness.store.get_issue(&issue_id).await.unwrap();
    assert_eq!(saved.state, IssueState::Paused);
    let activity = harness.activity_for(&saved);
    assert!(activity.iter().any(|e| e.event_type == EventType::ChecksPaused));
    assert!(activity.iter().any(|e| e.event_type == EventType::StateChange));
    assert!(
        harness.code_host.posted_comments.lock().iter().any(|(_, body)| body.contains("needs a human")),
        "exhaustion must post a help request on the pull request"
    );
}
