// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A tracker issue freshly assigned to the configured pickup user is
//! ingested as a queued issue exactly once, and the engine loop picks
//! it up into `refining` on its very next tick.

use crate::prelude::Harness;
use ralph_adapters::TrackerIssue;
use ralph_core::{IssueState, Project, Store};

#[tokio::test]
async fn a_newly_assigned_tracker_issue_is_queued_then_picked_up() {
    let harness = Harness::new();
    let project = Project::builder().build();
    harness.issue_tracker.push_issue(TrackerIssue {
        tracker_id: "T-1".into(),
        human_id: "PROJ-1".into(),
        title: "Fix the thing".into(),
        description: "details".into(),
    });
    harness.seed_project(project.clone());

    harness.tick_issue_tracker(&project).await;
    harness.tick_issue_tracker(&project).await;

    let queued = harness.store.list_issues(&project.id, &[IssueState::Queued]).await.unwrap();
    assert_eq!(queued.len(), 1, "re-polling must not duplicate the ingested issue");
    assert_eq!(queued[0].tracker_id, "T-1");

    harness.tick_engine(&project).await;

    let picked_up = harness.store.get_issue(&queued[0].id).await.unwrap();
    assert_eq!(picked_up.state, IssueState::Refining);
}
