// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue-tracker client interface: new-issue ingestion and plan/approval
//! reply posting, consumed by the issue-tracker poller and the refine
//! action.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IssueTrackerError {
    #[error("transient: {0}")]
    Transient(String),
    #[error("permanent ({status}): {message}")]
    Permanent { status: u16, message: String },
}

/// A tracker-side ticket assigned to the configured bot identity but not
/// yet picked up by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerIssue {
    pub tracker_id: String,
    pub human_id: String,
    pub title: String,
    pub description: String,
}

/// A comment on a tracker issue, used by the refine action to seed
/// context and by the approval gate to detect an approval signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerComment {
    pub id: i64,
    pub body: String,
    pub author: String,
}

#[async_trait]
pub trait IssueTrackerClient: Send + Sync {
    /// Issues assigned to `assignee` within `team` not already tracked.
    async fn list_assigned_issues(
        &self,
        team: &str,
        assignee: &str,
    ) -> Result<Vec<TrackerIssue>, IssueTrackerError>;

    async fn fetch_comments(
        &self,
        tracker_id: &str,
    ) -> Result<Vec<TrackerComment>, IssueTrackerError>;

    async fn post_comment(&self, tracker_id: &str, body: &str) -> Result<(), IssueTrackerError>;

    async fn set_status(&self, tracker_id: &str, status: &str) -> Result<(), IssueTrackerError>;
}

/// Whether a refinement reply body carries an explicit approval marker.
///
/// A missing marker is treated as "still needs approval" — the safe
/// default — rather than inferred from the comment's prose; preserved
/// as specified rather than made more clever.
pub fn response_needs_approval(body: &str) -> bool {
    !body.contains("type: approved")
}
