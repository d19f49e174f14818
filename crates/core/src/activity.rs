// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only activity log: the audit trail every state mutation and
//! poller observation writes to.

use crate::issue::IssueId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for an activity log row.
    pub struct ActivityId("act-");
}

/// Known vocabulary of activity event types.
///
/// Kept as an open string on the wire (the store persists whatever is
/// written) but enumerated here so producers don't typo a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StateChange,
    ChecksStart,
    ChecksFinish,
    ChecksFailed,
    ChecksPaused,
    PrMerged,
    ChangesRequested,
    UntrustedFeedbackSkipped,
    FeedbackStart,
    FeedbackFinish,
    BuildEvent,
}

crate::simple_display! {
    EventType {
        StateChange => "state_change",
        ChecksStart => "checks_start",
        ChecksFinish => "checks_finish",
        ChecksFailed => "checks_failed",
        ChecksPaused => "checks_paused",
        PrMerged => "pr_merged",
        ChangesRequested => "changes_requested",
        UntrustedFeedbackSkipped => "untrusted_feedback_skipped",
        FeedbackStart => "feedback_start",
        FeedbackFinish => "feedback_finish",
        BuildEvent => "build_event",
    }
}

/// One append-only audit row.
///
/// `from_state`/`to_state` are populated for [`EventType::StateChange`]
/// rows and left empty otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: ActivityId,
    pub issue_id: IssueId,
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_state: Option<String>,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityLogEntry {
    pub fn new(
        issue_id: IssueId,
        event_type: EventType,
        detail: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            issue_id,
            event_type,
            from_state: None,
            to_state: None,
            detail: detail.into(),
            timestamp,
        }
    }

    pub fn state_change(
        issue_id: IssueId,
        from_state: impl Into<String>,
        to_state: impl Into<String>,
        detail: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            issue_id,
            event_type: EventType::StateChange,
            from_state: Some(from_state.into()),
            to_state: Some(to_state.into()),
            detail: detail.into(),
            timestamp,
        }
    }
}

crate::builder! {
    pub struct ActivityLogEntryBuilder => ActivityLogEntry {
        set {
            event_type: EventType = EventType::BuildEvent,
            issue_id: IssueId = IssueId::new(),
        }
        into {
            detail: String = "",
        }
        option {
            from_state: String = None,
            to_state: String = None,
        }
        computed {
            id: ActivityId = ActivityId::new(),
            timestamp: DateTime<Utc> = Utc::now(),
        }
    }
}
