// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue identifier, lifecycle state enumeration, and the issue record
//! itself.

use crate::project::ProjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a tracked issue.
    pub struct IssueId("iss-");
}

/// Position of an issue in the lifecycle state machine.
///
/// `queued → refining → waiting_approval → approved → building → in_review`;
/// from `in_review` the issue cycles through `addressing_feedback` or
/// `fixing_checks` and back, or exits to `completed`. `paused` and `failed`
/// are the two off-ramps — `failed` can still recover to `completed` if the
/// code-host poller later observes the PR merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Queued,
    Refining,
    WaitingApproval,
    Approved,
    Building,
    InReview,
    AddressingFeedback,
    FixingChecks,
    Completed,
    Failed,
    Paused,
}

impl IssueState {
    pub const ALL: [IssueState; 11] = [
        IssueState::Queued,
        IssueState::Refining,
        IssueState::WaitingApproval,
        IssueState::Approved,
        IssueState::Building,
        IssueState::InReview,
        IssueState::AddressingFeedback,
        IssueState::FixingChecks,
        IssueState::Completed,
        IssueState::Failed,
        IssueState::Paused,
    ];

    /// Terminal states the engine never transitions out of automatically.
    /// `Failed` is the one exception: the code-host poller can recover it
    /// to `Completed` on observing a merge.
    pub fn is_terminal(self) -> bool {
        matches!(self, IssueState::Completed | IssueState::Paused | IssueState::Failed)
    }

    /// States the code-host poller watches: anything with a PR that might
    /// still move, plus `Failed` (for merge-recovery).
    pub fn is_watched_by_code_host_poller(self) -> bool {
        matches!(
            self,
            IssueState::InReview
                | IssueState::AddressingFeedback
                | IssueState::FixingChecks
                | IssueState::Failed
        )
    }
}

crate::simple_display! {
    IssueState {
        Queued => "queued",
        Refining => "refining",
        WaitingApproval => "waiting_approval",
        Approved => "approved",
        Building => "building",
        InReview => "in_review",
        AddressingFeedback => "addressing_feedback",
        FixingChecks => "fixing_checks",
        Completed => "completed",
        Failed => "failed",
        Paused => "paused",
    }
}

/// Idempotency cursors that let the pollers restart without duplicating
/// work. Every field here must be monotone or reset only by a documented
/// rule; see [`IssueState`] and the poller modules for the rules that
/// advance them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollCursors {
    /// Highest external PR/issue comment id previously acted on.
    #[serde(default)]
    pub last_comment_id: i64,
    /// Highest external review id previously acted on.
    #[serde(default)]
    pub last_review_id: i64,
    /// Head commit SHA whose check outcomes have been fully recorded.
    #[serde(default)]
    pub last_check_sha: String,
    /// Consecutive fix-checks attempts made against the current head SHA.
    #[serde(default)]
    pub check_fix_attempts: u32,
}

/// A tracked issue: the central entity the state machine and both pollers
/// operate on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub project_id: ProjectId,
    /// Id assigned by the external issue tracker.
    pub tracker_id: String,
    /// Human-facing identifier, e.g. `PROJ-42`.
    pub human_id: String,

    pub title: String,
    pub description: String,
    /// Plan text produced by the refine action; empty until refined.
    #[serde(default)]
    pub plan: String,

    pub state: IssueState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Workspace name; the worktree path is derived from this plus the
    /// project's checkout root.
    #[serde(default)]
    pub workspace_name: String,
    #[serde(default)]
    pub branch_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,

    #[serde(default)]
    pub cursors: PollCursors,
}

impl Issue {
    pub fn new(
        project_id: ProjectId,
        tracker_id: impl Into<String>,
        human_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IssueId::new(),
            project_id,
            tracker_id: tracker_id.into(),
            human_id: human_id.into(),
            title: title.into(),
            description: description.into(),
            plan: String::new(),
            state: IssueState::Queued,
            error_message: None,
            created_at: now,
            updated_at: now,
            workspace_name: String::new(),
            branch_name: String::new(),
            pr_number: None,
            pr_url: None,
            cursors: PollCursors::default(),
        }
    }

    /// Touch `updated_at`. Called by the store immediately before persisting
    /// any field mutation so readers can rely on it tracking real writes.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

crate::builder! {
    pub struct IssueBuilder => Issue {
        into {
            tracker_id: String = "1001",
            human_id: String = "PROJ-1",
            title: String = "Test issue",
            description: String = "A test issue.",
            plan: String = "",
            workspace_name: String = "",
            branch_name: String = "",
        }
        set {
            state: IssueState = IssueState::Queued,
            project_id: ProjectId = ProjectId::new(),
            cursors: PollCursors = PollCursors::default(),
        }
        option {
            error_message: String = None,
            pr_number: u64 = None,
            pr_url: String = None,
        }
        computed {
            id: IssueId = IssueId::new(),
            created_at: DateTime<Utc> = Utc::now(),
            updated_at: DateTime<Utc> = Utc::now(),
        }
    }
}
