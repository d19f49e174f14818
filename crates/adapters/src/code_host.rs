// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Code-host client interface: the capability surface the code-host
//! poller and the build/feedback/fix-checks actions consume. Specified
//! by capability, not wire format — the real implementation talks to
//! whatever REST API the deployment's code host exposes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeHostError {
    #[error("transient: {0}")]
    Transient(String),
    #[error("permanent ({status}): {message}")]
    Permanent { status: u16, message: String },
}

impl CodeHostError {
    pub fn is_transient(&self) -> bool {
        matches!(self, CodeHostError::Transient(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub head_sha: String,
    pub html_url: String,
    pub title: String,
    pub state: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckConclusion {
    Success,
    Failure,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    pub id: i64,
    pub name: String,
    pub status: CheckStatus,
    pub conclusion: Option<CheckConclusion>,
}

impl CheckRun {
    pub fn is_completed(&self) -> bool {
        self.status == CheckStatus::Completed
    }

    pub fn has_failed(&self) -> bool {
        matches!(self.conclusion, Some(CheckConclusion::Failure))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub state: ReviewState,
    pub body: String,
    pub user_login: String,
    pub user_id: i64,
}

/// Review or issue comment. `in_reply_to` is `0` for a top-level comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    #[serde(default)]
    pub path: Option<String>,
    pub user_login: String,
    #[serde(default)]
    pub in_reply_to: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineEventKind {
    ReviewRequested,
    ReviewRequestRemoved,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub kind: TimelineEventKind,
    /// Login of the user who performed the action (the requester).
    pub actor_login: String,
    /// Login of the reviewer added or removed, when applicable.
    #[serde(default)]
    pub requested_reviewer_login: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Bot-authored reviews/comments carry a `[bot]` suffix convention; this
/// is the single place that decides what counts as a bot for filtering
/// purposes.
pub fn is_bot_login(login: &str) -> bool {
    login.ends_with("[bot]")
}

#[async_trait]
pub trait CodeHostClient: Send + Sync {
    async fn fetch_pr(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest, CodeHostError>;

    async fn is_pr_merged(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<bool, CodeHostError>;

    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Review>, CodeHostError>;

    async fn fetch_pr_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Comment>, CodeHostError>;

    async fn fetch_pr_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Comment>, CodeHostError>;

    async fn fetch_timeline(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<TimelineEvent>, CodeHostError>;

    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<CheckRun>, CodeHostError>;

    /// Fetches the log for a single check run. Returns an empty buffer on
    /// a 404 (the run's log expired or was never uploaded) rather than
    /// erroring — callers treat an empty log as "nothing to show", not a
    /// failure.
    async fn fetch_check_run_log(
        &self,
        owner: &str,
        repo: &str,
        run_id: i64,
    ) -> Result<Vec<u8>, CodeHostError>;

    async fn post_pr_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), CodeHostError>;

    async fn post_review_reply(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        comment_id: i64,
        body: &str,
    ) -> Result<(), CodeHostError>;

    async fn react_to_review_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: i64,
        reaction: &str,
    ) -> Result<(), CodeHostError>;

    async fn react_to_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: i64,
        reaction: &str,
    ) -> Result<(), CodeHostError>;

    async fn create_pr(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest, CodeHostError>;

    async fn find_open_pr(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
    ) -> Result<Option<PullRequest>, CodeHostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_suffix_is_the_only_filter_rule() {
        assert!(is_bot_login("dependabot[bot]"));
        assert!(!is_bot_login("dependabot"));
        assert!(!is_bot_login("alice"));
    }

    #[test]
    fn check_run_completion_and_failure() {
        let run = CheckRun {
            id: 1,
            name: "build".into(),
            status: CheckStatus::Completed,
            conclusion: Some(CheckConclusion::Failure),
        };
        assert!(run.is_completed());
        assert!(run.has_failed());

        let pending = CheckRun { status: CheckStatus::InProgress, conclusion: None, ..run };
        assert!(!pending.is_completed());
        assert!(!pending.has_failed());
    }
}
