// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fakes for every adapter trait, gated behind `test-support`.
//! These back the engine and daemon crates' own tests so transition
//! actions and pollers can be exercised without a live code host.

#![allow(clippy::type_complexity)]

use crate::agent_driver::{AgentDriver, AgentError, AgentEvent, AgentEventHandler};
use crate::code_host::{
    CheckRun, CodeHostClient, CodeHostError, Comment, PullRequest, Review, TimelineEvent,
};
use crate::git_ops::{GitError, GitOps};
use crate::issue_tracker::{IssueTrackerClient, IssueTrackerError, TrackerComment, TrackerIssue};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Keys every fake's state by `(owner, repo, number)` so one instance can
/// serve multiple projects in the same test.
type PrKey = (String, String, u64);

#[derive(Default)]
pub struct FakeCodeHost {
    prs: Mutex<HashMap<PrKey, PullRequest>>,
    merged: Mutex<HashMap<PrKey, bool>>,
    reviews: Mutex<HashMap<PrKey, Vec<Review>>>,
    pr_comments: Mutex<HashMap<PrKey, Vec<Comment>>>,
    issue_comments: Mutex<HashMap<PrKey, Vec<Comment>>>,
    timeline: Mutex<HashMap<PrKey, Vec<TimelineEvent>>>,
    check_runs: Mutex<HashMap<(String, String, String), Vec<CheckRun>>>,
    check_logs: Mutex<HashMap<i64, Vec<u8>>>,
    pub posted_comments: Mutex<Vec<(PrKey, String)>>,
    pub posted_replies: Mutex<Vec<(PrKey, i64, String)>>,
    pub reactions: Mutex<Vec<(i64, String)>>,
    open_prs: Mutex<HashMap<(String, String, String, String), PullRequest>>,
    next_pr_number: Mutex<u64>,
}

impl FakeCodeHost {
    pub fn new() -> Self {
        Self { next_pr_number: Mutex::new(1), ..Self::default() }
    }

    pub fn set_pr(&self, owner: &str, repo: &str, pr: PullRequest) {
        self.prs.lock().insert((owner.to_string(), repo.to_string(), pr.number), pr);
    }

    pub fn set_merged(&self, owner: &str, repo: &str, number: u64, merged: bool) {
        self.merged.lock().insert((owner.to_string(), repo.to_string(), number), merged);
    }

    pub fn set_reviews(&self, owner: &str, repo: &str, number: u64, reviews: Vec<Review>) {
        self.reviews.lock().insert((owner.to_string(), repo.to_string(), number), reviews);
    }

    pub fn set_check_runs(&self, owner: &str, repo: &str, sha: &str, runs: Vec<CheckRun>) {
        self.check_runs
            .lock()
            .insert((owner.to_string(), repo.to_string(), sha.to_string()), runs);
    }

    pub fn set_timeline(&self, owner: &str, repo: &str, number: u64, events: Vec<TimelineEvent>) {
        self.timeline.lock().insert((owner.to_string(), repo.to_string(), number), events);
    }

    pub fn set_pr_comments(&self, owner: &str, repo: &str, number: u64, comments: Vec<Comment>) {
        self.pr_comments
            .lock()
            .insert((owner.to_string(), repo.to_string(), number), comments);
    }

    pub fn set_issue_comments(&self, owner: &str, repo: &str, number: u64, comments: Vec<Comment>) {
        self.issue_comments
            .lock()
            .insert((owner.to_string(), repo.to_string(), number), comments);
    }
}

#[async_trait]
impl CodeHostClient for FakeCodeHost {
    async fn fetch_pr(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequest, CodeHostError> {
        self.prs
            .lock()
            .get(&(owner.to_string(), repo.to_string(), number))
            .cloned()
            .ok_or_else(|| CodeHostError::Permanent { status: 404, message: "no such pr".into() })
    }

    async fn is_pr_merged(&self, owner: &str, repo: &str, number: u64) -> Result<bool, CodeHostError> {
        Ok(*self
            .merged
            .lock()
            .get(&(owner.to_string(), repo.to_string(), number))
            .unwrap_or(&false))
    }

    async fn fetch_reviews(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<Review>, CodeHostError> {
        Ok(self
            .reviews
            .lock()
            .get(&(owner.to_string(), repo.to_string(), number))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_pr_comments(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<Comment>, CodeHostError> {
        Ok(self
            .pr_comments
            .lock()
            .get(&(owner.to_string(), repo.to_string(), number))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_pr_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Comment>, CodeHostError> {
        Ok(self
            .issue_comments
            .lock()
            .get(&(owner.to_string(), repo.to_string(), number))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_timeline(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<TimelineEvent>, CodeHostError> {
        Ok(self
            .timeline
            .lock()
            .get(&(owner.to_string(), repo.to_string(), number))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_check_runs(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<CheckRun>, CodeHostError> {
        Ok(self
            .check_runs
            .lock()
            .get(&(owner.to_string(), repo.to_string(), sha.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_check_run_log(&self, _owner: &str, _repo: &str, run_id: i64) -> Result<Vec<u8>, CodeHostError> {
        Ok(self.check_logs.lock().get(&run_id).cloned().unwrap_or_default())
    }

    async fn post_pr_comment(&self, owner: &str, repo: &str, number: u64, body: &str) -> Result<(), CodeHostError> {
        self.posted_comments
            .lock()
            .push(((owner.to_string(), repo.to_string(), number), body.to_string()));
        Ok(())
    }

    async fn post_review_reply(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        comment_id: i64,
        body: &str,
    ) -> Result<(), CodeHostError> {
        self.posted_replies.lock().push((
            (owner.to_string(), repo.to_string(), number),
            comment_id,
            body.to_string(),
        ));
        Ok(())
    }

    async fn react_to_review_comment(
        &self,
        _owner: &str,
        _repo: &str,
        comment_id: i64,
        reaction: &str,
    ) -> Result<(), CodeHostError> {
        self.reactions.lock().push((comment_id, reaction.to_string()));
        Ok(())
    }

    async fn react_to_issue_comment(
        &self,
        _owner: &str,
        _repo: &str,
        comment_id: i64,
        reaction: &str,
    ) -> Result<(), CodeHostError> {
        self.reactions.lock().push((comment_id, reaction.to_string()));
        Ok(())
    }

    async fn create_pr(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        _body: &str,
    ) -> Result<PullRequest, CodeHostError> {
        let mut number_guard = self.next_pr_number.lock();
        let number = *number_guard;
        *number_guard += 1;
        let pr = PullRequest {
            number,
            head_sha: format!("sha-for-{head}"),
            html_url: format!("https://example.test/{owner}/{repo}/pull/{number}"),
            title: title.to_string(),
            state: "open".to_string(),
        };
        self.open_prs.lock().insert(
            (owner.to_string(), repo.to_string(), head.to_string(), base.to_string()),
            pr.clone(),
        );
        self.prs.lock().insert((owner.to_string(), repo.to_string(), number), pr.clone());
        Ok(pr)
    }

    async fn find_open_pr(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
    ) -> Result<Option<PullRequest>, CodeHostError> {
        Ok(self
            .open_prs
            .lock()
            .get(&(owner.to_string(), repo.to_string(), head.to_string(), base.to_string()))
            .cloned())
    }
}

#[derive(Default)]
pub struct FakeIssueTracker {
    assigned: Mutex<Vec<TrackerIssue>>,
    comments: Mutex<HashMap<String, Vec<TrackerComment>>>,
    pub posted_comments: Mutex<Vec<(String, String)>>,
    pub statuses: Mutex<HashMap<String, String>>,
}

impl FakeIssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_issue(&self, issue: TrackerIssue) {
        self.assigned.lock().push(issue);
    }

    pub fn set_comments(&self, tracker_id: &str, comments: Vec<TrackerComment>) {
        self.comments.lock().insert(tracker_id.to_string(), comments);
    }
}

#[async_trait]
impl IssueTrackerClient for FakeIssueTracker {
    async fn list_assigned_issues(
        &self,
        _team: &str,
        _assignee: &str,
    ) -> Result<Vec<TrackerIssue>, IssueTrackerError> {
        Ok(self.assigned.lock().clone())
    }

    async fn fetch_comments(&self, tracker_id: &str) -> Result<Vec<TrackerComment>, IssueTrackerError> {
        Ok(self.comments.lock().get(tracker_id).cloned().unwrap_or_default())
    }

    async fn post_comment(&self, tracker_id: &str, body: &str) -> Result<(), IssueTrackerError> {
        self.posted_comments.lock().push((tracker_id.to_string(), body.to_string()));
        Ok(())
    }

    async fn set_status(&self, tracker_id: &str, status: &str) -> Result<(), IssueTrackerError> {
        self.statuses.lock().insert(tracker_id.to_string(), status.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAgentDriver {
    pub response: Mutex<String>,
    pub events: Mutex<Vec<AgentEvent>>,
}

impl FakeAgentDriver {
    pub fn with_response(response: impl Into<String>) -> Self {
        Self { response: Mutex::new(response.into()), events: Mutex::new(Vec::new()) }
    }

    pub fn with_events(response: impl Into<String>, events: Vec<AgentEvent>) -> Self {
        Self { response: Mutex::new(response.into()), events: Mutex::new(events) }
    }
}

#[async_trait]
impl AgentDriver for FakeAgentDriver {
    async fn invoke_with_events(
        &self,
        _prompt: &str,
        _workdir: &Path,
        _max_turns: u32,
        handler: &(dyn AgentEventHandler),
    ) -> Result<String, AgentError> {
        for event in self.events.lock().iter() {
            handler.on_event(event.clone()).await;
        }
        Ok(self.response.lock().clone())
    }
}

#[derive(Default)]
pub struct FakeGitOps {
    pub nothing_to_commit: Mutex<bool>,
    pub head_shas: Mutex<HashMap<PathBuf, String>>,
    pub commits: Mutex<Vec<(PathBuf, String)>>,
    pub pushes: Mutex<Vec<(PathBuf, String)>>,
    pub pulls: Mutex<Vec<(PathBuf, String)>>,
}

impl FakeGitOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_nothing_to_commit(&self, value: bool) {
        *self.nothing_to_commit.lock() = value;
    }

    pub fn set_head_sha(&self, workdir: &Path, sha: impl Into<String>) {
        self.head_shas.lock().insert(workdir.to_path_buf(), sha.into());
    }
}

#[async_trait]
impl GitOps for FakeGitOps {
    async fn commit(&self, workdir: &Path, message: &str) -> Result<(), GitError> {
        if *self.nothing_to_commit.lock() {
            return Err(GitError::Failed("nothing to commit, working tree clean".into()));
        }
        self.commits.lock().push((workdir.to_path_buf(), message.to_string()));
        Ok(())
    }

    async fn push_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError> {
        self.pushes.lock().push((workdir.to_path_buf(), branch.to_string()));
        Ok(())
    }

    async fn head_sha(&self, workdir: &Path) -> Result<String, GitError> {
        Ok(self
            .head_shas
            .lock()
            .get(workdir)
            .cloned()
            .unwrap_or_else(|| "0000000000000000000000000000000000000000".to_string()))
    }

    async fn pull_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError> {
        self.pulls.lock().push((workdir.to_path_buf(), branch.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_code_host_returns_not_found_for_unknown_pr() {
        let fake = FakeCodeHost::new();
        let result = fake.fetch_pr("acme", "widgets", 7).await;
        assert!(matches!(result, Err(CodeHostError::Permanent { status: 404, .. })));
    }

    #[tokio::test]
    async fn fake_git_ops_reports_nothing_to_commit_when_armed() {
        let fake = FakeGitOps::new();
        fake.set_nothing_to_commit(true);
        let err = fake.commit(Path::new("/tmp/x"), "msg").await.unwrap_err();
        assert!(err.is_nothing_to_commit());
    }
}
