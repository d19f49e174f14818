// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ralph-adapters: capability interfaces the engine drives the outside
//! world through, plus one real implementation (GitHub) and, behind
//! `test-support`, in-memory fakes of all four.

pub mod agent_driver;
pub mod code_host;
pub mod file_tracker;
pub mod git_cli;
pub mod git_ops;
pub mod github;
pub mod issue_tracker;
pub mod retry;
pub mod subprocess_agent;

#[cfg(any(test, feature = "test-support"))]
pub mod fakes;

pub use agent_driver::{AgentDriver, AgentError, AgentEvent, AgentEventHandler};
pub use code_host::{
    is_bot_login, CheckConclusion, CheckRun, CheckStatus, CodeHostClient, CodeHostError, Comment,
    PullRequest, Review, ReviewState, TimelineEvent, TimelineEventKind,
};
pub use file_tracker::FileIssueTrackerClient;
pub use git_cli::GitCliOps;
pub use git_ops::{GitError, GitOps};
pub use github::GitHubClient;
pub use issue_tracker::{
    response_needs_approval, IssueTrackerClient, IssueTrackerError, TrackerComment, TrackerIssue,
};
pub use retry::{with_retry, RetryPolicy};
pub use subprocess_agent::SubprocessAgentDriver;

#[cfg(any(test, feature = "test-support"))]
pub use fakes::{FakeAgentDriver, FakeCodeHost, FakeGitOps, FakeIssueTracker};
