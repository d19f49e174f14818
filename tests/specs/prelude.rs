// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared scaffolding for the workspace-level scenario specs: an
//! in-memory [`Harness`] wiring the real transition registry and the
//! real pollers against fake adapters, plus a couple of `ralph` CLI
//! helpers for the smoke tests.

#![allow(dead_code)]

pub use assert_cmd::Command as AssertCommand;
use chrono::Utc;
use ralph_adapters::{
    AgentDriver, CodeHostClient, FakeAgentDriver, FakeCodeHost, FakeGitOps, FakeIssueTracker,
    GitOps, IssueTrackerClient,
};
use ralph_core::{FakeClock, Issue, Project, SharedClock, Store, TransitionRegistry};
use ralph_daemon::code_host_poller::CodeHostPoller;
use ralph_daemon::engine_loop::EngineLoop;
use ralph_daemon::issue_tracker_poller::IssueTrackerPoller;
use ralph_engine::actions::complete::CompleteAction;
use ralph_engine::config::{ConfigLoader, StaticConfigLoader};
use ralph_engine::test_support::MemStore;
use ralph_engine::{build_registry, ActionDeps};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One fully-wired engine + daemon stack, backed by in-memory fakes.
/// Every scenario spec builds one of these, seeds a project and issue
/// into `mem`, arranges the fakes, then ticks the pollers/loop directly.
pub struct Harness {
    pub mem: MemStore,
    pub store: Arc<dyn Store>,
    pub code_host: Arc<FakeCodeHost>,
    pub issue_tracker: Arc<FakeIssueTracker>,
    pub agent: Arc<FakeAgentDriver>,
    pub git: Arc<FakeGitOps>,
    pub clock: Arc<FakeClock>,
    pub registry: Arc<TransitionRegistry>,
    complete_action: Arc<CompleteAction>,
}

impl Harness {
    pub fn new() -> Self {
        let mem = MemStore::default();
        let store: Arc<dyn Store> = Arc::new(mem.clone());

        let code_host = Arc::new(FakeCodeHost::new());
        let issue_tracker = Arc::new(FakeIssueTracker::new());
        let agent = Arc::new(FakeAgentDriver::default());
        let git = Arc::new(FakeGitOps::new());
        let clock = Arc::new(FakeClock::new(Utc::now()));
        let config: Arc<dyn ConfigLoader> = Arc::new(StaticConfigLoader(Default::default()));

        let deps = Arc::new(ActionDeps::new(
            code_host.clone() as Arc<dyn CodeHostClient>,
            issue_tracker.clone() as Arc<dyn IssueTrackerClient>,
            agent.clone() as Arc<dyn AgentDriver>,
            git.clone() as Arc<dyn GitOps>,
            config,
            clock.clone() as SharedClock,
        ));
        let registry = Arc::new(build_registry(deps.clone()));
        let complete_action = Arc::new(CompleteAction::new(deps));

        Self { mem, store, code_host, issue_tracker, agent, git, clock, registry, complete_action }
    }

    pub fn seed_project(&self, project: Project) {
        self.mem.seed_project(project);
    }

    pub fn seed_issue(&self, issue: Issue) {
        self.mem.seed_issue(issue);
    }

    pub fn activity_for(&self, issue: &Issue) -> Vec<ralph_core::ActivityLogEntry> {
        self.mem.activity_for(&issue.id)
    }

    pub async fn reread(&self, issue: &Issue) -> Issue {
        self.store.get_issue(&issue.id).await.expect("issue still present")
    }

    pub fn code_host_poller(&self) -> CodeHostPoller {
        CodeHostPoller::new(
            self.code_host.clone(),
            self.store.clone(),
            self.clock.clone() as SharedClock,
            self.complete_action.clone(),
        )
    }

    pub fn issue_tracker_poller(&self) -> IssueTrackerPoller {
        IssueTrackerPoller::new(self.issue_tracker.clone(), self.store.clone(), self.clock.clone() as SharedClock)
    }

    pub fn engine_loop(&self) -> EngineLoop {
        EngineLoop::new(self.store.clone(), self.registry.clone(), self.clock.clone() as SharedClock)
    }

    pub async fn tick_code_host(&self, project: &Project) {
        self.code_host_poller().tick_project(project, &CancellationToken::new()).await;
    }

    pub async fn tick_issue_tracker(&self, project: &Project) {
        self.issue_tracker_poller().tick_project(project, &CancellationToken::new()).await;
    }

    pub async fn tick_engine(&self, project: &Project) {
        self.engine_loop().tick_project(project, &CancellationToken::new()).await;
    }
}

/// `ralph` CLI command against a scratch state dir, for the smoke specs.
pub fn ralph_cli(state_dir: &std::path::Path) -> AssertCommand {
    let mut cmd = AssertCommand::cargo_bin("ralph").expect("ralph binary builds");
    cmd.env("RALPH_STATE_DIR", state_dir);
    cmd
}
