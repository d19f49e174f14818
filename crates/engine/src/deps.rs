// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared handles every transition action needs: the four adapter
//! capabilities, the config loader, a clock, and the optional live
//! callback the event-log adapter fans build events into.

use crate::config::ConfigLoader;
use ralph_adapters::{AgentDriver, CodeHostClient, GitOps, IssueTrackerClient};
use ralph_core::{IssueId, SharedClock};
use std::sync::Arc;

/// Invoked once per non-empty agent event during a build-phase action;
/// wired up by the daemon to push live updates to a UI.
pub type BuildEventCallback = Arc<dyn Fn(IssueId, String) + Send + Sync>;

#[derive(Clone)]
pub struct ActionDeps {
    pub code_host: Arc<dyn CodeHostClient>,
    pub issue_tracker: Arc<dyn IssueTrackerClient>,
    pub agent: Arc<dyn AgentDriver>,
    pub git: Arc<dyn GitOps>,
    pub config: Arc<dyn ConfigLoader>,
    pub clock: SharedClock,
    pub on_build_event: Option<BuildEventCallback>,
    /// Default cap on check-fix attempts before an issue pauses.
    pub max_fix_attempts: u32,
}

impl ActionDeps {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code_host: Arc<dyn CodeHostClient>,
        issue_tracker: Arc<dyn IssueTrackerClient>,
        agent: Arc<dyn AgentDriver>,
        git: Arc<dyn GitOps>,
        config: Arc<dyn ConfigLoader>,
        clock: SharedClock,
    ) -> Self {
        Self {
            code_host,
            issue_tracker,
            agent,
            git,
            config,
            clock,
            on_build_event: None,
            max_fix_attempts: 3,
        }
    }

    pub fn with_build_event_callback(mut self, callback: BuildEventCallback) -> Self {
        self.on_build_event = Some(callback);
        self
    }

    pub fn with_max_fix_attempts(mut self, max: u32) -> Self {
        self.max_fix_attempts = max;
        self
    }
}
