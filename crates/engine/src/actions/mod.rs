// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transition actions: the side-effecting half of every registered
//! transition. Each action reads the issue and the store but never
//! touches `issue.state`; field writes it needs go through
//! `store.update_issue` directly so the state machine's post-action
//! re-read picks them up.

pub mod address_feedback;
pub mod build;
pub mod complete;
pub mod fix_checks;
pub mod refine;

use async_trait::async_trait;
use ralph_core::{ActionError, Issue, Store, TransitionAction};

pub(crate) fn from_code_host(err: ralph_adapters::CodeHostError) -> ActionError {
    match err {
        ralph_adapters::CodeHostError::Transient(msg) => ActionError::Transient(msg),
        ralph_adapters::CodeHostError::Permanent { status, message } => {
            ActionError::PermanentRemote(format!("{status}: {message}"))
        }
    }
}

pub(crate) fn from_issue_tracker(err: ralph_adapters::IssueTrackerError) -> ActionError {
    match err {
        ralph_adapters::IssueTrackerError::Transient(msg) => ActionError::Transient(msg),
        ralph_adapters::IssueTrackerError::Permanent { status, message } => {
            ActionError::PermanentRemote(format!("{status}: {message}"))
        }
    }
}

pub(crate) fn from_agent(err: ralph_adapters::AgentError) -> ActionError {
    match err {
        ralph_adapters::AgentError::Transient(msg) => ActionError::Transient(msg),
        ralph_adapters::AgentError::NonZeroExit(msg) => ActionError::PermanentRemote(msg),
    }
}

pub(crate) fn from_config(err: crate::config::ConfigError) -> ActionError {
    ActionError::Transient(err.to_string())
}

/// A transition with no external side effect, used for the "pickup"
/// half of a two-step action (`queued → refining`, `approved → building`)
/// so the heavier action only ever matches once the issue is visibly
/// in its working state.
pub struct NoopAction {
    name: &'static str,
}

impl NoopAction {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl TransitionAction for NoopAction {
    async fn run(&self, _issue: &Issue, _store: &dyn Store) -> Result<(), ActionError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
