// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives every issue sitting in a working state through its registered
//! transition. A `LoopExhausted` action error is the one outcome this
//! loop itself turns into a state change: the fix-checks action reports
//! exhaustion but never touches `issue.state` itself, so pausing the
//! issue is this loop's job, not the action's.

use ralph_core::{
    ActionError, Clock, ExecuteError, Issue, IssueState, Project, Store, Transition,
    TransitionRegistry,
};
use ralph_engine::actions::NoopAction;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Every state an issue can sit in waiting for the engine, as opposed to
/// waiting on a human (`waiting_approval`) or the code host
/// (`in_review`), or parked in a terminal state.
const WORKING_STATES: [IssueState; 6] = [
    IssueState::Queued,
    IssueState::Refining,
    IssueState::Approved,
    IssueState::Building,
    IssueState::AddressingFeedback,
    IssueState::FixingChecks,
];

pub struct EngineLoop {
    store: Arc<dyn Store>,
    registry: Arc<TransitionRegistry>,
    clock: Arc<dyn Clock>,
}

impl EngineLoop {
    pub fn new(store: Arc<dyn Store>, registry: Arc<TransitionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { store, registry, clock }
    }

    pub async fn tick_project(&self, project: &Project, cancel: &CancellationToken) {
        let issues = match self.store.list_issues(&project.id, &WORKING_STATES).await {
            Ok(issues) => issues,
            Err(err) => {
                tracing::warn!(project = %project.name, error = %err, "failed to list working issues");
                return;
            }
        };

        for issue in issues {
            if cancel.is_cancelled() {
                return;
            }
            self.drive_issue(&issue).await;
        }
    }

    async fn drive_issue(&self, issue: &Issue) {
        let Some(transition) = self.registry.evaluate(issue) else { return };
        let detail = format!("advanced to {}", transition.to);

        match self.registry.execute(transition, &issue.id, self.store.as_ref(), self.clock.as_ref(), detail).await {
            Ok(()) => {}
            Err(ExecuteError::Action(ActionError::LoopExhausted { attempts })) => {
                self.pause_exhausted(issue, attempts).await;
            }
            Err(ExecuteError::StaleIssue { .. }) => {
                // Another poller already moved this issue on; not an error.
            }
            Err(err) => {
                tracing::warn!(issue_id = %issue.id, error = %err, "transition failed this tick");
            }
        }
    }

    async fn pause_exhausted(&self, issue: &Issue, attempts: u32) {
        let action = Arc::new(NoopAction::new("check_fix_exhausted"));
        let pause = Transition::new(IssueState::FixingChecks, IssueState::Paused, action);
        let detail = format!("paused after {attempts} failed check-fix attempts");
        if let Err(err) =
            self.registry.execute(&pause, &issue.id, self.store.as_ref(), self.clock.as_ref(), detail).await
        {
            tracing::warn!(issue_id = %issue.id, error = %err, "failed to pause issue after loop exhaustion");
        }
    }
}
