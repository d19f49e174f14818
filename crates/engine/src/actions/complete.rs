// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Complete action: the terminal `* → completed` transition. Invoked
//! out-of-band by the code-host poller when it observes a merged PR, or
//! by any other path that decides an issue is done. Workspace/worktree
//! teardown is the external worktree manager's job, not this engine's —
//! this action only updates the tracker, best-effort.

use crate::deps::ActionDeps;
use async_trait::async_trait;
use ralph_core::{ActionError, Issue, Store, TransitionAction};
use std::sync::Arc;

pub struct CompleteAction {
    deps: Arc<ActionDeps>,
}

impl CompleteAction {
    pub fn new(deps: Arc<ActionDeps>) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl TransitionAction for CompleteAction {
    async fn run(&self, issue: &Issue, _store: &dyn Store) -> Result<(), ActionError> {
        if let Err(err) = self.deps.issue_tracker.set_status(&issue.tracker_id, "completed").await {
            tracing::warn!(issue_id = %issue.id, error = %err, "failed to update tracker status on completion");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "complete"
    }
}
