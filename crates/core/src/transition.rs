// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The state machine: a registry of guarded, action-carrying transitions
//! plus the evaluate-then-execute protocol that drives an issue from one
//! state to the next.

use crate::activity::ActivityLogEntry;
use crate::clock::Clock;
use crate::error::{ActionError, StoreError};
use crate::issue::{Issue, IssueId, IssueState};
use crate::store::Store;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// The side-effecting half of a transition.
///
/// Actions read the issue but do not return a mutated copy: any field
/// writes an action needs to make (new `pr_number`, accumulated
/// `check_fix_attempts`, …) go through `store.update_issue` directly so
/// they are visible to the re-read the state machine performs before
/// committing the state change. Actions must never touch `issue.state`.
#[async_trait]
pub trait TransitionAction: Send + Sync {
    async fn run(&self, issue: &Issue, store: &dyn Store) -> Result<(), ActionError>;

    /// Short name used in tracing spans and activity detail strings.
    fn name(&self) -> &'static str;
}

type Condition = Arc<dyn Fn(&Issue) -> bool + Send + Sync>;

/// A `(from, to, condition, action)` tuple registered with the
/// [`TransitionRegistry`].
#[derive(Clone)]
pub struct Transition {
    pub from: IssueState,
    pub to: IssueState,
    condition: Option<Condition>,
    action: Arc<dyn TransitionAction>,
}

impl Transition {
    pub fn new(from: IssueState, to: IssueState, action: Arc<dyn TransitionAction>) -> Self {
        Self { from, to, condition: None, action }
    }

    pub fn with_condition(
        from: IssueState,
        to: IssueState,
        condition: impl Fn(&Issue) -> bool + Send + Sync + 'static,
        action: Arc<dyn TransitionAction>,
    ) -> Self {
        Self { from, to, condition: Some(Arc::new(condition)), action }
    }

    fn matches(&self, issue: &Issue) -> bool {
        issue.state == self.from && self.condition.as_ref().is_none_or(|c| c(issue))
    }
}

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("stale issue: expected state {expected}, found {actual}")]
    StaleIssue { expected: String, actual: String },

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Registry of transitions, the single serialization point for state
/// changes on any given issue.
#[derive(Default, Clone)]
pub struct TransitionRegistry {
    transitions: Vec<Transition>,
}

impl TransitionRegistry {
    pub fn new() -> Self {
        Self { transitions: Vec::new() }
    }

    /// Register a transition. `from`/`to` are typed as [`IssueState`], so
    /// "not a valid state" can't arise at this layer — the enum makes the
    /// rejection structural rather than a runtime check.
    pub fn register(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    /// Returns the first registered transition whose `from` matches the
    /// issue's current state and whose condition is true or absent.
    /// Registration order is the tie-break.
    pub fn evaluate(&self, issue: &Issue) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.matches(issue))
    }

    /// Verify `issue.state == t.from`, run the action outside any
    /// transaction, then re-read and commit the state change plus its
    /// activity row inside a short transaction.
    ///
    /// On any failure before the commit step, the issue is left
    /// untouched: no state change, no activity row.
    pub async fn execute(
        &self,
        t: &Transition,
        issue_id: &IssueId,
        store: &dyn Store,
        clock: &dyn Clock,
        detail: impl Into<String> + Send,
    ) -> Result<(), ExecuteError> {
        let issue = store.get_issue(issue_id).await?;
        if issue.state != t.from {
            return Err(ExecuteError::StaleIssue {
                expected: t.from.to_string(),
                actual: issue.state.to_string(),
            });
        }

        t.action.run(&issue, store).await?;

        let mut tx = store.begin().await?;
        // Re-read inside the transaction: the action may have written
        // fields (pr_number, plan, cursors) via store.update_issue while
        // we held no lock at all. Using the pre-action `issue` here would
        // silently discard those writes.
        let mut fresh = tx.get_issue(issue_id).await?;
        if fresh.state != t.from {
            tx.rollback().await?;
            return Err(ExecuteError::StaleIssue {
                expected: t.from.to_string(),
                actual: fresh.state.to_string(),
            });
        }

        let from = fresh.state;
        fresh.state = t.to;
        fresh.touch(clock.now());
        tx.update_issue(fresh).await?;

        let entry = ActivityLogEntry::state_change(
            *issue_id,
            from.to_string(),
            t.to.to_string(),
            detail,
            clock.now(),
        );
        tx.append_activity(entry).await?;
        tx.commit().await?;
        Ok(())
    }
}
