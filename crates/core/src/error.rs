// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy.
//!
//! Two enums cover the two layers that can fail: [`StoreError`] for the
//! durable store, [`ActionError`] for transition actions. Neither type
//! panics its way out of the engine; every action returns a categorized
//! error that gets logged and, depending on category, retried, swallowed,
//! or escalated to `paused`.

use thiserror::Error;

/// Errors from the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("stale issue: expected state {expected}, found {actual}")]
    StaleIssue { expected: String, actual: String },

    #[error("store error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Retry classification for errors surfaced by external adapters
/// (code host, issue tracker, agent driver, git).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Network failure, 5xx, git push race — retried with backoff inside
    /// the client; surfaced to the caller only on exhaustion.
    Transient,
    /// 4xx, authorization failure — returned up immediately, action fails,
    /// issue state is left unchanged so the next tick re-evaluates.
    PermanentRemote,
    /// "nothing to commit" and similar no-op outcomes — swallowed by the
    /// action, which then proceeds as if it had succeeded without a commit.
    BenignLocal,
}

/// Error returned by a transition action.
///
/// A transition action's postcondition on failure is: no state change, no
/// activity row, and (for [`ErrorClass::Transient`]) a log entry describing
/// what will be retried on the next tick.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("permanent remote failure: {0}")]
    PermanentRemote(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("check-fix loop exhausted after {attempts} attempts")]
    LoopExhausted { attempts: u32 },
}

impl ActionError {
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            ActionError::Transient(_) => Some(ErrorClass::Transient),
            ActionError::PermanentRemote(_) => Some(ErrorClass::PermanentRemote),
            ActionError::Store(_) | ActionError::LoopExhausted { .. } => None,
        }
    }
}

/// Detects git's "nothing to commit" outcome by substring match on the
/// wrapper's returned message.
///
/// This matches the documented over-broad detector: `"exited with code 1"`
/// is also treated as benign, which conflates any generic exit-1 from the
/// git wrapper with a true no-op commit. Narrowing this needs a structured
/// error code from the git-ops adapter; left as-is rather than guessed at.
pub fn is_benign_nothing_to_commit(message: &str) -> bool {
    message.contains("nothing to commit") || message.contains("exited with code 1")
}
