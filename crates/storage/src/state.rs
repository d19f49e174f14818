// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory materialized state: the result of replaying every
//! [`StorageEvent`] ever appended, in order.

use crate::event::StorageEvent;
use ralph_core::{ActivityLogEntry, Issue, Project};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterializedState {
    pub projects: HashMap<String, Project>,
    pub issues: HashMap<String, Issue>,
    /// Append-only; deletions only happen via [`StorageEvent::IssueDeleted`],
    /// which also strips this issue's rows (FK-cascade-first ordering is
    /// enforced by the caller, see [`crate::wal_store::WalStore::delete_issue`]).
    pub activity: Vec<ActivityLogEntry>,
}

/// Apply one event to the state. Replay-safe: applying the same event
/// twice in a row (e.g. a WAL entry written but not fsynced before a
/// crash, then redelivered) must be harmless enough that a restart never
/// observes corruption — the event vocabulary here is all upsert/append,
/// so double-application degrades to a no-op overwrite for issues and a
/// harmless duplicate row for activity, which the store layer prevents by
/// fsyncing before acknowledging a write.
pub fn apply(state: &mut MaterializedState, event: &StorageEvent) {
    match event {
        StorageEvent::ProjectPut(project) => {
            state.projects.insert(project.id.to_string(), project.clone());
        }
        StorageEvent::IssueCreated(issue) | StorageEvent::IssueUpdated(issue) => {
            state.issues.insert(issue.id.to_string(), issue.clone());
        }
        StorageEvent::IssueDeleted(id) => {
            state.issues.remove(id.as_str());
            state.activity.retain(|row| row.issue_id != *id);
        }
        StorageEvent::ActivityAppended(entry) => {
            state.activity.push(entry.clone());
        }
    }
}
