// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event vocabulary the write-ahead log persists. Every mutation the
//! store accepts is represented as one of these before it touches disk;
//! [`crate::state::apply`] is the only place that turns an event into a
//! change to the in-memory [`crate::state::MaterializedState`].

use ralph_core::{ActivityLogEntry, Issue, IssueId, Project};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StorageEvent {
    ProjectPut(Project),
    IssueCreated(Issue),
    IssueUpdated(Issue),
    IssueDeleted(IssueId),
    ActivityAppended(ActivityLogEntry),
}
