// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable store contract.
//!
//! The store is the single-writer home for projects, issues, and the
//! activity log. Plain read/write methods serve the pollers' cursor bumps
//! and lookups; [`Tx`] is the short-lived transactional handle the state
//! machine uses to pair a state mutation with its activity row atomically.

use crate::activity::ActivityLogEntry;
use crate::error::StoreError;
use crate::issue::{Issue, IssueId, IssueState};
use crate::project::{Project, ProjectId};
use async_trait::async_trait;

/// Typed read/write operations over projects, issues, and the activity log.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_project(&self, id: &ProjectId) -> Result<Project, StoreError>;
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    async fn put_project(&self, project: Project) -> Result<(), StoreError>;

    async fn get_issue(&self, id: &IssueId) -> Result<Issue, StoreError>;
    async fn get_issue_by_tracker_id(
        &self,
        project_id: &ProjectId,
        tracker_id: &str,
    ) -> Result<Option<Issue>, StoreError>;
    async fn create_issue(&self, issue: Issue) -> Result<(), StoreError>;

    /// Non-transactional update. Used by pollers to persist cursor
    /// advances (`last_review_id`, `last_check_sha`, …) when no state
    /// transition fires this tick — those writes have no paired activity
    /// row and don't need the `Tx` ceremony.
    async fn update_issue(&self, issue: Issue) -> Result<(), StoreError>;

    /// Deletes activity rows before the issue row, satisfying the FK
    /// cascade ordering invariant.
    async fn delete_issue(&self, id: &IssueId) -> Result<(), StoreError>;

    /// Issues in `project_id` whose state is one of `states`. Both pollers
    /// use this to find their watched set each tick.
    async fn list_issues(
        &self,
        project_id: &ProjectId,
        states: &[IssueState],
    ) -> Result<Vec<Issue>, StoreError>;

    async fn append_activity(&self, entry: ActivityLogEntry) -> Result<(), StoreError>;
    async fn list_activity(&self, issue_id: &IssueId) -> Result<Vec<ActivityLogEntry>, StoreError>;

    /// Open a short-lived transaction scoped to a single logical step
    /// (state change + activity row). Callers MUST re-read the issue via
    /// [`Tx::get_issue`] before mutating it inside the transaction.
    async fn begin(&self) -> Result<Box<dyn Tx>, StoreError>;
}

/// Transactional handle scoped to one logical step.
///
/// The state machine's [`crate::transition::TransitionRegistry::execute`]
/// is the canonical caller: re-read, mutate, write issue, append activity
/// row, commit — all inside one `Tx`.
#[async_trait]
pub trait Tx: Send {
    async fn get_issue(&mut self, id: &IssueId) -> Result<Issue, StoreError>;
    async fn update_issue(&mut self, issue: Issue) -> Result<(), StoreError>;
    async fn append_activity(&mut self, entry: ActivityLogEntry) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
