// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`ralph_core::Store`] implementation backed by the write-ahead log.
//!
//! A single [`parking_lot::Mutex`] guards both the WAL file handle and the
//! materialized state so that "append to WAL" and "apply to memory" never
//! observe each other out of order — that pairing is what lets recovery
//! trust the snapshot-plus-replay reconstruction.

use crate::checkpoint::{self, CheckpointError, Checkpointer};
use crate::event::StorageEvent;
use crate::state::{self, MaterializedState};
use crate::wal::{Wal, WalError};
use async_trait::async_trait;
use parking_lot::Mutex;
use ralph_core::{ActivityLogEntry, Issue, IssueId, IssueState, Project, ProjectId, Store, StoreError, Tx};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    Wal(#[from] WalError),
}

struct Inner {
    state: MaterializedState,
    wal: Wal,
}

#[derive(Clone)]
pub struct WalStore {
    inner: Arc<Mutex<Inner>>,
    checkpointer: Arc<Checkpointer>,
}

impl WalStore {
    pub fn open(snapshot_path: PathBuf, wal_path: PathBuf) -> Result<Self, OpenError> {
        let (state, next_seq) = checkpoint::load_snapshot(&snapshot_path, &wal_path)?;
        let wal = Wal::open(&wal_path, next_seq)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner { state, wal })),
            checkpointer: Arc::new(Checkpointer::new(snapshot_path, wal_path)),
        })
    }

    /// Snapshot the current state and start a fresh WAL file. Intended to
    /// be called periodically by the daemon, not per-write.
    pub fn checkpoint(&self, now: chrono::DateTime<chrono::Utc>) -> Result<(), OpenError> {
        let mut guard = self.inner.lock();
        let seq = guard.wal.next_seq().saturating_sub(1);
        let wal = self.checkpointer.checkpoint(&guard.state, seq, now)?;
        guard.wal = wal;
        Ok(())
    }

    fn append(&self, event: StorageEvent) -> Result<(), StoreError> {
        let mut guard = self.inner.lock();
        guard.wal.append(event.clone()).map_err(StoreError::other)?;
        state::apply(&mut guard.state, &event);
        Ok(())
    }
}

#[async_trait]
impl Store for WalStore {
    async fn get_project(&self, id: &ProjectId) -> Result<Project, StoreError> {
        self.inner
            .lock()
            .state
            .projects
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.inner.lock().state.projects.values().cloned().collect())
    }

    async fn put_project(&self, project: Project) -> Result<(), StoreError> {
        self.append(StorageEvent::ProjectPut(project))
    }

    async fn get_issue(&self, id: &IssueId) -> Result<Issue, StoreError> {
        self.inner
            .lock()
            .state
            .issues
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn get_issue_by_tracker_id(
        &self,
        project_id: &ProjectId,
        tracker_id: &str,
    ) -> Result<Option<Issue>, StoreError> {
        Ok(self
            .inner
            .lock()
            .state
            .issues
            .values()
            .find(|issue| issue.project_id == *project_id && issue.tracker_id == tracker_id)
            .cloned())
    }

    async fn create_issue(&self, issue: Issue) -> Result<(), StoreError> {
        self.append(StorageEvent::IssueCreated(issue))
    }

    async fn update_issue(&self, issue: Issue) -> Result<(), StoreError> {
        self.append(StorageEvent::IssueUpdated(issue))
    }

    async fn delete_issue(&self, id: &IssueId) -> Result<(), StoreError> {
        self.append(StorageEvent::IssueDeleted(*id))
    }

    async fn list_issues(
        &self,
        project_id: &ProjectId,
        states: &[IssueState],
    ) -> Result<Vec<Issue>, StoreError> {
        Ok(self
            .inner
            .lock()
            .state
            .issues
            .values()
            .filter(|issue| issue.project_id == *project_id && states.contains(&issue.state))
            .cloned()
            .collect())
    }

    async fn append_activity(&self, entry: ActivityLogEntry) -> Result<(), StoreError> {
        self.append(StorageEvent::ActivityAppended(entry))
    }

    async fn list_activity(&self, issue_id: &IssueId) -> Result<Vec<ActivityLogEntry>, StoreError> {
        Ok(self
            .inner
            .lock()
            .state
            .activity
            .iter()
            .filter(|row| row.issue_id == *issue_id)
            .cloned()
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn Tx>, StoreError> {
        Ok(Box::new(WalTx { inner: self.inner.clone(), pending: Vec::new() }))
    }
}

/// Transactional handle: buffers events in memory and only touches the
/// WAL/state on [`WalTx::commit`], so a dropped or rolled-back
/// transaction leaves nothing behind.
struct WalTx {
    inner: Arc<Mutex<Inner>>,
    pending: Vec<StorageEvent>,
}

#[async_trait]
impl Tx for WalTx {
    async fn get_issue(&mut self, id: &IssueId) -> Result<Issue, StoreError> {
        for event in self.pending.iter().rev() {
            match event {
                StorageEvent::IssueCreated(issue) | StorageEvent::IssueUpdated(issue)
                    if issue.id == *id =>
                {
                    return Ok(issue.clone());
                }
                _ => {}
            }
        }
        self.inner
            .lock()
            .state
            .issues
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_issue(&mut self, issue: Issue) -> Result<(), StoreError> {
        self.pending.push(StorageEvent::IssueUpdated(issue));
        Ok(())
    }

    async fn append_activity(&mut self, entry: ActivityLogEntry) -> Result<(), StoreError> {
        self.pending.push(StorageEvent::ActivityAppended(entry));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut guard = self.inner.lock();
        for event in &self.pending {
            guard.wal.append(event.clone()).map_err(StoreError::other)?;
        }
        for event in self.pending {
            state::apply(&mut guard.state, &event);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}
