// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared in-memory `Store` test double used by every action and
//! transition-wiring test in this crate. Not a production implementation —
//! see `ralph-storage` for that.

use async_trait::async_trait;
use parking_lot::Mutex;
use ralph_core::{
    ActivityLogEntry, Issue, IssueId, IssueState, Project, ProjectId, Store, StoreError, Tx,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct MemStore {
    projects: Arc<Mutex<HashMap<String, Project>>>,
    issues: Arc<Mutex<HashMap<String, Issue>>>,
    activity: Arc<Mutex<Vec<ActivityLogEntry>>>,
}

impl MemStore {
    pub fn seed_project(&self, project: Project) {
        self.projects.lock().insert(project.id.to_string(), project);
    }

    pub fn seed_issue(&self, issue: Issue) {
        self.issues.lock().insert(issue.id.to_string(), issue);
    }

    pub fn activity_for(&self, issue_id: &IssueId) -> Vec<ActivityLogEntry> {
        self.activity.lock().iter().filter(|e| e.issue_id == *issue_id).cloned().collect()
    }
}

pub struct MemTx {
    projects: Arc<Mutex<HashMap<String, Project>>>,
    issues: Arc<Mutex<HashMap<String, Issue>>>,
    activity: Arc<Mutex<Vec<ActivityLogEntry>>>,
    pending_issue: Option<Issue>,
    pending_activity: Vec<ActivityLogEntry>,
}

#[async_trait]
impl Store for MemStore {
    async fn get_project(&self, id: &ProjectId) -> Result<Project, StoreError> {
        self.projects.lock().get(id.as_str()).cloned().ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.lock().values().cloned().collect())
    }

    async fn put_project(&self, project: Project) -> Result<(), StoreError> {
        self.projects.lock().insert(project.id.to_string(), project);
        Ok(())
    }

    async fn get_issue(&self, id: &IssueId) -> Result<Issue, StoreError> {
        self.issues.lock().get(id.as_str()).cloned().ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn get_issue_by_tracker_id(
        &self,
        project_id: &ProjectId,
        tracker_id: &str,
    ) -> Result<Option<Issue>, StoreError> {
        Ok(self
            .issues
            .lock()
            .values()
            .find(|i| i.project_id == *project_id && i.tracker_id == tracker_id)
            .cloned())
    }

    async fn create_issue(&self, issue: Issue) -> Result<(), StoreError> {
        self.issues.lock().insert(issue.id.to_string(), issue);
        Ok(())
    }

    async fn update_issue(&self, issue: Issue) -> Result<(), StoreError> {
        self.issues.lock().insert(issue.id.to_string(), issue);
        Ok(())
    }

    async fn delete_issue(&self, id: &IssueId) -> Result<(), StoreError> {
        self.activity.lock().retain(|e| e.issue_id != *id);
        self.issues.lock().remove(id.as_str());
        Ok(())
    }

    async fn list_issues(&self, project_id: &ProjectId, states: &[IssueState]) -> Result<Vec<Issue>, StoreError> {
        Ok(self
            .issues
            .lock()
            .values()
            .filter(|i| i.project_id == *project_id && states.contains(&i.state))
            .cloned()
            .collect())
    }

    async fn append_activity(&self, entry: ActivityLogEntry) -> Result<(), StoreError> {
        self.activity.lock().push(entry);
        Ok(())
    }

    async fn list_activity(&self, issue_id: &IssueId) -> Result<Vec<ActivityLogEntry>, StoreError> {
        Ok(self.activity_for(issue_id))
    }

    async fn begin(&self) -> Result<Box<dyn Tx>, StoreError> {
        Ok(Box::new(MemTx {
            projects: self.projects.clone(),
            issues: self.issues.clone(),
            activity: self.activity.clone(),
            pending_issue: None,
            pending_activity: Vec::new(),
        }))
    }
}

#[async_trait]
impl Tx for MemTx {
    async fn get_issue(&mut self, id: &IssueId) -> Result<Issue, StoreError> {
        self.issues.lock().get(id.as_str()).cloned().ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_issue(&mut self, issue: Issue) -> Result<(), StoreError> {
        self.pending_issue = Some(issue);
        Ok(())
    }

    async fn append_activity(&mut self, entry: ActivityLogEntry) -> Result<(), StoreError> {
        self.pending_activity.push(entry);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        if let Some(issue) = self.pending_issue {
            self.issues.lock().insert(issue.id.to_string(), issue);
        }
        self.activity.lock().extend(self.pending_activity);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}
