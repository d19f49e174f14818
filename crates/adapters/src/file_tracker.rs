// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed [`IssueTrackerClient`]: a single JSON document holding a
//! queue of assigned tickets plus their comment threads and statuses.
//! Meant for deployments that feed tickets into ralph from another
//! system (a sync job, a webhook receiver) rather than polling a tracker
//! API directly — the wire format of any particular issue tracker is
//! explicitly out of scope here.

use crate::issue_tracker::{IssueTrackerClient, IssueTrackerError, TrackerComment, TrackerIssue};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FileTrackerState {
    #[serde(default)]
    assigned: Vec<TrackerIssue>,
    #[serde(default)]
    comments: HashMap<String, Vec<TrackerComment>>,
    #[serde(default)]
    statuses: HashMap<String, String>,
}

/// Guards the on-disk document with an in-process mutex; not meant to be
/// shared across OS processes.
pub struct FileIssueTrackerClient {
    path: PathBuf,
    state: Mutex<FileTrackerState>,
}

impl FileIssueTrackerClient {
    pub async fn open(path: PathBuf) -> Result<Self, IssueTrackerError> {
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|err| IssueTrackerError::Transient(format!("invalid tracker file: {err}")))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => FileTrackerState::default(),
            Err(err) => return Err(IssueTrackerError::Transient(err.to_string())),
        };
        Ok(Self { path, state: Mutex::new(state) })
    }

    async fn persist(&self) -> Result<(), IssueTrackerError> {
        let raw = {
            let state = self.state.lock();
            serde_json::to_string_pretty(&*state)
                .map_err(|err| IssueTrackerError::Transient(err.to_string()))?
        };
        tokio::fs::write(&self.path, raw).await.map_err(|err| IssueTrackerError::Transient(err.to_string()))
    }
}

#[async_trait]
impl IssueTrackerClient for FileIssueTrackerClient {
    async fn list_assigned_issues(
        &self,
        _team: &str,
        _assignee: &str,
    ) -> Result<Vec<TrackerIssue>, IssueTrackerError> {
        Ok(self.state.lock().assigned.clone())
    }

    async fn fetch_comments(&self, tracker_id: &str) -> Result<Vec<TrackerComment>, IssueTrackerError> {
        Ok(self.state.lock().comments.get(tracker_id).cloned().unwrap_or_default())
    }

    async fn post_comment(&self, tracker_id: &str, body: &str) -> Result<(), IssueTrackerError> {
        {
            let mut state = self.state.lock();
            let thread = state.comments.entry(tracker_id.to_string()).or_default();
            let next_id = thread.iter().map(|c| c.id).max().unwrap_or(0) + 1;
            thread.push(TrackerComment { id: next_id, body: body.to_string(), author: "ralph".into() });
        }
        self.persist().await
    }

    async fn set_status(&self, tracker_id: &str, status: &str) -> Result<(), IssueTrackerError> {
        {
            let mut state = self.state.lock();
            state.statuses.insert(tracker_id.to_string(), status.to_string());
        }
        self.persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn opening_a_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let client = FileIssueTrackerClient::open(dir.path().join("tracker.json")).await.unwrap();
        let issues = client.list_assigned_issues("ENG", "ralph-bot").await.unwrap();
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn posted_comments_persist_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracker.json");

        let client = FileIssueTrackerClient::open(path.clone()).await.unwrap();
        client.post_comment("T-1", "plan posted").await.unwrap();

        let reopened = FileIssueTrackerClient::open(path).await.unwrap();
        let comments = reopened.fetch_comments("T-1").await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].body, "plan posted");
    }

    #[tokio::test]
    async fn set_status_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracker.json");

        let client = FileIssueTrackerClient::open(path.clone()).await.unwrap();
        client.set_status("T-2", "completed").await.unwrap();

        let reopened = FileIssueTrackerClient::open(path).await.unwrap();
        assert_eq!(reopened.state.lock().statuses.get("T-2").map(String::as_str), Some("completed"));
    }
}
