// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ralph-daemon: the long-running reconciler. Ties the issue-tracker
//! poller, the code-host poller, and the engine loop together behind one
//! [`tokio_util::sync::CancellationToken`], ticking every registered
//! project on a fixed interval until shutdown.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod code_host_poller;
pub mod config;
pub mod engine_loop;
pub mod env;
pub mod issue_tracker_poller;
pub mod signal;

use chrono::Utc;
use code_host_poller::CodeHostPoller;
use engine_loop::EngineLoop;
use issue_tracker_poller::IssueTrackerPoller;
use ralph_core::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One reconciliation pass over every registered project: ingest new
/// tracker issues, reconcile the code host, then drive the state machine.
pub struct Reconciler {
    store: Arc<dyn Store>,
    issue_tracker_poller: IssueTrackerPoller,
    code_host_poller: CodeHostPoller,
    engine_loop: EngineLoop,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn Store>,
        issue_tracker_poller: IssueTrackerPoller,
        code_host_poller: CodeHostPoller,
        engine_loop: EngineLoop,
    ) -> Self {
        Self { store, issue_tracker_poller, code_host_poller, engine_loop }
    }

    async fn tick(&self, cancel: &CancellationToken) {
        let projects = match self.store.list_projects().await {
            Ok(projects) => projects,
            Err(err) => {
                tracing::warn!(error = %err, "failed to list projects, skipping this tick");
                return;
            }
        };

        for project in &projects {
            if cancel.is_cancelled() {
                return;
            }
            self.issue_tracker_poller.tick_project(project, cancel).await;
            self.code_host_poller.tick_project(project, cancel).await;
            self.engine_loop.tick_project(project, cancel).await;
        }
    }

    /// Runs ticks on `interval` until `cancel` fires, checkpointing the
    /// store's WAL every `checkpoint_every` ticks' worth of wall-clock time.
    pub async fn run(
        &self,
        interval: Duration,
        checkpoint_every: Duration,
        checkpoint: impl Fn(chrono::DateTime<Utc>) -> Result<(), ralph_storage::OpenError>,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);
        let mut since_checkpoint = Duration::ZERO;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("reconciler shutting down");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick(&cancel).await;
                    since_checkpoint += interval;
                    if since_checkpoint >= checkpoint_every {
                        since_checkpoint = Duration::ZERO;
                        if let Err(err) = checkpoint(Utc::now()) {
                            tracing::warn!(error = %err, "checkpoint failed");
                        }
                    }
                }
            }
        }
    }
}
