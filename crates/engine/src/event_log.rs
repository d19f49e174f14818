// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fans the agent driver's event stream into durable `build_event`
//! activity rows plus an optional live callback, per issue.

use crate::deps::BuildEventCallback;
use async_trait::async_trait;
use ralph_adapters::{AgentEvent, AgentEventHandler};
use ralph_core::{ActivityLogEntry, Clock, EventType, IssueId, Store};
use std::sync::Arc;

/// Borrows the action's `&dyn Store` for the duration of one agent
/// invocation — actions never own an `Arc<dyn Store>`, so this avoids
/// forcing one into existence just to satisfy a handler.
pub struct EventLogHandler<'a> {
    issue_id: IssueId,
    store: &'a dyn Store,
    clock: Arc<dyn Clock>,
    on_build_event: Option<BuildEventCallback>,
}

impl<'a> EventLogHandler<'a> {
    pub fn new(
        issue_id: IssueId,
        store: &'a dyn Store,
        clock: Arc<dyn Clock>,
        on_build_event: Option<BuildEventCallback>,
    ) -> Self {
        Self { issue_id, store, clock, on_build_event }
    }
}

#[async_trait]
impl AgentEventHandler for EventLogHandler<'_> {
    async fn on_event(&self, event: AgentEvent) {
        let detail = event.detail();
        if detail.is_empty() {
            return;
        }

        let entry = ActivityLogEntry::new(self.issue_id, EventType::BuildEvent, detail.clone(), self.clock.now());
        if let Err(err) = self.store.append_activity(entry).await {
            tracing::warn!(issue_id = %self.issue_id, error = %err, "failed to persist build_event row");
        }

        if let Some(callback) = &self.on_build_event {
            callback(self.issue_id, detail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemStore;
    use ralph_core::{FakeClock, IssueBuilder};
    use chrono::Utc;
    use parking_lot::Mutex;

    #[tokio::test]
    async fn empty_detail_events_are_skipped() {
        let store = MemStore::default();
        let issue_id = IssueBuilder::default().build().id;
        let clock = Arc::new(FakeClock::new(Utc::now())) as Arc<dyn Clock>;
        let handler = EventLogHandler::new(issue_id, &store, clock, None);

        handler.on_event(AgentEvent::Text(String::new())).await;
        assert!(store.list_activity(&issue_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_empty_events_are_persisted_and_forwarded() {
        let store = MemStore::default();
        let issue_id = IssueBuilder::default().build().id;
        let clock = Arc::new(FakeClock::new(Utc::now())) as Arc<dyn Clock>;
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        let callback: BuildEventCallback = Arc::new(move |_id, detail| seen2.lock().push(detail));
        let handler = EventLogHandler::new(issue_id, &store, clock, Some(callback));

        handler.on_event(AgentEvent::Text("hello".into())).await;

        let rows = store.list_activity(&issue_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].detail, "hello");
        assert_eq!(seen.lock().as_slice(), ["hello".to_string()]);
    }
}
