// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Refine action: `refining → waiting_approval`. Fetches tracker context,
//! asks the agent for an implementation plan, saves it, and posts it
//! back to the tracker.

use super::{from_agent, from_issue_tracker};
use crate::deps::ActionDeps;
use crate::event_log::EventLogHandler;
use crate::prompts::render_refine_prompt;
use async_trait::async_trait;
use ralph_core::{ActionError, Issue, Store, TransitionAction};
use std::sync::Arc;

/// Cap on agent turns spent producing a plan. Refinement is a single
/// focused pass, not an open-ended coding session.
const REFINE_MAX_TURNS: u32 = 10;

const QUESTIONS_MARKER: &str = "type: questions";

pub struct RefineAction {
    deps: Arc<ActionDeps>,
}

impl RefineAction {
    pub fn new(deps: Arc<ActionDeps>) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl TransitionAction for RefineAction {
    async fn run(&self, issue: &Issue, store: &dyn Store) -> Result<(), ActionError> {
        let project = store.get_project(&issue.project_id).await?;

        let comments = self
            .deps
            .issue_tracker
            .fetch_comments(&issue.tracker_id)
            .await
            .map_err(from_issue_tracker)?;

        let prompt = render_refine_prompt(issue, &comments);

        let handler = EventLogHandler::new(
            issue.id,
            store,
            self.deps.clock.clone(),
            self.deps.on_build_event.clone(),
        );

        let response = self
            .deps
            .agent
            .invoke_with_events(&prompt, &project.checkout_root, REFINE_MAX_TURNS, &handler)
            .await
            .map_err(from_agent)?;

        let needs_clarification = response.contains(QUESTIONS_MARKER);
        let reply = if needs_clarification {
            response.clone()
        } else {
            format!("{response}\n\nReply with `type: approved` to proceed.")
        };

        self.deps
            .issue_tracker
            .post_comment(&issue.tracker_id, &reply)
            .await
            .map_err(from_issue_tracker)?;

        let mut updated = issue.clone();
        updated.plan = response;
        updated.touch(self.deps.clock.now());
        store.update_issue(updated).await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "refine"
    }
}
