// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent-driver interface: invokes the AI coding agent as a subprocess
//! and streams its tool-use/text/completion events back to the caller.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("transient: {0}")]
    Transient(String),
    #[error("agent process exited with a non-zero status: {0}")]
    NonZeroExit(String),
}

/// One event in the agent's invocation stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    ToolUse { name: String, detail: String },
    Text(String),
    InvocationDone { num_turns: u32, duration_ms: u64 },
}

impl AgentEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AgentEvent::ToolUse { .. } => "tool_use",
            AgentEvent::Text(_) => "text",
            AgentEvent::InvocationDone { .. } => "invocation_done",
        }
    }

    /// Human-readable detail string for the activity log. Events with no
    /// meaningful detail (e.g. empty-text chunks) return an empty string
    /// so the event-log adapter can skip them.
    pub fn detail(&self) -> String {
        match self {
            AgentEvent::ToolUse { name, detail } => format!("{name}: {detail}"),
            AgentEvent::Text(text) => text.clone(),
            AgentEvent::InvocationDone { num_turns, duration_ms } => {
                format!("done after {num_turns} turns ({duration_ms}ms)")
            }
        }
    }
}

#[async_trait]
pub trait AgentEventHandler: Send + Sync {
    async fn on_event(&self, event: AgentEvent);
}

#[async_trait]
pub trait AgentDriver: Send + Sync {
    /// Invoke the agent with `prompt` in `workdir`, bounded to `max_turns`
    /// turns, streaming events to `handler` as they occur. Returns the
    /// agent's final text response.
    async fn invoke_with_events(
        &self,
        prompt: &str,
        workdir: &Path,
        max_turns: u32,
        handler: &(dyn AgentEventHandler),
    ) -> Result<String, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_use_detail_combines_name_and_detail() {
        let event = AgentEvent::ToolUse { name: "edit".into(), detail: "src/lib.rs".into() };
        assert_eq!(event.detail(), "edit: src/lib.rs");
        assert_eq!(event.name(), "tool_use");
    }

    #[test]
    fn invocation_done_detail_reports_turns_and_duration() {
        let event = AgentEvent::InvocationDone { num_turns: 4, duration_ms: 1200 };
        assert_eq!(event.detail(), "done after 4 turns (1200ms)");
    }
}
