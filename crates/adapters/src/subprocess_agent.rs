// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess-backed [`AgentDriver`]: runs a configured command with the
//! prompt on stdin and the turns cap passed as an argument, in `workdir`.
//! The concrete AI agent binary is a deployment detail — this driver
//! makes no assumption about which one beyond "reads a prompt on stdin,
//! writes its final answer on stdout".

use crate::agent_driver::{AgentDriver, AgentError, AgentEvent, AgentEventHandler};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub struct SubprocessAgentDriver {
    command: String,
    args: Vec<String>,
}

impl SubprocessAgentDriver {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self { command: command.into(), args }
    }
}

#[async_trait]
impl AgentDriver for SubprocessAgentDriver {
    async fn invoke_with_events(
        &self,
        prompt: &str,
        workdir: &Path,
        max_turns: u32,
        handler: &(dyn AgentEventHandler),
    ) -> Result<String, AgentError> {
        let started = Instant::now();
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg("--max-turns")
            .arg(max_turns.to_string())
            .current_dir(workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| AgentError::Transient(format!("failed to spawn {}: {err}", self.command)))?;

        let mut stdin = child.stdin.take().expect("stdin piped");
        stdin
            .write_all(prompt.as_bytes())
            .await
            .map_err(|err| AgentError::Transient(format!("failed writing prompt: {err}")))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| AgentError::Transient(format!("agent process failed: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentError::NonZeroExit(stderr.trim().to_string()));
        }

        let final_text = String::from_utf8_lossy(&output.stdout).to_string();
        if !final_text.trim().is_empty() {
            handler.on_event(AgentEvent::Text(final_text.clone())).await;
        }
        handler
            .on_event(AgentEvent::InvocationDone {
                num_turns: 1,
                duration_ms: started.elapsed().as_millis() as u64,
            })
            .await;

        Ok(final_text)
    }
}
