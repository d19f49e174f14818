// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ralph status` — a one-shot summary across every registered project.

use crate::output::OutputFormat;
use anyhow::Result;
use ralph_core::{IssueState, Store};
use std::sync::Arc;

pub async fn handle(store: &Arc<dyn Store>, format: OutputFormat) -> Result<()> {
    let projects = store.list_projects().await?;

    let mut rows = Vec::new();
    for project in &projects {
        let issues = store.list_issues(&project.id, &IssueState::ALL).await?;
        let working = issues.iter().filter(|i| !i.state.is_terminal()).count();
        let completed = issues.iter().filter(|i| i.state == IssueState::Completed).count();
        let paused = issues.iter().filter(|i| i.state == IssueState::Paused).count();
        rows.push((project.name.clone(), issues.len(), working, completed, paused));
    }

    match format {
        OutputFormat::Json => {
            let payload: Vec<_> = rows
                .iter()
                .map(|(name, total, working, completed, paused)| {
                    serde_json::json!({
                        "project": name,
                        "total": total,
                        "working": working,
                        "completed": completed,
                        "paused": paused,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("no registered projects");
                return Ok(());
            }
            for (name, total, working, completed, paused) in rows {
                println!("{name:<24} total={total} working={working} completed={completed} paused={paused}");
            }
        }
    }
    Ok(())
}
