// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ralph issue` — inspect issues and their activity log.

use crate::exit_error::ExitError;
use crate::output::OutputFormat;
use anyhow::Result;
use clap::{Args, Subcommand};
use ralph_core::{IssueId, IssueState, ProjectId, Store};
use std::sync::Arc;

#[derive(Args)]
pub struct IssueArgs {
    #[command(subcommand)]
    pub command: IssueCommand,
}

#[derive(Subcommand)]
pub enum IssueCommand {
    /// List every issue for a project, across all lifecycle states
    List {
        #[arg(long)]
        project: String,
    },
    /// Show one issue's detail plus its activity log
    Show {
        id: String,
    },
}

pub async fn handle(store: &Arc<dyn Store>, command: IssueCommand, format: OutputFormat) -> Result<()> {
    match command {
        IssueCommand::List { project } => {
            let project_id = ProjectId::from_string(project);
            let issues = store.list_issues(&project_id, &IssueState::ALL).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&issues)?),
                OutputFormat::Text => {
                    if issues.is_empty() {
                        println!("no issues for this project");
                        return Ok(());
                    }
                    for issue in &issues {
                        let pr = issue.pr_number.map(|n| format!("#{n}")).unwrap_or_else(|| "-".into());
                        println!(
                            "{:<16} {:<20} {:<10} {}",
                            issue.human_id, issue.state, pr, issue.title
                        );
                    }
                }
            }
            Ok(())
        }
        IssueCommand::Show { id } => {
            let issue_id = IssueId::from_string(&id);
            let issue = store.get_issue(&issue_id).await.map_err(|err| {
                if err.is_not_found() {
                    ExitError::not_found(format!("no such issue: {id}")).into()
                } else {
                    anyhow::anyhow!(err)
                }
            })?;
            let activity = store.list_activity(&issue_id).await?;

            match format {
                OutputFormat::Json => {
                    let payload = serde_json::json!({ "issue": issue, "activity": activity });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Text => {
                    println!("{} — {}", issue.human_id, issue.title);
                    println!("state: {}", issue.state);
                    if let Some(pr) = issue.pr_number {
                        println!("pr: #{pr}");
                    }
                    if let Some(err) = &issue.error_message {
                        println!("error: {err}");
                    }
                    println!("activity:");
                    for entry in &activity {
                        println!("  [{}] {} {}", entry.timestamp, entry.event_type, entry.detail);
                    }
                }
            }
            Ok(())
        }
    }
}
