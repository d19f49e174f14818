// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ralph project` — register and list projects against the local store.

use crate::output::OutputFormat;
use anyhow::Result;
use clap::{Args, Subcommand};
use ralph_core::{Project, ProjectId, Store, TrustedReviewer};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Register a new project against a code-host repository
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        checkout_root: PathBuf,
        #[arg(long)]
        repo_owner: String,
        #[arg(long)]
        repo_name: String,
        #[arg(long)]
        tracker_team: String,
        #[arg(long)]
        tracker_assignee: String,
        #[arg(long, default_value = "ralph/")]
        branch_prefix: String,
        #[arg(long, default_value = "ralph.yaml")]
        config_path: PathBuf,
        #[arg(long, default_value_t = 20)]
        max_iterations: u32,
        /// Login of the one reviewer whose approval/delegations count
        #[arg(long)]
        trusted_reviewer_username: Option<String>,
        #[arg(long)]
        trusted_reviewer_id: Option<i64>,
    },
    /// List registered projects
    List,
}

pub async fn handle(store: &Arc<dyn Store>, command: ProjectCommand, format: OutputFormat) -> Result<()> {
    match command {
        ProjectCommand::Add {
            name,
            checkout_root,
            repo_owner,
            repo_name,
            tracker_team,
            tracker_assignee,
            branch_prefix,
            config_path,
            max_iterations,
            trusted_reviewer_username,
            trusted_reviewer_id,
        } => {
            let project = Project {
                id: ProjectId::new(),
                name,
                checkout_root,
                repo_owner,
                repo_name,
                tracker_team,
                tracker_assignee,
                branch_prefix,
                config_path,
                max_iterations,
                trusted_reviewer: TrustedReviewer {
                    username: trusted_reviewer_username,
                    user_id: trusted_reviewer_id,
                },
            };
            store.put_project(project.clone()).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&project)?),
                OutputFormat::Text => println!("registered project {} ({})", project.name, project.id.as_str()),
            }
            Ok(())
        }
        ProjectCommand::List => {
            let projects = store.list_projects().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&projects)?),
                OutputFormat::Text => {
                    if projects.is_empty() {
                        println!("no registered projects");
                        return Ok(());
                    }
                    for project in &projects {
                        println!(
                            "{:<24} {:<24} {}/{}",
                            project.id.as_str(),
                            project.name,
                            project.repo_owner,
                            project.repo_name
                        );
                    }
                }
            }
            Ok(())
        }
    }
}
