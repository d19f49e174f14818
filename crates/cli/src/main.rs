// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ralph`: operator-facing CLI over the durable store `ralphd` also
//! writes to. Reads and writes the same snapshot+WAL files directly —
//! there is no daemon IPC socket to talk to, so the daemon should be
//! stopped (or tolerant of a concurrent reader) while the CLI runs
//! mutating commands like `project add`.

mod commands;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{issue, project, status};
use exit_error::ExitError;
use output::OutputFormat;
use ralph_core::Store;
use ralph_storage::WalStore;
use std::sync::Arc;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Parser)]
#[command(name = "ralph", version = VERSION, about = "Autonomous issue-to-pull-request agent")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Command {
    /// Register and list projects
    Project(project::ProjectArgs),
    /// Inspect issues and their activity log
    Issue(issue::IssueArgs),
    /// One-shot summary across every registered project
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let state_dir = ralph_daemon::env::state_dir();
    std::fs::create_dir_all(&state_dir)?;
    let store: Arc<dyn Store> =
        Arc::new(WalStore::open(state_dir.join("snapshot.json"), state_dir.join("wal.log"))?);

    let result = match cli.command {
        Command::Project(args) => project::handle(&store, args.command, cli.format).await,
        Command::Issue(args) => issue::handle(&store, args.command, cli.format).await,
        Command::Status => status::handle(&store, cli.format).await,
    };

    if let Err(err) = result {
        if let Some(exit_err) = err.downcast_ref::<ExitError>() {
            eprintln!("{exit_err}");
            std::process::exit(exit_err.code);
        }
        return Err(err);
    }
    Ok(())
}
