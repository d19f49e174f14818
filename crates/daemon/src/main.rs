// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ralphd`: the daemon binary. Wires durable storage, the real adapter
//! implementations, and the reconciler together, then runs until the
//! first SIGTERM/SIGINT.

use ralph_adapters::{FileIssueTrackerClient, GitCliOps, GitHubClient, SubprocessAgentDriver};
use ralph_core::system_clock;
use ralph_daemon::code_host_poller::CodeHostPoller;
use ralph_daemon::config::YamlConfigLoader;
use ralph_daemon::engine_loop::EngineLoop;
use ralph_daemon::issue_tracker_poller::IssueTrackerPoller;
use ralph_daemon::{env, Reconciler};
use ralph_engine::actions::complete::CompleteAction;
use ralph_engine::{build_registry, ActionDeps};
use ralph_storage::WalStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer()).init();

    let state_dir = env::state_dir();
    std::fs::create_dir_all(&state_dir)?;

    let store = Arc::new(WalStore::open(
        state_dir.join("snapshot.json"),
        state_dir.join("wal.log"),
    )?);

    let github_token = env::github_token()?;
    let code_host = Arc::new(GitHubClient::new(github_token));
    let issue_tracker = Arc::new(FileIssueTrackerClient::open(env::tracker_file()).await?);
    let (agent_command, agent_args) = env::agent_command();
    let agent = Arc::new(SubprocessAgentDriver::new(agent_command, agent_args));
    let git = Arc::new(GitCliOps::new());
    let config = Arc::new(YamlConfigLoader);
    let clock = system_clock();

    let deps = Arc::new(ActionDeps::new(
        code_host.clone(),
        issue_tracker.clone(),
        agent,
        git,
        config,
        clock.clone(),
    ));
    let registry = Arc::new(build_registry(deps.clone()));
    let complete_action = Arc::new(CompleteAction::new(deps));

    let issue_tracker_poller = IssueTrackerPoller::new(issue_tracker, store.clone(), clock.clone());
    let code_host_poller = CodeHostPoller::new(code_host, store.clone(), clock.clone(), complete_action);
    let engine_loop = EngineLoop::new(store.clone(), registry, clock);

    let reconciler = Reconciler::new(store.clone(), issue_tracker_poller, code_host_poller, engine_loop);

    let cancel = CancellationToken::new();
    ralph_daemon::signal::install(cancel.clone());

    reconciler
        .run(
            env::tick_interval(),
            env::checkpoint_interval(),
            move |now| store.checkpoint(now),
            cancel,
        )
        .await;

    Ok(())
}
