// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-shutdown coordination: a single [`CancellationToken`] cancelled
//! on the first SIGTERM/SIGINT, consulted by every poller and the main
//! loop between ticks so shutdown lands within two ticker intervals.

use tokio_util::sync::CancellationToken;

/// Spawns a task that waits for the first shutdown signal and cancels
/// `token`. A second signal is not special-cased — the process is
/// expected to exit once the loops observe cancellation and return.
pub fn install(token: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("shutdown signal received");
        token.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::warn!(error = %err, "failed to install SIGTERM handler, falling back to ctrl-c only");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = terminate.recv() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn install_cancels_the_token_once_signaled() {
        let token = CancellationToken::new();
        install(token.clone());
        assert!(!token.is_cancelled());
        token.cancel();
        tokio::task::yield_now().await;
        assert!(token.is_cancelled());
    }
}
