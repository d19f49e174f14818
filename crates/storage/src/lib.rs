// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ralph-storage: write-ahead-logged durable store for projects, issues,
//! and the activity log.

mod checkpoint;
mod event;
mod migration;
mod snapshot;
mod state;
mod wal;
mod wal_store;

pub use checkpoint::{load_snapshot, CheckpointError, Checkpointer};
pub use event::StorageEvent;
pub use snapshot::{Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
pub use state::{apply, MaterializedState};
pub use wal::{replay, Wal, WalEntry, WalError};
pub use wal_store::{OpenError, WalStore};
