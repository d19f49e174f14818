// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic checkpointing: snapshot the materialized state to disk and
//! start a fresh WAL file, so recovery after a long-running deployment
//! doesn't have to replay months of entries.

use crate::snapshot::{Snapshot, SnapshotError};
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Wal(#[from] WalError),
}

/// Loads the latest snapshot (if any) and replays the WAL entries after
/// it, returning the reconstructed state and the sequence number the
/// next WAL append should use.
pub fn load_snapshot(
    snapshot_path: &Path,
    wal_path: &Path,
) -> Result<(MaterializedState, u64), CheckpointError> {
    let (mut state, mut seq) = match Snapshot::load(snapshot_path) {
        Ok(snapshot) => (snapshot.state, snapshot.seq),
        Err(SnapshotError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            (MaterializedState::default(), 0)
        }
        Err(err) => return Err(err.into()),
    };

    for entry in crate::wal::replay(wal_path, seq)? {
        crate::state::apply(&mut state, &entry.event);
        seq = entry.seq;
    }

    // `seq` is the highest sequence number already applied; the next
    // append must start one past it, unless nothing has ever been
    // written (seq stays 0 and so does the first append).
    let next_seq = if seq == 0 && state.issues.is_empty() && state.projects.is_empty() {
        0
    } else {
        seq + 1
    };
    Ok((state, next_seq))
}

/// Ties a snapshot path and WAL path together and owns the rotation
/// policy: snapshot the current state, then hand back a fresh [`Wal`]
/// positioned right after the snapshotted sequence number.
pub struct Checkpointer {
    snapshot_path: PathBuf,
    wal_path: PathBuf,
}

impl Checkpointer {
    pub fn new(snapshot_path: PathBuf, wal_path: PathBuf) -> Self {
        Self { snapshot_path, wal_path }
    }

    /// Write `state` as of `seq` to the snapshot path, then truncate the
    /// WAL by replacing it with an empty file. The old WAL content is
    /// superseded by the snapshot and safe to drop; callers must hold
    /// their WAL write lock elsewhere while calling this so no write
    /// lands between the snapshot and the truncation.
    pub fn checkpoint(
        &self,
        state: &MaterializedState,
        seq: u64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Wal, CheckpointError> {
        let snapshot = Snapshot::new(seq, state.clone(), now);
        snapshot.save(&self.snapshot_path)?;
        std::fs::write(&self.wal_path, b"")?;
        Ok(Wal::open(&self.wal_path, seq + 1)?)
    }
}
