// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log: the durability mechanism underneath
//! [`crate::wal_store::WalStore`]. Every accepted write is appended here
//! and fsynced before the caller is told it succeeded; a snapshot plus
//! the WAL entries after it are enough to reconstruct
//! [`crate::state::MaterializedState`] after a crash at any point.

use crate::event::StorageEvent;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("another process holds the WAL lock for {0}")]
    Locked(String),
    #[error("corrupt WAL entry at line {line}: {source}")]
    Corrupt { line: usize, source: serde_json::Error },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub event: StorageEvent,
}

/// An open, exclusively-locked WAL file positioned for appending.
pub struct Wal {
    file: File,
    next_seq: u64,
}

impl Wal {
    /// Open (creating if absent) and take an exclusive advisory lock on
    /// the WAL file at `path`, enforcing the single-writer-per-deployment
    /// assumption. `next_seq` is the sequence number the first appended
    /// entry will receive; callers compute it from the last snapshot plus
    /// whatever entries [`replay`] returned.
    pub fn open(path: &Path, next_seq: u64) -> Result<Self, WalError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        file.try_lock_exclusive()
            .map_err(|_| WalError::Locked(path.display().to_string()))?;
        Ok(Self { file, next_seq })
    }

    /// Append one event, fsync, and return its assigned sequence number.
    pub fn append(&mut self, event: StorageEvent) -> Result<u64, WalError> {
        let seq = self.next_seq;
        let entry = WalEntry { seq, event };
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.sync_data()?;
        self.next_seq += 1;
        Ok(seq)
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }
}

/// Replay every WAL entry in `path` with `seq > after_seq`, in order.
///
/// Used at startup after loading the latest snapshot, and by tests that
/// want to assert on exactly what was durably recorded.
pub fn replay(path: &Path, after_seq: u64) -> Result<Vec<WalEntry>, WalError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let entry: WalEntry = serde_json::from_str(&line)
            .map_err(|source| WalError::Corrupt { line: idx + 1, source })?;
        if entry.seq > after_seq {
            entries.push(entry);
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ralph_core::IssueBuilder;
    use tempfile::tempdir;

    #[test]
    fn append_assigns_increasing_sequence_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wal.log");
        let mut wal = Wal::open(&path, 0).unwrap();

        let seq1 = wal.append(StorageEvent::IssueCreated(IssueBuilder::default().build())).unwrap();
        let seq2 = wal.append(StorageEvent::IssueCreated(IssueBuilder::default().build())).unwrap();

        assert_eq!(seq1, 0);
        assert_eq!(seq2, 1);
    }

    #[test]
    fn replay_returns_only_entries_after_the_given_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wal.log");
        {
            let mut wal = Wal::open(&path, 0).unwrap();
            for _ in 0..5 {
                wal.append(StorageEvent::IssueCreated(IssueBuilder::default().build())).unwrap();
            }
        }

        let entries = replay(&path, 2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].seq, 3);
        assert_eq!(entries[1].seq, 4);
    }

    #[test]
    fn replay_on_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.log");
        assert!(replay(&path, 0).unwrap().is_empty());
    }

    #[test]
    fn second_open_while_locked_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wal.log");
        let _wal = Wal::open(&path, 0).unwrap();
        assert!(matches!(Wal::open(&path, 0), Err(WalError::Locked(_))));
    }
}
