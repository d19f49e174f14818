// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot schema migration. There is exactly one schema version today;
//! this module exists so a future version bump has somewhere to land
//! instead of becoming an ad-hoc branch inside [`crate::snapshot`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("snapshot version {found} is newer than this binary supports (max {max})")]
    TooNew { found: u32, max: u32 },
    #[error("snapshot version {found} is no longer supported (min {min})")]
    TooOld { found: u32, min: u32 },
}

/// Oldest snapshot schema version this binary can still read.
pub const MIN_SUPPORTED_VERSION: u32 = 1;

pub fn check_version(found: u32, current: u32) -> Result<(), MigrationError> {
    if found > current {
        return Err(MigrationError::TooNew { found, max: current });
    }
    if found < MIN_SUPPORTED_VERSION {
        return Err(MigrationError::TooOld { found, min: MIN_SUPPORTED_VERSION });
    }
    Ok(())
}
