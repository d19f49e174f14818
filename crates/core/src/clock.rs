// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time abstraction so the engine and pollers can be driven by a fake
//! clock in tests instead of the wall clock.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current time.
///
/// Production code is wired to [`SystemClock`]; tests use [`FakeClock`]
/// so that timeout and backoff logic can be driven deterministically.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock whose value is set explicitly and only advances when told to.
///
/// Cloning shares the same underlying instant; advancing through one
/// handle is visible through every clone.
#[derive(Debug, Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { inner: Arc::new(Mutex::new(start)) }
    }

    /// Advance the clock by `duration`, returning the new time.
    pub fn advance(&self, duration: chrono::Duration) -> DateTime<Utc> {
        let mut guard = self.inner.lock();
        *guard += duration;
        *guard
    }

    /// Set the clock to an absolute time.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.inner.lock() = at;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.inner.lock()
    }
}

/// Shared, dynamically dispatched clock handle used throughout the engine
/// and daemon so production and test code share one call path.
pub type SharedClock = Arc<dyn Clock>;

pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_advances_monotonically() {
        let start = Utc::now();
        let clock = FakeClock::new(start);
        assert_eq!(clock.now(), start);
        let next = clock.advance(chrono::Duration::seconds(30));
        assert_eq!(clock.now(), next);
        assert!(next > start);
    }

    #[test]
    fn fake_clock_clones_share_state() {
        let clock = FakeClock::new(Utc::now());
        let clone = clock.clone();
        clock.advance(chrono::Duration::seconds(5));
        assert_eq!(clock.now(), clone.now());
    }
}
