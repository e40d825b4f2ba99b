//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cargo test` and when the `test-support` feature is enabled.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Clock frozen at a chosen instant until advanced explicitly.
#[derive(Debug)]
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    /// Start the clock at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start the clock at 2024-05-01T06:00:00Z.
    #[must_use]
    pub fn at_opening() -> Self {
        let opening = Utc
            .with_ymd_and_hms(2024, 5, 1, 6, 0, 0)
            .single()
            .unwrap_or_default();
        Self::new(opening)
    }

    /// Move the clock forward by `minutes`.
    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock() += TimeDelta::minutes(minutes);
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// Password hasher that stores a tagged copy of the password.
///
/// Argon2 is slow in unoptimised builds; use this where hashing strength is
/// irrelevant to the behaviour under test.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

const PLAIN_PREFIX: &str = "plain$";

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("{PLAIN_PREFIX}{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        hash.as_str()
            .strip_prefix(PLAIN_PREFIX)
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHashError::hashing("not a plain-text test hash"))
    }
}
