//! Ledger service configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the load/mutate/store cycle run by [`crate::Ledger`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// How many times a mutation is attempted before giving up on a
    /// concurrent-modification conflict (values below 1 are treated as 1)
    pub max_attempts: u32,
    /// Pause between attempts, in milliseconds
    ///
    /// A non-zero value sleeps with `tokio::time`, so the ledger must then be
    /// driven by a Tokio runtime with the time driver enabled.
    pub retry_backoff_ms: u64,
    /// Re-check balance/totals/collections consistency before every store
    pub verify_invariants: bool,
}

impl LedgerConfig {
    /// `retry_backoff_ms` as a `Duration`
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff_ms: 0,
            verify_invariants: true,
        }
    }
}
