//! Retry policy for node requests.
//!
//! # Responsibilities
//! - Decide whether a failed attempt may be retried
//! - Compute the delay before the next attempt
//!
//! # Design Decisions
//! - Precheck BUSY and transient transport errors are retryable
//! - Any other precheck status is final; resubmitting would fail the same way
//! - Jittered backoff keeps concurrent clients from retrying in lockstep

use std::time::Duration;

use crate::ledger::types::LedgerError;
use crate::resilience::backoff::backoff_delay;

/// Attempt budget and backoff bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay_ms: 250,
            max_delay_ms: 8_000,
        }
    }
}

impl RetryPolicy {
    /// Whether attempt number `attempt` (1-based) may be followed by another.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Whether `error` is worth retrying on another node.
    pub fn is_retryable(&self, error: &LedgerError) -> bool {
        match error {
            LedgerError::Precheck { status, .. } => status.is_retryable_precheck(),
            other => other.is_transient(),
        }
    }

    /// Delay before attempt `attempt + 1`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        backoff_delay(attempt, self.base_delay_ms, self.max_delay_ms)
    }
}
