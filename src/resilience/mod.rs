//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to a consensus node:
//!     → timeouts.rs (every call has a deadline)
//!     → On BUSY or transient failure: retries.rs (attempt budget, backoff)
//!     → backoff.rs (exponential delay with jitter)
//!     → next node from the selector
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every network call has a deadline
//! - Only BUSY prechecks and transient transport errors are retried
//! - Retries rotate nodes; a failing node cools down in the selector

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::RetryPolicy;
pub use timeouts::with_timeout;
