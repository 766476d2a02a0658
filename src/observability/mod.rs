//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Client layer produces:
//!     → logging.rs (structured tracing events on stderr)
//!     → metrics.rs (counters and histograms via the metrics facade)
//!
//! Scenario output (status lines, explorer links) goes to stdout and is
//! not part of this subsystem.
//! ```
//!
//! # Design Decisions
//! - Filter comes from RUST_LOG first, then config
//! - Metrics are recorded unconditionally; with no recorder installed they are no-ops
//! - Keys and message contents are never logged

pub mod logging;
pub mod metrics;
