//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Env overlay → Validate → Init logging → Build client
//!
//! Shutdown (shutdown.rs):
//!     Client::close() → broadcast → subscription tasks exit
//!
//! Signals (signals.rs):
//!     Ctrl-C during a hold → end the hold early → normal close
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then logging, then the client
//! - Scenarios never exit the process directly; they return and the caller closes
//! - Shutdown is a broadcast so any number of subscriptions observe it

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
