//! Ledger starter library: a small native client for the consensus,
//! contract, and token services, plus the demo scenarios built on it.

pub mod config;
pub mod explorer;
pub mod ledger;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod scenarios;

pub use config::StarterConfig;
pub use ledger::{Client, LedgerError, LedgerResult};
pub use lifecycle::Shutdown;
pub use scenarios::{ScenarioContext, ScenarioError};
