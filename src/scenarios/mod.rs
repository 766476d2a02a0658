//! Demo scenarios.
//!
//! # Data Flow
//! ```text
//! ScenarioContext { client, config, explorer }
//!     → consensus.rs  topic create → subscribe → submit → hold → close
//!     → contract.rs   deploy → call → execute → call
//!     → token.rs      treasury (account.rs) → NFT create → mint
//!     → account.rs    create-account helper
//! Each step blocks on its receipt, then prints status and explorer links
//! through report.rs.
//! ```
//!
//! # Design Decisions
//! - Scenarios are linear; no retries beyond what the client does
//! - Every scenario returns an outcome struct so runs can be checked
//! - Errors propagate unchanged from the ledger layer

use std::path::PathBuf;

use thiserror::Error;

use crate::config::StarterConfig;
use crate::explorer::Explorer;
use crate::ledger::{Client, GrpcTransport, LedgerError, Transport};

pub mod account;
pub mod consensus;
pub mod contract;
pub mod report;
pub mod token;

/// Errors a scenario can end with.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid bytecode: {0}")]
    Bytecode(String),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// What every scenario runs against.
pub struct ScenarioContext<T: Transport = GrpcTransport> {
    pub client: Client<T>,
    pub config: StarterConfig,
    pub explorer: Explorer,
}
