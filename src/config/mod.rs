//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize, defaults for missing fields)
//!     → loader.rs (overlay ACCOUNT_ID / PRIVATE_KEY_HEX / NETWORK)
//!     → validation.rs (semantic checks, all errors at once)
//!     → StarterConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Environment wins over the file so secrets can stay out of it
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::StarterConfig;
pub use validation::ValidationError;
