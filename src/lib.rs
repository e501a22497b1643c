//! Wrap/Unwrap Points Bot Library
//!
//! Automates alternating wrap/unwrap transactions on a wrapper token
//! contract and reports each confirmed swap to the points API.
//!
//! Created: 2026-02-03

pub mod chain;
pub mod config;
pub mod contracts;
pub mod display;
pub mod error;
pub mod execution;
pub mod gas;
pub mod orchestrator;
pub mod reporter;
pub mod types;

// Re-export commonly used types
pub use chain::{AlloyChainClient, ChainClient};
pub use config::{load_config_from_file, BotConfig, RunSettings};
pub use error::{ChainError, ErrorClass, SwapError};
pub use execution::{RetryController, SwapAttempt, TransactionMonitor};
pub use orchestrator::{DelayRange, RunOrchestrator};
pub use reporter::{HttpScoreApi, ScoreReporter};
pub use types::{GasOption, GasPlan, RunState, SwapDirection, SwapIntent, SwapOutcome};
