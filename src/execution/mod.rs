//! Execution Module
//!
//! The swap engine proper: randomized amounts, the single-swap attempt,
//! receipt monitoring and the bounded retry loop around them.
//!
//! Created: 2026-02-03

pub mod amount;
pub mod monitor;
pub mod retry;
pub mod swap;

pub use amount::AmountRange;
pub use monitor::{MonitorSettings, TransactionMonitor};
pub use retry::{RetryController, RetryPolicy};
pub use swap::{SwapAttempt, DEFAULT_SWAP_GAS_LIMIT};
