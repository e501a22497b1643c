//! Core data structures shared by the gas, execution and reporting layers.
//!
//! Created: 2026-02-03

use alloy::primitives::{Address, TxHash, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Swap direction, fixed per attempt index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Source token -> wrapped token
    Wrap,
    /// Wrapped token -> source token
    Unwrap,
}

impl SwapDirection {
    /// Odd 1-based indices wrap, even indices unwrap.
    pub fn for_index(index: u32) -> Self {
        if index % 2 == 1 {
            SwapDirection::Wrap
        } else {
            SwapDirection::Unwrap
        }
    }

    /// Operation type code expected by the scoring API
    pub fn api_type_code(&self) -> u8 {
        match self {
            SwapDirection::Wrap => 2,
            SwapDirection::Unwrap => 3,
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SwapDirection::Wrap => write!(f, "WRAP"),
            SwapDirection::Unwrap => write!(f, "UNWRAP"),
        }
    }
}

/// Token address + display symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
}

impl TokenInfo {
    pub fn new(address: Address, symbol: impl Into<String>) -> Self {
        Self {
            address,
            symbol: symbol.into(),
        }
    }
}

/// The two sides of the wrap contract.
///
/// `source` is the plain ERC-20 that gets wrapped (needs an allowance),
/// `wrapped` is the wrapper contract itself (exposes wrap/unwrap/paused).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub source: TokenInfo,
    pub wrapped: TokenInfo,
}

impl TokenPair {
    /// (from, to) for a direction
    pub fn route(&self, direction: SwapDirection) -> (&TokenInfo, &TokenInfo) {
        match direction {
            SwapDirection::Wrap => (&self.source, &self.wrapped),
            SwapDirection::Unwrap => (&self.wrapped, &self.source),
        }
    }
}

/// Fee data fetched fresh for every submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    /// Network gas price (wei)
    pub base_gas_price: u128,
    /// Protocol minimum priority tip (wei)
    pub min_priority_tip: u128,
}

/// User-selected gas price multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GasOption {
    /// 1× network price
    Normal,
    /// 85% of network price
    Low,
    /// 2× network price
    Double,
    /// 5× network price
    Quintuple,
}

impl GasOption {
    /// All options in display order (cheapest first)
    pub const ALL: [GasOption; 4] = [
        GasOption::Low,
        GasOption::Normal,
        GasOption::Double,
        GasOption::Quintuple,
    ];

    /// Parse the menu choice: 1=normal, 2=85%, 3=x2, 4=x5. Anything else is normal.
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "2" => GasOption::Low,
            "3" => GasOption::Double,
            "4" => GasOption::Quintuple,
            _ => GasOption::Normal,
        }
    }

    /// Apply the multiplier with integer math (85% truncates).
    pub fn apply(&self, base: u128) -> u128 {
        match self {
            GasOption::Normal => base,
            GasOption::Low => base.saturating_mul(85) / 100,
            GasOption::Double => base.saturating_mul(2),
            GasOption::Quintuple => base.saturating_mul(5),
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            GasOption::Normal => 1.0,
            GasOption::Low => 0.85,
            GasOption::Double => 2.0,
            GasOption::Quintuple => 5.0,
        }
    }
}

impl fmt::Display for GasOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GasOption::Normal => write!(f, "Normal"),
            GasOption::Low => write!(f, "Low (85%)"),
            GasOption::Double => write!(f, "x2"),
            GasOption::Quintuple => write!(f, "x5"),
        }
    }
}

/// Gas price chosen for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPlan {
    pub option: GasOption,
    /// Price (wei) sent with every transaction of this submission
    pub effective_price: u128,
    /// True when the multiplied price was raised to the minimum tip
    pub floored_to_min_tip: bool,
}

/// One wrap or unwrap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapIntent {
    pub direction: SwapDirection,
    /// Human amount (5 decimal places), reported to the API as-is
    pub amount: Decimal,
    /// Same amount in base units (18 decimals)
    pub amount_units: U256,
    pub from: TokenInfo,
    pub to: TokenInfo,
}

/// Minimal receipt view used by the monitor and fee computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    /// None while the transaction is still pending
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Execution status (false = reverted)
    pub success: bool,
}

impl TxReceipt {
    pub fn is_confirmed(&self) -> bool {
        self.block_number.is_some()
    }
}

/// Result of one swap (after retries)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SwapOutcome {
    pub success: bool,
    pub tx_hash: Option<TxHash>,
    pub gas_used: Option<u64>,
    /// receipt.gas_used × submitted gas price (wei)
    pub gas_fee_paid: Option<U256>,
    pub api_reported: bool,
    pub failure_reason: Option<String>,
}

impl SwapOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            failure_reason: Some(reason.into()),
            ..Default::default()
        }
    }
}

/// Per-index context carried through the retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptContext {
    /// 1-based swap index
    pub index: u32,
    pub direction: SwapDirection,
    /// Transient failures consumed so far
    pub retries_used: u32,
}

impl AttemptContext {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            direction: SwapDirection::for_index(index),
            retries_used: 0,
        }
    }
}

/// Final report for one index, handed back to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub context: AttemptContext,
    /// Number of times the swap was submitted (1..=max)
    pub submissions: u32,
    pub outcome: SwapOutcome,
}

/// Accumulated run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunState {
    pub total_requested: u32,
    pub completed: u32,
    pub success_count: u32,
}

impl RunState {
    pub fn new(total_requested: u32) -> Self {
        Self {
            total_requested,
            ..Default::default()
        }
    }

    /// Fold one finished index into the summary
    pub fn record(self, report: &AttemptReport) -> Self {
        Self {
            completed: self.completed + 1,
            success_count: self.success_count + u32::from(report.outcome.success),
            ..self
        }
    }

    pub fn tally(&self) -> String {
        format!("{}/{}", self.success_count, self.total_requested)
    }
}

/// Shorten a hash for display: first 10 chars + "..." + last 4
pub fn shorten_hash(hash: &str) -> String {
    if hash.len() < 15 {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..10], &hash[hash.len() - 4..])
}
