//! Score Reporter
//!
//! Builds the fixed-shape swap record for the points API, posts it, and
//! reads the echoed `id`/`pointsAmount` back as confirmation. Also looks up
//! the wallet's running points total.
//!
//! Created: 2026-02-03

pub mod api;

pub use api::HttpScoreApi;

use crate::error::SwapError;
use crate::types::SwapIntent;
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Gas fee token placeholder (native POL)
pub const GAS_FEE_TOKEN_ADDRESS: Address = Address::ZERO;
pub const GAS_FEE_TOKEN_SYMBOL: &str = "POL";

/// Payload posted for every confirmed swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRecord {
    pub blockchain_id: u64,
    /// 2 = wrap, 3 = unwrap
    #[serde(rename = "type")]
    pub type_code: u8,
    pub wallet_address: Address,
    pub hash: TxHash,
    pub from_token_address: Address,
    pub to_token_address: Address,
    pub from_token_symbol: String,
    pub to_token_symbol: String,
    pub from_amount: String,
    /// Reported equal to `from_amount` (wrap is treated as 1:1)
    pub to_amount: String,
    pub gas_fee_token_address: Address,
    pub gas_fee_token_symbol: String,
    /// Wei, as a decimal string
    pub gas_fee_amount: String,
}

impl SwapRecord {
    pub fn new(
        chain_id: u64,
        intent: &SwapIntent,
        wallet: Address,
        tx_hash: TxHash,
        gas_fee: U256,
    ) -> Self {
        let amount = intent.amount.to_string();
        Self {
            blockchain_id: chain_id,
            type_code: intent.direction.api_type_code(),
            wallet_address: wallet,
            hash: tx_hash,
            from_token_address: intent.from.address,
            to_token_address: intent.to.address,
            from_token_symbol: intent.from.symbol.clone(),
            to_token_symbol: intent.to.symbol.clone(),
            from_amount: amount.clone(),
            to_amount: amount,
            gas_fee_token_address: GAS_FEE_TOKEN_ADDRESS,
            gas_fee_token_symbol: GAS_FEE_TOKEN_SYMBOL.to_string(),
            gas_fee_amount: gas_fee.to_string(),
        }
    }
}

/// `{ id, pointsAmount }` as echoed by the API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAck {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub points_amount: Option<Value>,
}

impl ApiAck {
    /// Both fields present and non-null
    pub fn is_confirmed(&self) -> bool {
        present(&self.id) && present(&self.points_amount)
    }

    pub fn points(&self) -> String {
        display_value(&self.points_amount)
    }
}

impl fmt::Display for ApiAck {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ID: {}, Points: {}", display_value(&self.id), self.points())
    }
}

fn present(value: &Option<Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

fn display_value(value: &Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Transport seam for the points API
#[async_trait]
pub trait ScoreApi: Send + Sync {
    /// POST a swap record. Non-2xx or an unparseable body is `SwapError::Api`.
    async fn submit(&self, record: &SwapRecord) -> Result<ApiAck, SwapError>;

    /// GET the wallet's current points total
    async fn total_points(&self, wallet: Address) -> Result<ApiAck, SwapError>;
}

/// Reports confirmed swaps and looks up points totals
#[derive(Clone)]
pub struct ScoreReporter {
    api: Arc<dyn ScoreApi>,
    chain_id: u64,
}

impl ScoreReporter {
    pub fn new(api: Arc<dyn ScoreApi>, chain_id: u64) -> Self {
        Self { api, chain_id }
    }

    /// Build and post the record for a confirmed swap.
    pub async fn report(
        &self,
        intent: &SwapIntent,
        wallet: Address,
        tx_hash: TxHash,
        gas_fee: U256,
    ) -> Result<ApiAck, SwapError> {
        let record = SwapRecord::new(self.chain_id, intent, wallet, tx_hash, gas_fee);
        let ack = self.api.submit(&record).await?;
        if ack.is_confirmed() {
            info!("✅ API response: {}", ack);
        } else {
            warn!("API accepted the swap without confirming it: {}", ack);
        }
        Ok(ack)
    }

    /// Log the current points total. Errors are logged, never returned.
    pub async fn log_total_points(&self, wallet: Address) {
        match self.api.total_points(wallet).await {
            Ok(ack) => info!("🧊 Current total points: {}", ack.points()),
            Err(e) => warn!("Could not fetch points total: {}", e),
        }
    }
}
