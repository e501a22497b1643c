//! Blockchain Client Boundary
//!
//! The swap engine only depends on the `ChainClient` capability set:
//! fee data, balances, receipts, and the handful of contract reads/sends
//! the wrap flow needs. `AlloyChainClient` implements it over any alloy
//! `Provider` that carries a wallet filler.
//!
//! Created: 2026-02-03

pub mod client;
#[cfg(test)]
pub mod mock;

pub use client::AlloyChainClient;

use crate::error::ChainError;
use crate::types::{FeeQuote, SwapDirection, TxReceipt};
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address that signs and receives
    fn wallet_address(&self) -> Address;

    /// Current network gas price and minimum priority tip
    async fn fee_quote(&self) -> Result<FeeQuote, ChainError>;

    /// Network gas price alone, for display
    async fn gas_price(&self) -> Result<u128, ChainError>;

    /// Native (gas token) balance of the wallet
    async fn native_balance(&self) -> Result<U256, ChainError>;

    /// ERC-20 balance of the wallet
    async fn token_balance(&self, token: Address) -> Result<U256, ChainError>;

    async fn allowance(&self, token: Address, spender: Address) -> Result<U256, ChainError>;

    async fn is_paused(&self, wrapper: Address) -> Result<bool, ChainError>;

    /// Broadcast `approve(spender, amount)`; returns once the node accepted it
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        gas_price: u128,
    ) -> Result<TxHash, ChainError>;

    /// Broadcast `wrap`/`unwrap(amount, wallet)` on the wrapper contract
    async fn submit_swap(
        &self,
        wrapper: Address,
        direction: SwapDirection,
        amount: U256,
        gas_price: u128,
        gas_limit: u64,
    ) -> Result<TxHash, ChainError>;

    /// Receipt if the node has one (pending transactions return None)
    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>, ChainError>;
}
