//! Alloy-backed ChainClient
//!
//! All sends go through the provider's wallet filler (nonce, chain id,
//! signing). Gas price is always set explicitly so the fee paid can be
//! computed from the submitted price rather than a later market read.
//!
//! Created: 2026-02-03

use super::ChainClient;
use crate::contracts::{IWrappedToken, IERC20};
use crate::error::ChainError;
use crate::types::{FeeQuote, SwapDirection, TxReceipt};
use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::Provider;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct AlloyChainClient<P> {
    provider: Arc<P>,
    wallet: Address,
}

impl<P: Provider + 'static> AlloyChainClient<P> {
    pub fn new(provider: Arc<P>, wallet: Address) -> Self {
        Self { provider, wallet }
    }
}

#[async_trait]
impl<P: Provider + 'static> ChainClient for AlloyChainClient<P> {
    fn wallet_address(&self) -> Address {
        self.wallet
    }

    async fn fee_quote(&self) -> Result<FeeQuote, ChainError> {
        let base_gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::from_transport("gas price", e))?;
        let min_priority_tip = self
            .provider
            .get_max_priority_fee_per_gas()
            .await
            .map_err(|e| ChainError::from_transport("priority fee", e))?;

        debug!("Fee data: gas_price={} min_tip={}", base_gas_price, min_priority_tip);
        Ok(FeeQuote {
            base_gas_price,
            min_priority_tip,
        })
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::from_transport("gas price", e))
    }

    async fn native_balance(&self) -> Result<U256, ChainError> {
        self.provider
            .get_balance(self.wallet)
            .await
            .map_err(|e| ChainError::from_transport("native balance", e))
    }

    async fn token_balance(&self, token: Address) -> Result<U256, ChainError> {
        let contract = IERC20::new(token, Arc::clone(&self.provider));
        contract
            .balanceOf(self.wallet)
            .call()
            .await
            .map_err(|e| ChainError::from_contract("balanceOf", e))
    }

    async fn allowance(&self, token: Address, spender: Address) -> Result<U256, ChainError> {
        let contract = IERC20::new(token, Arc::clone(&self.provider));
        contract
            .allowance(self.wallet, spender)
            .call()
            .await
            .map_err(|e| ChainError::from_contract("allowance", e))
    }

    async fn is_paused(&self, wrapper: Address) -> Result<bool, ChainError> {
        let contract = IWrappedToken::new(wrapper, Arc::clone(&self.provider));
        contract
            .paused()
            .call()
            .await
            .map_err(|e| ChainError::from_contract("paused", e))
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        gas_price: u128,
    ) -> Result<TxHash, ChainError> {
        let contract = IERC20::new(token, Arc::clone(&self.provider));
        let pending = contract
            .approve(spender, amount)
            .gas_price(gas_price)
            .send()
            .await
            .map_err(|e| ChainError::from_contract("approve", e))?;

        Ok(*pending.tx_hash())
    }

    async fn submit_swap(
        &self,
        wrapper: Address,
        direction: SwapDirection,
        amount: U256,
        gas_price: u128,
        gas_limit: u64,
    ) -> Result<TxHash, ChainError> {
        let contract = IWrappedToken::new(wrapper, Arc::clone(&self.provider));
        let pending = match direction {
            SwapDirection::Wrap => contract
                .wrap(amount, self.wallet)
                .gas_price(gas_price)
                .gas(gas_limit)
                .send()
                .await
                .map_err(|e| ChainError::from_contract("wrap", e))?,
            SwapDirection::Unwrap => contract
                .unwrap(amount, self.wallet)
                .gas_price(gas_price)
                .gas(gas_limit)
                .send()
                .await
                .map_err(|e| ChainError::from_contract("unwrap", e))?,
        };

        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>, ChainError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| ChainError::from_transport("transaction receipt", e))?;

        Ok(receipt.map(|r| TxReceipt {
            tx_hash: r.transaction_hash,
            block_number: r.block_number,
            gas_used: r.gas_used,
            success: ReceiptResponse::status(&r),
        }))
    }
}
