//! Randomized swap amounts
//!
//! Amounts are drawn on a fixed decimal grid strictly inside (min, max),
//! so the reported decimal string and the on-chain units always agree.

use alloy::primitives::U256;
use anyhow::{anyhow, ensure, Result};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    decimal_places: u32,
    token_decimals: u32,
    /// Exclusive grid bounds in 10^-decimal_places steps
    low_step: i64,
    high_step: i64,
}

impl AmountRange {
    /// Range (min, max) exclusive, sampled at `decimal_places`, for a token
    /// with `token_decimals` decimals.
    pub fn new(min: Decimal, max: Decimal, decimal_places: u32, token_decimals: u32) -> Result<Self> {
        ensure!(min >= Decimal::ZERO, "amount min must not be negative");
        ensure!(
            decimal_places <= token_decimals && decimal_places <= 18,
            "amount precision {} exceeds token decimals {}",
            decimal_places,
            token_decimals
        );

        let scale = Decimal::from(10i64.pow(decimal_places));
        let low_step = min
            .checked_mul(scale)
            .and_then(|scaled| scaled.floor().to_i64())
            .ok_or_else(|| anyhow!("amount min {} out of range", min))?;
        let high_step = max
            .checked_mul(scale)
            .and_then(|scaled| scaled.ceil().to_i64())
            .ok_or_else(|| anyhow!("amount max {} out of range", max))?;
        ensure!(
            high_step - low_step >= 2,
            "no {}-decimal amount strictly between {} and {}",
            decimal_places,
            min,
            max
        );

        Ok(Self {
            decimal_places,
            token_decimals,
            low_step,
            high_step,
        })
    }

    /// Draw a fresh amount: (human decimal, base units)
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (Decimal, U256) {
        let steps = rng.gen_range(self.low_step + 1..self.high_step);
        let amount = Decimal::new(steps, self.decimal_places);
        let unit_scale = U256::from(10u64).pow(U256::from(self.token_decimals - self.decimal_places));
        (amount, U256::from(steps as u64) * unit_scale)
    }
}

impl Default for AmountRange {
    /// 0.001 to 0.01, five decimal places, 18-decimal token
    fn default() -> Self {
        Self {
            decimal_places: 5,
            token_decimals: 18,
            low_step: 100,
            high_step: 1_000,
        }
    }
}
