//! Gas Module
//!
//! Gas price strategy for swap submissions, plus the startup table that
//! shows what each gas option would cost at the current network price.
//!
//! Created: 2026-02-03

pub mod strategy;

pub use strategy::{fetch_plan, format_gwei, format_native, quote};

use crate::types::GasOption;
use alloy::primitives::U256;
use tracing::info;

/// Gas units used for the startup fee estimate (a typical wrap)
pub const FEE_ESTIMATE_GAS_UNITS: u64 = 60_000;

/// One row of the gas option table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasOptionRow {
    pub option: GasOption,
    pub gas_price: u128,
    pub estimated_fee: U256,
}

/// Price and estimated fee for every option at `network_price`.
/// Rows are cheapest first. No tip floor is applied here.
pub fn option_table(network_price: u128, gas_units: u64) -> Vec<GasOptionRow> {
    GasOption::ALL
        .iter()
        .map(|&option| {
            let gas_price = option.apply(network_price);
            GasOptionRow {
                option,
                gas_price,
                estimated_fee: U256::from(gas_price) * U256::from(gas_units),
            }
        })
        .collect()
}

/// Log the option table
pub fn log_option_table(network_price: u128) {
    info!("===================== Current gas fee options =====================");
    for row in option_table(network_price, FEE_ESTIMATE_GAS_UNITS) {
        info!(
            "⛽ {:<10} : {:>16} Gwei | Est. fee: {} POL",
            row.option.to_string(),
            format_gwei(row.gas_price),
            format_native(row.estimated_fee)
        );
    }
    info!("===================================================================");
}
