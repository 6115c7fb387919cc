#![cfg_attr(not(test), no_std)]

//! Fixed-point rules for the collateral lending workspace.
//!
//! Every amount is a raw integer scaled by its asset's own decimal count.
//! Rates are basis points over [`BPS_DENOMINATOR`]. All divisions floor and
//! every operation returns `None` instead of wrapping.

mod reward;
mod risk;
mod valuation;

pub use reward::{expected_return_interest, pro_rata_interest, reward_for};
pub use risk::{
    apply_repayment, health_factor, max_borrow, outstanding, risk_adjusted_collateral,
    HealthFactor,
};
pub use valuation::{pow10, value_of};

// Constants
pub const BPS_DENOMINATOR: i128 = 10_000; // 100% = 10,000 basis points
pub const DEFAULT_LTV_BPS: u32 = 7_000; // 70%
pub const MIN_HEALTH_FACTOR_BPS: i128 = 10_000; // 100%
pub const PRICE_DECIMALS: u32 = 8; // Oracle prices carry 8 decimals
pub const DEFAULT_LOAN_TERM_SECS: u64 = 365 * 86_400;
