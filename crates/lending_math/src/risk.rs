use crate::{BPS_DENOMINATOR, MIN_HEALTH_FACTOR_BPS};

/// Health of a borrower's position.
///
/// A borrower without outstanding debt has no ratio at all; callers must branch
/// on [`HealthFactor::NoActiveLoan`] before treating the value as a number.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HealthFactor {
    NoActiveLoan,
    /// Risk-adjusted collateral over outstanding debt, in basis points
    Bps(i128),
}

impl HealthFactor {
    /// Safe means no loan, or a ratio at or above [`MIN_HEALTH_FACTOR_BPS`].
    pub fn is_safe(&self) -> bool {
        match self {
            HealthFactor::NoActiveLoan => true,
            HealthFactor::Bps(bps) => *bps >= MIN_HEALTH_FACTOR_BPS,
        }
    }

    pub fn bps(&self) -> Option<i128> {
        match self {
            HealthFactor::NoActiveLoan => None,
            HealthFactor::Bps(bps) => Some(*bps),
        }
    }
}

/// Apply the loan-to-value haircut to a collateral value
///
/// Formula: risk_adjusted = total_value × ltv_bps / 10,000
///
/// Example:
/// - total_value: 1,000,000
/// - ltv: 70% (7,000 basis points)
/// - risk_adjusted: 700,000
pub fn risk_adjusted_collateral(total_value: i128, ltv_bps: u32) -> Option<i128> {
    total_value
        .checked_mul(ltv_bps as i128)?
        .checked_div(BPS_DENOMINATOR)
}

/// Remaining borrowing capacity, never negative.
pub fn max_borrow(risk_adjusted: i128, outstanding: i128) -> i128 {
    risk_adjusted.saturating_sub(outstanding).max(0)
}

/// Health factor of a position
///
/// Formula: health_factor_bps = risk_adjusted × 10,000 / outstanding
///
/// Example:
/// - risk_adjusted: 700,000
/// - outstanding: 400,000
/// - health_factor: 17,500 (175.00%)
pub fn health_factor(risk_adjusted: i128, outstanding: i128) -> Option<HealthFactor> {
    if outstanding <= 0 {
        return Some(HealthFactor::NoActiveLoan);
    }

    let bps = risk_adjusted
        .checked_mul(BPS_DENOMINATOR)?
        .checked_div(outstanding)?;

    Some(HealthFactor::Bps(bps))
}

pub fn outstanding(debt: i128, repaid: i128) -> i128 {
    debt.saturating_sub(repaid).max(0)
}

/// New `repaid` total after a repayment, capped at `debt`.
pub fn apply_repayment(debt: i128, repaid: i128, amount: i128) -> Option<i128> {
    Some(repaid.checked_add(amount)?.min(debt))
}
