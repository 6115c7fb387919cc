//! Pre-submission checks
//!
//! Each check replays the ledger's own validation against values the client
//! already read, and returns the [`RejectionKind`] the ledger would answer with.
//! Passing a check is not a guarantee; the ledger decides.

use crate::error::RejectionKind;
use crate::snapshot::{CampaignSnapshot, FunderClaim};
use lending_math::HealthFactor;

/// A borrower's position as last read from the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPosition {
    /// Total collateral value in debt-token units
    pub collateral_value: i128,
    pub ltv_bps: u32,
    pub debt: i128,
    pub repaid: i128,
}

impl LoanPosition {
    pub fn outstanding(&self) -> i128 {
        lending_math::outstanding(self.debt, self.repaid)
    }

    pub fn risk_adjusted(&self) -> Option<i128> {
        lending_math::risk_adjusted_collateral(self.collateral_value, self.ltv_bps)
    }

    pub fn max_borrow(&self) -> Option<i128> {
        Some(lending_math::max_borrow(self.risk_adjusted()?, self.outstanding()))
    }

    pub fn health_factor(&self) -> Option<HealthFactor> {
        lending_math::health_factor(self.risk_adjusted()?, self.outstanding())
    }
}

pub fn check_take_loan(
    position: &LoanPosition,
    amount: i128,
    reserves: i128,
) -> Result<(), RejectionKind> {
    if amount <= 0 {
        return Err(RejectionKind::InvalidAmount);
    }
    let max_borrow = position
        .max_borrow()
        .ok_or(RejectionKind::ArithmeticOverflow)?;
    if amount > max_borrow {
        return Err(RejectionKind::InsufficientCollateral);
    }
    if amount > reserves {
        return Err(RejectionKind::InsufficientLiquidity);
    }
    Ok(())
}

/// `collateral_value_after` is the position's collateral value with the
/// withdrawn amount already removed
pub fn check_withdraw(
    position: &LoanPosition,
    balance: i128,
    amount: i128,
    collateral_value_after: i128,
) -> Result<(), RejectionKind> {
    if amount <= 0 {
        return Err(RejectionKind::InvalidAmount);
    }
    if amount > balance {
        return Err(RejectionKind::InsufficientBalance);
    }

    let after = LoanPosition {
        collateral_value: collateral_value_after,
        ..*position
    };
    match after.health_factor() {
        Some(hf) if hf.is_safe() => Ok(()),
        Some(_) => Err(RejectionKind::HealthFactorViolation),
        None => Err(RejectionKind::ArithmeticOverflow),
    }
}

pub fn check_repay_loan(position: &LoanPosition, amount: i128) -> Result<(), RejectionKind> {
    if amount <= 0 {
        return Err(RejectionKind::InvalidAmount);
    }
    if position.outstanding() <= 0 {
        return Err(RejectionKind::NoActiveLoan);
    }
    Ok(())
}

/// `previous` is the borrower's latest campaign, if there ever was one
pub fn check_start_campaign<A: Clone + Eq>(
    previous: Option<&CampaignSnapshot<A>>,
    target_amount: i128,
    interest_rate_bps: u32,
) -> Result<(), RejectionKind> {
    if target_amount <= 0 {
        return Err(RejectionKind::InvalidAmount);
    }
    if interest_rate_bps as i128 > lending_math::BPS_DENOMINATOR {
        return Err(RejectionKind::InvalidInterestRate);
    }
    if let Some(previous) = previous {
        if previous.is_open {
            return Err(RejectionKind::CampaignAlreadyOpen);
        }
        if previous.funders.iter().any(|(_, claim)| !claim.is_settled()) {
            return Err(RejectionKind::UnsettledFunders);
        }
    }
    Ok(())
}

pub fn check_contribute<A: Clone + Eq>(
    funder: &A,
    borrower: &A,
    campaign: Option<&CampaignSnapshot<A>>,
    amount: i128,
) -> Result<(), RejectionKind> {
    if amount <= 0 {
        return Err(RejectionKind::InvalidAmount);
    }
    if funder == borrower {
        return Err(RejectionKind::Unauthorized);
    }
    match campaign {
        None => Err(RejectionKind::CampaignNotFound),
        Some(campaign) if !campaign.is_open => Err(RejectionKind::CampaignNotOpen),
        Some(_) => Ok(()),
    }
}

pub fn check_close<A>(campaign: Option<&CampaignSnapshot<A>>) -> Result<(), RejectionKind> {
    match campaign {
        None => Err(RejectionKind::CampaignNotFound),
        Some(campaign) if !campaign.is_open => Err(RejectionKind::CampaignAlreadyClosed),
        Some(_) => Ok(()),
    }
}

pub fn check_repay_funder(
    claim: Option<&FunderClaim>,
    principal: i128,
    interest: i128,
) -> Result<(), RejectionKind> {
    let claim = claim.ok_or(RejectionKind::FunderNotFound)?;
    if principal < 0 || interest < 0 {
        return Err(RejectionKind::InvalidAmount);
    }
    if claim.is_settled() {
        return Err(RejectionKind::FunderAlreadySettled);
    }
    if principal == 0 && interest == 0 {
        return Err(RejectionKind::InvalidAmount);
    }
    if principal > claim.outstanding_principal() || interest > claim.outstanding_interest() {
        return Err(RejectionKind::ExceedsClaim);
    }
    Ok(())
}
