use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::LedgerError;
use crate::snapshot::CampaignSnapshot;

/// The authoritative store and executor for campaign settlement
///
/// Every call suspends until the ledger confirms or rejects it. Implementations
/// decode contract errors into [`LedgerError::Rejected`] and never report a
/// failed read as an empty or zero value.
#[async_trait(?Send)]
pub trait LedgerOfRecord {
    type Address: Clone + Eq + Debug;

    async fn collateral_raising_info(
        &self,
        borrower: &Self::Address,
    ) -> Result<CampaignSnapshot<Self::Address>, LedgerError>;

    /// Approve phase: let the campaign contract pull `amount` from the borrower
    ///
    /// Setting the allowance replaces any previous one, so repeating it is
    /// harmless.
    async fn approve(&self, borrower: &Self::Address, amount: i128) -> Result<(), LedgerError>;

    /// Transfer phase: move `principal + interest` from borrower to funder
    async fn repay_funder(
        &self,
        borrower: &Self::Address,
        funder: &Self::Address,
        principal: i128,
        interest: i128,
    ) -> Result<(), LedgerError>;
}
