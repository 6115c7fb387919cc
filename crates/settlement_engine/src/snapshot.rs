//! Client-side copies of campaign state read from the ledger of record.

use crate::error::LedgerError;

/// One funder's claim on a campaign
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunderClaim {
    pub amount: i128,
    pub reward: i128,
    pub principal_repaid: i128,
    pub interest_repaid: i128,
}

impl FunderClaim {
    pub fn outstanding_principal(&self) -> i128 {
        (self.amount - self.principal_repaid).max(0)
    }

    pub fn outstanding_interest(&self) -> i128 {
        (self.reward - self.interest_repaid).max(0)
    }

    pub fn outstanding_total(&self) -> Option<i128> {
        self.outstanding_principal()
            .checked_add(self.outstanding_interest())
    }

    pub fn is_settled(&self) -> bool {
        self.outstanding_principal() == 0 && self.outstanding_interest() == 0
    }
}

/// A campaign as read at one point in time
///
/// Funder rows are stored as `(address, claim)` pairs so the positional
/// pairing the ledger reports in two parallel vectors cannot drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignSnapshot<A> {
    pub is_open: bool,
    pub token: A,
    pub target_amount: i128,
    pub raised_amount: i128,
    pub interest_rate_bps: u32,
    pub funders: Vec<(A, FunderClaim)>,
}

impl<A: Clone + Eq> CampaignSnapshot<A> {
    /// Pair `addresses[i]` with `infos[i]`
    ///
    /// Fails with `DataUnavailable` when the vectors differ in length; a
    /// partial pairing would attribute claims to the wrong funders.
    pub fn from_parallel(
        is_open: bool,
        token: A,
        target_amount: i128,
        raised_amount: i128,
        interest_rate_bps: u32,
        addresses: Vec<A>,
        infos: Vec<FunderClaim>,
    ) -> Result<Self, LedgerError> {
        if addresses.len() != infos.len() {
            return Err(LedgerError::DataUnavailable(format!(
                "campaign lists {} funder addresses but {} funder rows",
                addresses.len(),
                infos.len()
            )));
        }

        Ok(Self {
            is_open,
            token,
            target_amount,
            raised_amount,
            interest_rate_bps,
            funders: addresses.into_iter().zip(infos).collect(),
        })
    }

    pub fn claim(&self, funder: &A) -> Option<&FunderClaim> {
        self.funders
            .iter()
            .find(|(address, _)| address == funder)
            .map(|(_, claim)| claim)
    }

    pub fn funder_addresses(&self) -> impl Iterator<Item = &A> {
        self.funders.iter().map(|(address, _)| address)
    }

    /// Σ contributed amounts equals the raised amount
    pub fn is_consistent(&self) -> bool {
        let contributed = self
            .funders
            .iter()
            .try_fold(0i128, |sum, (_, claim)| sum.checked_add(claim.amount));
        contributed == Some(self.raised_amount)
    }
}
