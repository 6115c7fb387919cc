//! Two-phase funder repayment.
//!
//! A repayment is an approve phase (borrower grants the campaign contract an
//! allowance) followed by a transfer phase (the contract pulls the funds and
//! reduces the funder's claim). Each phase is confirmed on the ledger before the
//! next one starts. A failed transfer leaves the allowance in place, so only the
//! transfer phase is retried.

use crate::error::{LedgerError, SettlementError};
use crate::ledger::LedgerOfRecord;
use crate::snapshot::FunderClaim;
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementPhase {
    NotStarted,
    Authorized,
    Executed,
    Failed(LedgerError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement<A> {
    borrower: A,
    funder: A,
    principal: i128,
    interest: i128,
    total: i128,
    /// Repaid counters when the settlement was prepared; only repayments move
    /// them and they never decrease, so top-ups cannot mask a landed transfer
    principal_repaid_before: i128,
    interest_repaid_before: i128,
    phase: SettlementPhase,
    /// Last transfer submission ended without a confirmation either way
    transfer_in_doubt: bool,
}

impl<A> Settlement<A> {
    pub fn new(
        borrower: A,
        funder: A,
        principal: i128,
        interest: i128,
        claim: &FunderClaim,
    ) -> Result<Self, SettlementError> {
        let total = principal
            .checked_add(interest)
            .ok_or(SettlementError::ArithmeticOverflow)?;

        Ok(Self {
            borrower,
            funder,
            principal,
            interest,
            total,
            principal_repaid_before: claim.principal_repaid,
            interest_repaid_before: claim.interest_repaid,
            phase: SettlementPhase::NotStarted,
            transfer_in_doubt: false,
        })
    }

    pub fn borrower(&self) -> &A {
        &self.borrower
    }

    pub fn funder(&self) -> &A {
        &self.funder
    }

    pub fn principal(&self) -> i128 {
        self.principal
    }

    pub fn interest(&self) -> i128 {
        self.interest
    }

    pub fn total(&self) -> i128 {
        self.total
    }

    pub fn phase(&self) -> &SettlementPhase {
        &self.phase
    }

    pub fn is_executed(&self) -> bool {
        self.phase == SettlementPhase::Executed
    }
}

impl<A: Clone + Eq + Debug> Settlement<A> {
    /// Approve phase
    ///
    /// May be repeated until the transfer is executed. A decline or network
    /// error leaves the phase untouched; a rejection fails the settlement. An
    /// unconfirmed transfer is looked up first, so a landed one is never
    /// approved again.
    pub async fn authorize<L>(&mut self, ledger: &L) -> Result<(), SettlementError>
    where
        L: LedgerOfRecord<Address = A>,
    {
        match &self.phase {
            SettlementPhase::Executed => return Ok(()),
            SettlementPhase::Failed(err) => {
                return Err(SettlementError::AlreadyFailed(err.clone()));
            }
            SettlementPhase::NotStarted | SettlementPhase::Authorized => {}
        }

        if self.confirm(ledger).await? {
            return Ok(());
        }

        log::debug!(
            "Approving {} for repayment of {:?} to {:?}",
            self.total,
            self.borrower,
            self.funder
        );

        match ledger.approve(&self.borrower, self.total).await {
            Ok(()) => {
                self.phase = SettlementPhase::Authorized;
                log::info!("Repayment to {:?} authorized for {}", self.funder, self.total);
                Ok(())
            }
            Err(err @ LedgerError::Rejected(_)) => {
                log::error!("Approval for {:?} rejected: {}", self.funder, err);
                self.phase = SettlementPhase::Failed(err.clone());
                Err(err.into())
            }
            Err(err) => {
                log::warn!("Approval for {:?} not confirmed: {}", self.funder, err);
                Err(err.into())
            }
        }
    }

    /// Transfer phase
    ///
    /// Never submits twice once executed. After an unconfirmed submission the
    /// funder's claim is re-read first and a transfer that already landed is
    /// not sent again.
    pub async fn execute<L>(&mut self, ledger: &L) -> Result<(), SettlementError>
    where
        L: LedgerOfRecord<Address = A>,
    {
        match &self.phase {
            SettlementPhase::NotStarted => return Err(SettlementError::NotAuthorized),
            SettlementPhase::Executed => return Ok(()),
            SettlementPhase::Failed(err) => {
                return Err(SettlementError::AlreadyFailed(err.clone()));
            }
            SettlementPhase::Authorized => {}
        }

        if self.confirm(ledger).await? {
            return Ok(());
        }

        match ledger
            .repay_funder(&self.borrower, &self.funder, self.principal, self.interest)
            .await
        {
            Ok(()) => {
                self.transfer_in_doubt = false;
                self.phase = SettlementPhase::Executed;
                log::info!(
                    "Repaid {:?}: principal {}, interest {}",
                    self.funder,
                    self.principal,
                    self.interest
                );
                Ok(())
            }
            Err(err @ LedgerError::Rejected(_)) => {
                log::error!("Repayment to {:?} rejected: {}", self.funder, err);
                self.transfer_in_doubt = false;
                self.phase = SettlementPhase::Failed(err.clone());
                Err(err.into())
            }
            Err(LedgerError::UserDeclined) => {
                log::warn!("Repayment to {:?} declined by signer", self.funder);
                Err(LedgerError::UserDeclined.into())
            }
            Err(err) => {
                log::warn!("Repayment to {:?} unconfirmed: {}", self.funder, err);
                self.transfer_in_doubt = true;
                Err(err.into())
            }
        }
    }

    /// Resolve an unconfirmed transfer against the ledger
    ///
    /// Returns `true` once the settlement is executed. Without a transfer in
    /// doubt this reads nothing.
    pub async fn confirm<L>(&mut self, ledger: &L) -> Result<bool, SettlementError>
    where
        L: LedgerOfRecord<Address = A>,
    {
        if self.is_executed() {
            return Ok(true);
        }
        if !self.transfer_in_doubt {
            return Ok(false);
        }

        let snapshot = ledger.collateral_raising_info(&self.borrower).await?;
        let claim = snapshot
            .claim(&self.funder)
            .ok_or(SettlementError::FunderNotFound)?;

        let principal_target = self.principal_repaid_before.saturating_add(self.principal);
        let interest_target = self.interest_repaid_before.saturating_add(self.interest);
        if claim.principal_repaid < principal_target || claim.interest_repaid < interest_target {
            return Ok(false);
        }

        log::info!(
            "Repayment to {:?} found on the ledger, not resubmitting",
            self.funder
        );
        self.transfer_in_doubt = false;
        self.phase = SettlementPhase::Executed;
        Ok(true)
    }
}
