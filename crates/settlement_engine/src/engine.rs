//! Funder repayment orchestration.

use crate::config::{BatchPolicy, InterestSource, SettlementConfig};
use crate::error::SettlementError;
use crate::ledger::LedgerOfRecord;
use crate::settlement::{Settlement, SettlementPhase};
use crate::snapshot::FunderClaim;

/// A repayment that did not complete
///
/// `settlement` is kept once one was prepared. Passing it back to
/// [`SettlementEngine::settle`] resumes where it stopped, so an authorized
/// settlement retries only the transfer phase. Another approval from the same
/// borrower replaces the allowance, so resume before settling other funders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRepayment<A> {
    pub error: SettlementError,
    pub settlement: Option<Settlement<A>>,
}

impl<A> UnresolvedRepayment<A> {
    pub fn phase(&self) -> SettlementPhase {
        self.settlement
            .as_ref()
            .map(|settlement| settlement.phase().clone())
            .unwrap_or(SettlementPhase::NotStarted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunderOutcome<A> {
    Paid { principal: i128, interest: i128 },
    /// Nothing was owed when the batch reached this funder
    AlreadySettled,
    /// The funder still has a claim
    Unresolved(UnresolvedRepayment<A>),
    /// Not attempted because an earlier funder failed under `StopOnFailure`
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunderReport<A> {
    pub funder: A,
    pub outcome: FunderOutcome<A>,
}

pub struct SettlementEngine<L> {
    ledger: L,
    config: SettlementConfig,
}

impl<L: LedgerOfRecord> SettlementEngine<L> {
    pub fn new(ledger: L, config: SettlementConfig) -> Self {
        Self { ledger, config }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Interest owed alongside `principal` under the configured source
    pub fn interest_for(
        &self,
        claim: &FunderClaim,
        principal: i128,
    ) -> Result<i128, SettlementError> {
        let interest = match self.config.interest_source {
            InterestSource::CampaignRate => lending_math::pro_rata_interest(
                principal,
                claim.outstanding_principal(),
                claim.outstanding_interest(),
            ),
            InterestSource::ExpectedReturnPercent { percent } => {
                lending_math::expected_return_interest(principal, percent)
            }
        };
        interest.ok_or(SettlementError::ArithmeticOverflow)
    }

    /// Build a settlement from a fresh read of the campaign
    ///
    /// `principal` is clamped to what the funder is still owed; `None` repays
    /// the whole outstanding principal.
    pub async fn prepare(
        &self,
        borrower: &L::Address,
        funder: &L::Address,
        principal: Option<i128>,
    ) -> Result<Settlement<L::Address>, SettlementError> {
        let snapshot = self.ledger.collateral_raising_info(borrower).await?;
        let claim = snapshot
            .claim(funder)
            .ok_or(SettlementError::FunderNotFound)?;

        if claim.is_settled() {
            return Err(SettlementError::NothingOwed);
        }

        let owed = claim.outstanding_principal();
        let principal = principal.unwrap_or(owed).clamp(0, owed);
        let interest = self.interest_for(claim, principal)?;
        if principal == 0 && interest == 0 {
            return Err(SettlementError::NothingOwed);
        }

        log::debug!(
            "Prepared repayment to {:?}: principal {}, interest {} (repaid so far {} + {})",
            funder,
            principal,
            interest,
            claim.principal_repaid,
            claim.interest_repaid
        );

        Settlement::new(borrower.clone(), funder.clone(), principal, interest, claim)
    }

    /// Run both phases; safe to call again on the same settlement after an error
    pub async fn settle(
        &self,
        settlement: &mut Settlement<L::Address>,
    ) -> Result<(), SettlementError> {
        if settlement.phase() == &SettlementPhase::NotStarted {
            settlement.authorize(&self.ledger).await?;
        }
        settlement.execute(&self.ledger).await
    }

    /// Prepare and settle one funder
    ///
    /// When the transfer's confirmation is lost the claim is re-read once
    /// before giving up, so a transfer that landed is reported as done.
    pub async fn repay_funder(
        &self,
        borrower: &L::Address,
        funder: &L::Address,
        principal: Option<i128>,
    ) -> Result<Settlement<L::Address>, UnresolvedRepayment<L::Address>> {
        let mut settlement = match self.prepare(borrower, funder, principal).await {
            Ok(settlement) => settlement,
            Err(error) => {
                return Err(UnresolvedRepayment {
                    error,
                    settlement: None,
                })
            }
        };

        let error = match self.settle(&mut settlement).await {
            Ok(()) => return Ok(settlement),
            Err(error) => error,
        };

        if error.is_retryable() {
            match settlement.confirm(&self.ledger).await {
                Ok(true) => return Ok(settlement),
                Ok(false) => {}
                Err(err) => log::warn!("Could not confirm repayment to {:?}: {}", funder, err),
            }
        }

        Err(UnresolvedRepayment {
            error,
            settlement: Some(settlement),
        })
    }

    /// Repay every funder of the borrower's campaign in list order
    ///
    /// Not atomic: each funder is settled on its own and the report says which
    /// ones still have a claim.
    pub async fn repay_all_funders(
        &self,
        borrower: &L::Address,
    ) -> Result<Vec<FunderReport<L::Address>>, SettlementError> {
        let snapshot = self.ledger.collateral_raising_info(borrower).await?;
        let funders: Vec<L::Address> = snapshot.funder_addresses().cloned().collect();

        log::info!("Repaying {} funders of {:?}", funders.len(), borrower);

        let mut reports = Vec::with_capacity(funders.len());
        let mut halted = false;

        for funder in funders {
            if halted {
                reports.push(FunderReport {
                    funder,
                    outcome: FunderOutcome::Skipped,
                });
                continue;
            }

            let outcome = match self.repay_funder(borrower, &funder, None).await {
                Ok(settlement) => FunderOutcome::Paid {
                    principal: settlement.principal(),
                    interest: settlement.interest(),
                },
                Err(UnresolvedRepayment {
                    error: SettlementError::NothingOwed,
                    settlement: None,
                }) => FunderOutcome::AlreadySettled,
                Err(unresolved) => {
                    log::warn!("Funder {:?} left unresolved: {}", funder, unresolved.error);
                    halted = self.config.batch_policy == BatchPolicy::StopOnFailure;
                    FunderOutcome::Unresolved(unresolved)
                }
            };

            reports.push(FunderReport { funder, outcome });
        }

        let unresolved = reports
            .iter()
            .filter(|report| matches!(report.outcome, FunderOutcome::Unresolved(_)))
            .count();
        log::info!(
            "Finished repaying funders of {:?}: {} unresolved",
            borrower,
            unresolved
        );

        Ok(reports)
    }
}
