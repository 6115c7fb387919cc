#![no_std]

mod error;
mod events;
mod storage;
mod validation;


pub use error::Error;
pub use storage::{CampaignInfo, FunderInfo, FundingCampaign};

use events::*;
use storage::{DataKey, Storage};

use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol, Vec};

#[contract]
pub struct FundingCampaignContract;

#[contractimpl]
impl FundingCampaignContract {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::CampaignCounter, &0u64);
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    pub fn pause(env: Env) -> Result<(), Error> {
        let admin = Storage::get_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &true);
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), Error> {
        let admin = Storage::get_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &false);
        Ok(())
    }

    // ============================================
    // CAMPAIGN LIFECYCLE
    // ============================================

    /// Open a new collateral raising campaign for the borrower
    ///
    /// Each call creates a new campaign instance with nothing raised. A
    /// borrower can only start again once the previous campaign is closed and
    /// every funder of it has been repaid.
    pub fn start_collateral_raising(
        env: Env,
        borrower: Address,
        token: Address,
        target_amount: i128,
        interest_rate_bps: u32,
    ) -> Result<u64, Error> {
        Self::check_not_paused(&env)?;

        if target_amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if interest_rate_bps as i128 > lending_math::BPS_DENOMINATOR {
            return Err(Error::InvalidInterestRate);
        }

        borrower.require_auth();

        if let Some(previous) = Storage::find_campaign(&env, &borrower) {
            if previous.is_open {
                return Err(Error::CampaignAlreadyOpen);
            }
            if Self::has_unsettled_funders(&env, &previous) {
                return Err(Error::UnsettledFunders);
            }
        }

        let campaign = FundingCampaign {
            id: Storage::next_campaign_id(&env),
            borrower: borrower.clone(),
            is_open: true,
            accepted_token: token.clone(),
            target_amount,
            raised_amount: 0,
            interest_rate_bps,
            funders: Vec::new(&env),
        };
        Storage::set_campaign(&env, &campaign);

        env.events().publish(
            (Symbol::new(&env, "campaign_started"), borrower.clone()),
            CampaignStartedEvent {
                campaign_id: campaign.id,
                borrower,
                token,
                target_amount,
                interest_rate_bps,
            },
        );

        Ok(campaign.id)
    }

    /// Contribute to an open campaign
    ///
    /// Funds move straight from the funder to the borrower. A repeat
    /// contribution grows the funder's existing row; the funder list never
    /// holds the same address twice. Raising past the target is allowed.
    pub fn contribute(
        env: Env,
        funder: Address,
        borrower: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if funder == borrower {
            return Err(Error::Unauthorized);
        }

        funder.require_auth();

        // `is_open` is read from storage on every call, never cached
        let mut campaign = Storage::get_campaign(&env, &borrower)?;
        if !campaign.is_open {
            return Err(Error::CampaignNotOpen);
        }

        let existing = Storage::get_contribution(&env, campaign.id, &funder);
        let is_new_funder = existing.is_none();
        let info = validation::apply_contribution(
            &existing.unwrap_or_default(),
            amount,
            campaign.interest_rate_bps,
        )?;

        campaign.raised_amount = campaign
            .raised_amount
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;
        if is_new_funder {
            campaign.funders.push_back(funder.clone());
        }

        let token_client = token::Client::new(&env, &campaign.accepted_token);
        if token_client.try_transfer(&funder, &borrower, &amount).is_err() {
            return Err(Error::TransferFailed);
        }

        Storage::set_contribution(&env, campaign.id, &funder, &info);
        Storage::set_campaign(&env, &campaign);

        env.events().publish(
            (Symbol::new(&env, "contributed"), borrower.clone(), funder.clone()),
            ContributedEvent {
                campaign_id: campaign.id,
                borrower,
                funder,
                amount,
                total_contribution: info.amount,
                reward: info.reward,
                raised_amount: campaign.raised_amount,
            },
        );

        Ok(())
    }

    /// Stop accepting contributions
    ///
    /// Closing twice fails with `CampaignAlreadyClosed` so a retried close is
    /// never mistaken for a fresh one.
    pub fn close_collateral_raising(env: Env, borrower: Address) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        borrower.require_auth();

        let mut campaign = Storage::get_campaign(&env, &borrower)?;
        if !campaign.is_open {
            return Err(Error::CampaignAlreadyClosed);
        }

        campaign.is_open = false;
        Storage::set_campaign(&env, &campaign);

        env.events().publish(
            (Symbol::new(&env, "campaign_closed"), borrower.clone()),
            CampaignClosedEvent {
                campaign_id: campaign.id,
                borrower,
                raised_amount: campaign.raised_amount,
            },
        );

        Ok(())
    }

    // ============================================
    // SETTLEMENT (TRANSFER PHASE)
    // ============================================

    /// Pay a funder `principal + interest` of the campaign token
    ///
    /// The borrower must first approve this contract for at least the total
    /// (the approve phase). This call consumes that allowance and reduces the
    /// funder's claim, so replaying it after success fails instead of paying
    /// twice.
    pub fn repay_funder(
        env: Env,
        borrower: Address,
        funder: Address,
        principal: i128,
        interest: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        borrower.require_auth();

        let campaign = Storage::get_campaign(&env, &borrower)?;
        let info = Storage::get_contribution(&env, campaign.id, &funder)
            .ok_or(Error::FunderNotFound)?;

        let updated = validation::apply_repayment(&info, principal, interest)?;
        let total = principal
            .checked_add(interest)
            .ok_or(Error::ArithmeticOverflow)?;

        Storage::set_contribution(&env, campaign.id, &funder, &updated);

        let token_client = token::Client::new(&env, &campaign.accepted_token);
        if token_client
            .try_transfer_from(&env.current_contract_address(), &borrower, &funder, &total)
            .is_err()
        {
            return Err(Error::InsufficientAllowance);
        }

        env.events().publish(
            (Symbol::new(&env, "funder_repaid"), borrower.clone(), funder.clone()),
            FunderRepaidEvent {
                campaign_id: campaign.id,
                borrower,
                funder,
                principal,
                interest,
                outstanding_principal: updated.outstanding_principal(),
                outstanding_interest: updated.outstanding_interest(),
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_campaign(env: Env, owner: Address) -> Result<FundingCampaign, Error> {
        Storage::get_campaign(&env, &owner)
    }

    /// Campaign state with index-correlated funder addresses and funder info
    pub fn get_user_collateral_raising_info(
        env: Env,
        owner: Address,
    ) -> Result<CampaignInfo, Error> {
        let campaign = Storage::get_campaign(&env, &owner)?;
        Ok(Storage::campaign_info(&env, &campaign))
    }

    pub fn get_funder_info(env: Env, owner: Address, funder: Address) -> Result<FunderInfo, Error> {
        let campaign = Storage::get_campaign(&env, &owner)?;
        Storage::get_contribution(&env, campaign.id, &funder).ok_or(Error::FunderNotFound)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        if Storage::is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn has_unsettled_funders(env: &Env, campaign: &FundingCampaign) -> bool {
        campaign.funders.iter().any(|funder| {
            Storage::get_contribution(env, campaign.id, &funder)
                .map(|info| !info.is_settled())
                .unwrap_or(false)
        })
    }
}
