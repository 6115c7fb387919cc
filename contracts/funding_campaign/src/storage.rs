use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::error::Error;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingCampaign {
    /// Unique campaign instance ID; every start gets a fresh one
    pub id: u64,
    pub borrower: Address,
    pub is_open: bool,
    /// Token contributions and repayments are made in
    pub accepted_token: Address,
    pub target_amount: i128,
    /// Always equals the sum of every funder's contributed amount
    pub raised_amount: i128,
    /// Fixed for the campaign's lifetime
    pub interest_rate_bps: u32,
    /// Insertion-ordered, one entry per funder
    pub funders: Vec<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FunderInfo {
    /// Total principal contributed
    pub amount: i128,
    /// floor(amount × interest_rate_bps / 10,000), recomputed on every top-up
    pub reward: i128,
    pub principal_repaid: i128,
    pub interest_repaid: i128,
}

impl FunderInfo {
    pub fn outstanding_principal(&self) -> i128 {
        self.amount - self.principal_repaid
    }

    pub fn outstanding_interest(&self) -> i128 {
        self.reward - self.interest_repaid
    }

    pub fn is_settled(&self) -> bool {
        self.outstanding_principal() <= 0 && self.outstanding_interest() <= 0
    }
}

/// Read model of a campaign
///
/// `funder_addresses[i]` and `funder_info[i]` describe the same funder; the two
/// vectors are always built together and must be paired by index.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignInfo {
    pub campaign_id: u64,
    pub is_open: bool,
    pub token: Address,
    pub target_amount: i128,
    pub raised_amount: i128,
    pub interest_rate_bps: u32,
    pub funder_addresses: Vec<Address>,
    pub funder_info: Vec<FunderInfo>,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Campaign(Address),           // borrower → FundingCampaign
    Contribution(u64, Address),  // (campaign_id, funder) → FunderInfo
    CampaignCounter,
    Initialized,
    Paused,
}

pub struct Storage;

impl Storage {
    pub fn get_admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    pub fn is_paused(env: &Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn next_campaign_id(env: &Env) -> u64 {
        let current: u64 = env
            .storage()
            .instance()
            .get(&DataKey::CampaignCounter)
            .unwrap_or(0);
        let next = current + 1;
        env.storage()
            .instance()
            .set(&DataKey::CampaignCounter, &next);
        next
    }

    // Campaigns
    pub fn get_campaign(env: &Env, borrower: &Address) -> Result<FundingCampaign, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Campaign(borrower.clone()))
            .ok_or(Error::CampaignNotFound)
    }

    pub fn find_campaign(env: &Env, borrower: &Address) -> Option<FundingCampaign> {
        env.storage()
            .persistent()
            .get(&DataKey::Campaign(borrower.clone()))
    }

    pub fn set_campaign(env: &Env, campaign: &FundingCampaign) {
        env.storage()
            .persistent()
            .set(&DataKey::Campaign(campaign.borrower.clone()), campaign);
    }

    // Contributions
    pub fn get_contribution(env: &Env, campaign_id: u64, funder: &Address) -> Option<FunderInfo> {
        env.storage()
            .persistent()
            .get(&DataKey::Contribution(campaign_id, funder.clone()))
    }

    pub fn set_contribution(env: &Env, campaign_id: u64, funder: &Address, info: &FunderInfo) {
        env.storage()
            .persistent()
            .set(&DataKey::Contribution(campaign_id, funder.clone()), info);
    }

    /// Build the index-correlated read model for a campaign
    pub fn campaign_info(env: &Env, campaign: &FundingCampaign) -> CampaignInfo {
        let mut funder_info = Vec::new(env);
        for funder in campaign.funders.iter() {
            funder_info.push_back(
                Self::get_contribution(env, campaign.id, &funder).unwrap_or_default(),
            );
        }

        CampaignInfo {
            campaign_id: campaign.id,
            is_open: campaign.is_open,
            token: campaign.accepted_token.clone(),
            target_amount: campaign.target_amount,
            raised_amount: campaign.raised_amount,
            interest_rate_bps: campaign.interest_rate_bps,
            funder_addresses: campaign.funders.clone(),
            funder_info,
        }
    }
}
