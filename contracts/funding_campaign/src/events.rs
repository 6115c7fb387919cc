use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignStartedEvent {
    pub campaign_id: u64,
    pub borrower: Address,
    pub token: Address,
    pub target_amount: i128,
    pub interest_rate_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributedEvent {
    pub campaign_id: u64,
    pub borrower: Address,
    pub funder: Address,
    pub amount: i128,
    pub total_contribution: i128,
    pub reward: i128,
    pub raised_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignClosedEvent {
    pub campaign_id: u64,
    pub borrower: Address,
    pub raised_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunderRepaidEvent {
    pub campaign_id: u64,
    pub borrower: Address,
    pub funder: Address,
    pub principal: i128,
    pub interest: i128,
    pub outstanding_principal: i128,
    pub outstanding_interest: i128,
}
