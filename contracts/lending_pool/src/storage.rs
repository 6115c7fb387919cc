use soroban_sdk::{contracttype, Address, Env, Symbol, Vec};

use crate::error::Error;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Asset {
    /// Display symbol (e.g. "XLM", "BTC")
    pub symbol: Symbol,
    /// Fixed-point scale of raw balances of this asset
    pub decimals: u32,
    /// Oracle contract quoting this asset in debt-token units
    pub price_feed: Address,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoanStatus {
    /// Borrower never drew a loan
    NoLoan = 0,
    /// Debt outstanding
    Active = 1,
    /// Outstanding driven to zero; a new draw re-activates it
    Settled = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanAccount {
    pub borrower: Address,
    /// Total principal drawn, in debt-token raw units
    pub debt: i128,
    /// Total principal repaid, never above `debt`
    pub repaid: i128,
    /// Timestamp the current term ends
    pub due_date: u64,
    pub status: LoanStatus,
}

impl LoanAccount {
    pub fn empty(borrower: Address) -> Self {
        LoanAccount {
            borrower,
            debt: 0,
            repaid: 0,
            due_date: 0,
            status: LoanStatus::NoLoan,
        }
    }

    pub fn outstanding(&self) -> i128 {
        lending_math::outstanding(self.debt, self.repaid)
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HealthFactor {
    /// No outstanding debt, so there is no ratio to report
    NoActiveLoan,
    /// Risk-adjusted collateral over outstanding debt, in basis points
    Bps(i128),
}

impl From<lending_math::HealthFactor> for HealthFactor {
    fn from(value: lending_math::HealthFactor) -> Self {
        match value {
            lending_math::HealthFactor::NoActiveLoan => HealthFactor::NoActiveLoan,
            lending_math::HealthFactor::Bps(bps) => HealthFactor::Bps(bps),
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub admin: Address,
    pub debt_token: Address,
    pub debt_decimals: u32,
    pub ltv_bps: u32,
    pub loan_term_secs: u64,
    pub paused: bool,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    DebtToken,
    DebtDecimals,
    LtvBps,       // In basis points (e.g., 7000 = 70%)
    LoanTermSecs, // Fixed term applied on every draw
    Asset(Address),
    AssetList,
    Collateral(Address, Address), // (owner, asset) → raw balance
    Loan(Address),                // borrower → LoanAccount
    Initialized,
    Paused,
}

pub struct Storage;

impl Storage {
    // Config
    pub fn get_admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_debt_token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::DebtToken)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_debt_decimals(env: &Env) -> Result<u32, Error> {
        env.storage()
            .instance()
            .get(&DataKey::DebtDecimals)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_ltv_bps(env: &Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::LtvBps)
            .unwrap_or(lending_math::DEFAULT_LTV_BPS)
    }

    pub fn get_loan_term_secs(env: &Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::LoanTermSecs)
            .unwrap_or(lending_math::DEFAULT_LOAN_TERM_SECS)
    }

    pub fn set_risk_params(env: &Env, ltv_bps: u32, loan_term_secs: u64) {
        env.storage().instance().set(&DataKey::LtvBps, &ltv_bps);
        env.storage()
            .instance()
            .set(&DataKey::LoanTermSecs, &loan_term_secs);
    }

    pub fn is_paused(env: &Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false)
    }

    // Assets
    pub fn get_asset(env: &Env, asset: &Address) -> Result<Asset, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Asset(asset.clone()))
            .ok_or(Error::AssetNotSupported)
    }

    pub fn has_asset(env: &Env, asset: &Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Asset(asset.clone()))
    }

    pub fn list_asset(env: &Env, asset: &Address, info: &Asset) {
        env.storage()
            .persistent()
            .set(&DataKey::Asset(asset.clone()), info);

        let mut assets = Self::get_asset_list(env);
        assets.push_back(asset.clone());
        env.storage().persistent().set(&DataKey::AssetList, &assets);
    }

    pub fn get_asset_list(env: &Env) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::AssetList)
            .unwrap_or(Vec::new(env))
    }

    // Collateral
    pub fn get_collateral(env: &Env, owner: &Address, asset: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Collateral(owner.clone(), asset.clone()))
            .unwrap_or(0)
    }

    pub fn set_collateral(env: &Env, owner: &Address, asset: &Address, balance: i128) {
        let key = DataKey::Collateral(owner.clone(), asset.clone());
        if balance == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &balance);
        }
    }

    // Loans
    pub fn get_loan(env: &Env, borrower: &Address) -> LoanAccount {
        env.storage()
            .persistent()
            .get(&DataKey::Loan(borrower.clone()))
            .unwrap_or(LoanAccount::empty(borrower.clone()))
    }

    pub fn set_loan(env: &Env, loan: &LoanAccount) {
        env.storage()
            .persistent()
            .set(&DataKey::Loan(loan.borrower.clone()), loan);
    }
}
