#![no_std]

mod error;
mod events;
mod storage;
mod valuation;

#[cfg(test)]
mod test;

pub use error::Error;
pub use storage::{Asset, HealthFactor, LoanAccount, LoanStatus, PoolConfig};
pub use valuation::{PriceFeed, PriceFeedClient};

use events::*;
use storage::{DataKey, Storage};

use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol, Vec};

const MAX_ASSET_DECIMALS: u32 = 38;

#[contract]
pub struct LendingPool;

#[contractimpl]
impl LendingPool {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the pool
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidParameter`: LTV outside (0, 10000] or zero loan term
    pub fn initialize(
        env: Env,
        admin: Address,
        debt_token: Address,
        debt_decimals: u32,
        ltv_bps: u32,
        loan_term_secs: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        Self::check_risk_params(ltv_bps, loan_term_secs)?;
        if debt_decimals > MAX_ASSET_DECIMALS {
            return Err(Error::InvalidParameter);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::DebtToken, &debt_token);
        env.storage()
            .instance()
            .set(&DataKey::DebtDecimals, &debt_decimals);
        Storage::set_risk_params(&env, ltv_bps, loan_term_secs);
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    /// Pause contract (emergency)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn pause(env: Env) -> Result<(), Error> {
        let admin = Storage::get_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &true);
        Ok(())
    }

    /// Unpause contract
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn unpause(env: Env) -> Result<(), Error> {
        let admin = Storage::get_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &false);
        Ok(())
    }

    /// Update loan-to-value and the fixed loan term
    ///
    /// Existing loans keep their due date; the new term applies to the next draw.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidParameter`: LTV outside (0, 10000] or zero loan term
    pub fn set_risk_params(env: Env, ltv_bps: u32, loan_term_secs: u64) -> Result<(), Error> {
        let admin = Storage::get_admin(&env)?;
        admin.require_auth();

        Self::check_risk_params(ltv_bps, loan_term_secs)?;
        Storage::set_risk_params(&env, ltv_bps, loan_term_secs);
        Ok(())
    }

    /// List an asset as collateral
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `AssetAlreadyListed`: Asset was listed before
    /// - `InvalidParameter`: More than 38 decimals
    pub fn list_asset(
        env: Env,
        asset: Address,
        symbol: Symbol,
        decimals: u32,
        price_feed: Address,
    ) -> Result<(), Error> {
        let admin = Storage::get_admin(&env)?;
        admin.require_auth();

        if Storage::has_asset(&env, &asset) {
            return Err(Error::AssetAlreadyListed);
        }
        if decimals > MAX_ASSET_DECIMALS {
            return Err(Error::InvalidParameter);
        }

        let info = Asset {
            symbol: symbol.clone(),
            decimals,
            price_feed: price_feed.clone(),
        };
        Storage::list_asset(&env, &asset, &info);

        env.events().publish(
            (Symbol::new(&env, "asset_listed"), asset.clone()),
            AssetListedEvent {
                asset,
                symbol,
                decimals,
                price_feed,
            },
        );

        Ok(())
    }

    /// Add debt-token liquidity that loans are paid out of
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Contract is paused
    /// - `InvalidAmount`: amount must be positive
    /// - `InsufficientBalance`: Funder lacks the tokens
    pub fn fund_reserves(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        from.require_auth();

        let debt_token = token::Client::new(&env, &Storage::get_debt_token(&env)?);
        if debt_token
            .try_transfer(&from, &env.current_contract_address(), &amount)
            .is_err()
        {
            return Err(Error::InsufficientBalance);
        }

        env.events().publish(
            (Symbol::new(&env, "reserves_funded"),),
            ReservesFundedEvent { from, amount },
        );

        Ok(())
    }

    // ============================================
    // COLLATERAL LEDGER
    // ============================================

    /// Deposit collateral into custody
    ///
    /// The owner must have approved this contract for at least `amount` of
    /// `asset` beforehand; the pool pulls the tokens with `transfer_from`.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Contract is paused
    /// - `InvalidAmount`: amount must be positive
    /// - `AssetNotSupported`: Asset is not listed
    /// - `InsufficientAllowance`: Token rejected the pull
    pub fn deposit_collateral(
        env: Env,
        owner: Address,
        asset: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        owner.require_auth();

        Storage::get_asset(&env, &asset)?;

        let balance = Storage::get_collateral(&env, &owner, &asset);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;

        let pool = env.current_contract_address();
        let asset_client = token::Client::new(&env, &asset);
        if asset_client
            .try_transfer_from(&pool, &owner, &pool, &amount)
            .is_err()
        {
            return Err(Error::InsufficientAllowance);
        }

        Storage::set_collateral(&env, &owner, &asset, new_balance);

        env.events().publish(
            (Symbol::new(&env, "collateral_deposited"), owner.clone()),
            CollateralDepositedEvent {
                owner,
                asset,
                amount,
                new_balance,
            },
        );

        Ok(())
    }

    /// Withdraw collateral from custody
    ///
    /// With debt outstanding, the health factor after the withdrawal must stay
    /// at or above 100%.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Contract is paused
    /// - `InvalidAmount`: amount must be positive
    /// - `InsufficientBalance`: amount exceeds the deposited balance
    /// - `HealthFactorViolation`: Position would become under-collateralized
    /// - `PriceUnavailable`: A price needed for the check is missing
    pub fn withdraw_collateral(
        env: Env,
        owner: Address,
        asset: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        owner.require_auth();

        let balance = Storage::get_collateral(&env, &owner, &asset);
        if amount > balance {
            return Err(Error::InsufficientBalance);
        }
        let new_balance = balance - amount;

        let loan = Storage::get_loan(&env, &owner);
        if loan.outstanding() > 0 {
            let value_after =
                valuation::collateral_value(&env, &owner, Some((&asset, new_balance)))?;
            let health = Self::health_for(&env, value_after, loan.outstanding())?;
            if !health.is_safe() {
                return Err(Error::HealthFactorViolation);
            }
        }

        Storage::set_collateral(&env, &owner, &asset, new_balance);

        let asset_client = token::Client::new(&env, &asset);
        asset_client.transfer(&env.current_contract_address(), &owner, &amount);

        env.events().publish(
            (Symbol::new(&env, "collateral_withdrawn"), owner.clone()),
            CollateralWithdrawnEvent {
                owner,
                asset,
                amount,
                new_balance,
            },
        );

        Ok(())
    }

    // ============================================
    // LOAN ACCOUNT
    // ============================================

    /// Draw a loan against deposited collateral
    ///
    /// Interest is not added to the debt; it is settled separately by the
    /// caller at repayment time. Every draw refreshes the due date to
    /// `now + loan_term_secs`.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Contract is paused
    /// - `InvalidAmount`: amount must be positive
    /// - `InsufficientCollateral`: amount exceeds the borrowing limit
    /// - `InsufficientLiquidity`: Pool reserves cannot cover the draw
    /// - `PriceUnavailable`: A collateral price is missing
    pub fn take_loan(env: Env, borrower: Address, amount: i128) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        borrower.require_auth();

        let mut loan = Storage::get_loan(&env, &borrower);
        let value = valuation::collateral_value(&env, &borrower, None)?;
        let risk_adjusted =
            lending_math::risk_adjusted_collateral(value, Storage::get_ltv_bps(&env))
                .ok_or(Error::ArithmeticOverflow)?;

        if amount > lending_math::max_borrow(risk_adjusted, loan.outstanding()) {
            return Err(Error::InsufficientCollateral);
        }

        let pool = env.current_contract_address();
        let debt_token = token::Client::new(&env, &Storage::get_debt_token(&env)?);
        if debt_token.balance(&pool) < amount {
            return Err(Error::InsufficientLiquidity);
        }

        loan.debt = loan
            .debt
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;
        loan.due_date = env
            .ledger()
            .timestamp()
            .saturating_add(Storage::get_loan_term_secs(&env));
        loan.status = LoanStatus::Active;
        Storage::set_loan(&env, &loan);

        debt_token.transfer(&pool, &borrower, &amount);

        env.events().publish(
            (Symbol::new(&env, "loan_taken"), borrower.clone()),
            LoanTakenEvent {
                borrower,
                amount,
                debt: loan.debt,
                due_date: loan.due_date,
            },
        );

        Ok(())
    }

    /// Repay principal on the borrower's loan
    ///
    /// Only `min(amount, outstanding)` is collected; `repaid` never exceeds `debt`.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ContractPaused`: Contract is paused
    /// - `InvalidAmount`: amount must be positive
    /// - `NoActiveLoan`: Nothing is outstanding
    /// - `InsufficientBalance`: Borrower lacks the tokens
    pub fn repay_loan(env: Env, borrower: Address, amount: i128) -> Result<(), Error> {
        Self::check_not_paused(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        borrower.require_auth();

        let mut loan = Storage::get_loan(&env, &borrower);
        if loan.outstanding() == 0 {
            return Err(Error::NoActiveLoan);
        }

        let repaid = lending_math::apply_repayment(loan.debt, loan.repaid, amount)
            .ok_or(Error::ArithmeticOverflow)?;
        let applied = repaid - loan.repaid;

        let debt_token = token::Client::new(&env, &Storage::get_debt_token(&env)?);
        if debt_token
            .try_transfer(&borrower, &env.current_contract_address(), &applied)
            .is_err()
        {
            return Err(Error::InsufficientBalance);
        }

        loan.repaid = repaid;
        if loan.outstanding() == 0 {
            loan.status = LoanStatus::Settled;
        }
        Storage::set_loan(&env, &loan);

        env.events().publish(
            (Symbol::new(&env, "loan_repaid"), borrower.clone()),
            LoanRepaidEvent {
                borrower,
                amount: applied,
                repaid: loan.repaid,
                outstanding: loan.outstanding(),
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_config(env: Env) -> Result<PoolConfig, Error> {
        Ok(PoolConfig {
            admin: Storage::get_admin(&env)?,
            debt_token: Storage::get_debt_token(&env)?,
            debt_decimals: Storage::get_debt_decimals(&env)?,
            ltv_bps: Storage::get_ltv_bps(&env),
            loan_term_secs: Storage::get_loan_term_secs(&env),
            paused: Storage::is_paused(&env),
        })
    }

    pub fn get_asset(env: Env, asset: Address) -> Result<Asset, Error> {
        Storage::get_asset(&env, &asset)
    }

    /// Listed collateral assets, in listing order
    pub fn get_assets(env: Env) -> Vec<Address> {
        Storage::get_asset_list(&env)
    }

    pub fn get_price(env: Env, asset: Address) -> Result<i128, Error> {
        valuation::price_of(&env, &asset)
    }

    pub fn get_collateral_balance(env: Env, owner: Address, asset: Address) -> i128 {
        Storage::get_collateral(&env, &owner, &asset)
    }

    /// Total collateral value in raw debt-token units
    ///
    /// Fails with `PriceUnavailable` rather than valuing an asset at zero.
    pub fn get_total_collateral_value_in_debt_token(
        env: Env,
        owner: Address,
    ) -> Result<i128, Error> {
        valuation::collateral_value(&env, &owner, None)
    }

    pub fn get_risk_adjusted_collateral(env: Env, owner: Address) -> Result<i128, Error> {
        let value = valuation::collateral_value(&env, &owner, None)?;
        lending_math::risk_adjusted_collateral(value, Storage::get_ltv_bps(&env))
            .ok_or(Error::ArithmeticOverflow)
    }

    pub fn get_max_borrow(env: Env, owner: Address) -> Result<i128, Error> {
        let loan = Storage::get_loan(&env, &owner);
        let risk_adjusted = Self::get_risk_adjusted_collateral(env, owner)?;
        Ok(lending_math::max_borrow(risk_adjusted, loan.outstanding()))
    }

    /// `NoActiveLoan` when nothing is outstanding, otherwise the ratio in bps
    pub fn get_health_factor(env: Env, owner: Address) -> Result<HealthFactor, Error> {
        let loan = Storage::get_loan(&env, &owner);
        if loan.outstanding() == 0 {
            return Ok(HealthFactor::NoActiveLoan);
        }

        let value = valuation::collateral_value(&env, &owner, None)?;
        Ok(Self::health_for(&env, value, loan.outstanding())?.into())
    }

    pub fn get_loan_info(env: Env, owner: Address) -> LoanAccount {
        Storage::get_loan(&env, &owner)
    }

    /// Debt-token liquidity available for new loans
    pub fn get_reserves(env: Env) -> Result<i128, Error> {
        let debt_token = token::Client::new(&env, &Storage::get_debt_token(&env)?);
        Ok(debt_token.balance(&env.current_contract_address()))
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

    fn check_risk_params(ltv_bps: u32, loan_term_secs: u64) -> Result<(), Error> {
        if ltv_bps == 0 || ltv_bps as i128 > lending_math::BPS_DENOMINATOR || loan_term_secs == 0
        {
            return Err(Error::InvalidParameter);
        }
        Ok(())
    }

    fn health_for(
        env: &Env,
        collateral_value: i128,
        outstanding: i128,
    ) -> Result<lending_math::HealthFactor, Error> {
        let risk_adjusted =
            lending_math::risk_adjusted_collateral(collateral_value, Storage::get_ltv_bps(env))
                .ok_or(Error::ArithmeticOverflow)?;
        lending_math::health_factor(risk_adjusted, outstanding).ok_or(Error::ArithmeticOverflow)
    }
}
