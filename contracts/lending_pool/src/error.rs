use soroban_sdk::contracterror;

/// Codes are shared with the funding campaign contract so one client-side
/// decoder covers both.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // 10-15 unused here: admin calls fail in `require_auth`

    // ============================================
    // ASSET / PRICE ERRORS (20-29)
    // ============================================
    /// Asset is not listed as collateral
    AssetNotSupported = 20,
    /// Asset already listed
    AssetAlreadyListed = 21,
    /// Price feed failed or returned no usable price
    PriceUnavailable = 22,
    /// Configuration value out of range (LTV, loan term, decimals)
    InvalidParameter = 23,

    // ============================================
    // AMOUNT / BALANCE ERRORS (30-39)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 30,
    /// Withdrawal exceeds deposited collateral, or payer lacks the tokens
    InsufficientBalance = 31,
    /// Token transfer_from rejected (missing or short allowance)
    InsufficientAllowance = 32,
    /// Pool does not hold enough debt token to pay out the loan
    InsufficientLiquidity = 33,

    // ============================================
    // LOAN / HEALTH ERRORS (40-49)
    // ============================================
    /// Requested loan exceeds risk-adjusted collateral minus outstanding debt
    InsufficientCollateral = 40,
    /// Operation would leave the health factor below 100%
    HealthFactorViolation = 41,
    /// Nothing outstanding to repay
    NoActiveLoan = 42,

    // ============================================
    // OPERATIONAL ERRORS (60-69)
    // ============================================
    /// Contract is paused
    ContractPaused = 60,

    // ============================================
    // ARITHMETIC ERRORS (70-79)
    // ============================================
    /// Fixed-point arithmetic overflowed
    ArithmeticOverflow = 70,
}
