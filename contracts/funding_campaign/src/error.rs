use soroban_sdk::contracterror;

/// Codes are shared with the lending pool contract so one client-side
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

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller not authorized
    Unauthorized = 10,

    // ============================================
    // AMOUNT / TRANSFER ERRORS (30-39)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 30,
    /// Borrower's allowance to this contract does not cover the repayment
    InsufficientAllowance = 32,
    /// Token rejected a contribution transfer
    TransferFailed = 34,

    // ============================================
    // CAMPAIGN ERRORS (50-55)
    // ============================================
    /// Borrower never started a campaign
    CampaignNotFound = 50,
    /// Borrower already has an open campaign
    CampaignAlreadyOpen = 51,
    /// Campaign is closed to contributions
    CampaignNotOpen = 52,
    /// Campaign was already closed
    CampaignAlreadyClosed = 53,
    /// Previous campaign still owes funders
    UnsettledFunders = 54,
    /// Interest rate above 10,000 bps
    InvalidInterestRate = 55,

    // ============================================
    // FUNDER CLAIM ERRORS (56-59)
    // ============================================
    /// Address never contributed to this campaign
    FunderNotFound = 56,
    /// Repayment larger than what is still owed
    ExceedsClaim = 57,
    /// Funder has been paid in full
    FunderAlreadySettled = 58,

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
