//! Error taxonomy for calls against the ledger of record.

use thiserror::Error;

/// Closed set of reasons the ledger of record rejects a submission
///
/// Decoded from the numeric contract error codes shared by the lending pool and
/// funding campaign contracts. Codes this client does not know decode to
/// [`RejectionKind::TransactionFailed`] instead of being dropped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum RejectionKind {
    #[error("contract is already initialized")]
    AlreadyInitialized,
    #[error("contract is not initialized")]
    NotInitialized,
    #[error("caller is not allowed to perform this operation")]
    Unauthorized,
    #[error("asset is not accepted as collateral")]
    AssetNotSupported,
    #[error("asset is already listed")]
    AssetAlreadyListed,
    #[error("price feed has no usable price for this asset")]
    PriceUnavailable,
    #[error("configuration value is out of range")]
    InvalidParameter,
    #[error("amount must be positive")]
    InvalidAmount,
    #[error("balance is too low")]
    InsufficientBalance,
    #[error("token allowance does not cover the transfer")]
    InsufficientAllowance,
    #[error("pool reserves cannot cover the loan")]
    InsufficientLiquidity,
    #[error("token transfer was rejected")]
    TransferFailed,
    #[error("loan exceeds the borrowing limit")]
    InsufficientCollateral,
    #[error("health factor would drop below 100%")]
    HealthFactorViolation,
    #[error("no outstanding loan to repay")]
    NoActiveLoan,
    #[error("borrower has no collateral raising campaign")]
    CampaignNotFound,
    #[error("borrower already has an open campaign")]
    CampaignAlreadyOpen,
    #[error("campaign is not accepting contributions")]
    CampaignNotOpen,
    #[error("campaign is already closed")]
    CampaignAlreadyClosed,
    #[error("previous campaign still owes its funders")]
    UnsettledFunders,
    #[error("interest rate exceeds 100%")]
    InvalidInterestRate,
    #[error("address is not a funder of this campaign")]
    FunderNotFound,
    #[error("repayment is larger than the outstanding claim")]
    ExceedsClaim,
    #[error("funder has already been paid in full")]
    FunderAlreadySettled,
    #[error("contract is paused")]
    ContractPaused,
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
    #[error("transaction failed{}", code_suffix(.code))]
    TransactionFailed { code: Option<u32> },
}

fn code_suffix(code: &Option<u32>) -> String {
    code.map(|code| format!(" (code {})", code)).unwrap_or_default()
}

impl RejectionKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => RejectionKind::AlreadyInitialized,
            2 => RejectionKind::NotInitialized,
            10 => RejectionKind::Unauthorized,
            20 => RejectionKind::AssetNotSupported,
            21 => RejectionKind::AssetAlreadyListed,
            22 => RejectionKind::PriceUnavailable,
            23 => RejectionKind::InvalidParameter,
            30 => RejectionKind::InvalidAmount,
            31 => RejectionKind::InsufficientBalance,
            32 => RejectionKind::InsufficientAllowance,
            33 => RejectionKind::InsufficientLiquidity,
            34 => RejectionKind::TransferFailed,
            40 => RejectionKind::InsufficientCollateral,
            41 => RejectionKind::HealthFactorViolation,
            42 => RejectionKind::NoActiveLoan,
            50 => RejectionKind::CampaignNotFound,
            51 => RejectionKind::CampaignAlreadyOpen,
            52 => RejectionKind::CampaignNotOpen,
            53 => RejectionKind::CampaignAlreadyClosed,
            54 => RejectionKind::UnsettledFunders,
            55 => RejectionKind::InvalidInterestRate,
            56 => RejectionKind::FunderNotFound,
            57 => RejectionKind::ExceedsClaim,
            58 => RejectionKind::FunderAlreadySettled,
            60 => RejectionKind::ContractPaused,
            70 => RejectionKind::ArithmeticOverflow,
            other => RejectionKind::TransactionFailed { code: Some(other) },
        }
    }
}

/// Outcome of a single call against the ledger of record
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LedgerError {
    /// Signer refused the request; nothing was submitted
    #[error("request was declined by the signer")]
    UserDeclined,
    /// Transport failure; the submission may or may not have landed
    #[error("network error: {0}")]
    Network(String),
    /// Ledger reverted the submission; terminal for that submission
    #[error("rejected by the ledger: {0}")]
    Rejected(RejectionKind),
    /// A read could not be served; never substitute a zero for it
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
}

impl LedgerError {
    /// The same submission may be sent again
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Network(_))
    }

    pub fn rejection(&self) -> Option<RejectionKind> {
        match self {
            LedgerError::Rejected(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SettlementError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("transfer phase requires a confirmed approval first")]
    NotAuthorized,
    #[error("settlement already failed: {0}")]
    AlreadyFailed(LedgerError),
    #[error("address is not a funder of this campaign")]
    FunderNotFound,
    #[error("funder has nothing left to claim")]
    NothingOwed,
    #[error("repayment amount overflowed")]
    ArithmeticOverflow,
}

impl SettlementError {
    /// The ledger call may not have been applied; resume the settlement
    pub fn is_retryable(&self) -> bool {
        matches!(self, SettlementError::Ledger(err) if err.is_retryable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_decode_to_named_kinds() {
        assert_eq!(
            RejectionKind::from_code(41),
            RejectionKind::HealthFactorViolation
        );
        assert_eq!(RejectionKind::from_code(52), RejectionKind::CampaignNotOpen);
        assert_eq!(
            RejectionKind::from_code(53),
            RejectionKind::CampaignAlreadyClosed
        );
        assert_eq!(
            RejectionKind::from_code(32),
            RejectionKind::InsufficientAllowance
        );
        assert_eq!(RejectionKind::from_code(10), RejectionKind::Unauthorized);
    }

    #[test]
    fn test_unknown_code_falls_back_to_transaction_failed() {
        let kind = RejectionKind::from_code(999);
        assert_eq!(kind, RejectionKind::TransactionFailed { code: Some(999) });
        assert_eq!(kind.to_string(), "transaction failed (code 999)");
        assert_eq!(
            RejectionKind::TransactionFailed { code: None }.to_string(),
            "transaction failed"
        );
    }

    #[test]
    fn test_rejections_read_as_sentences() {
        let err = LedgerError::Rejected(RejectionKind::InsufficientCollateral);
        assert_eq!(
            err.to_string(),
            "rejected by the ledger: loan exceeds the borrowing limit"
        );
    }

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(LedgerError::Network("timeout".into()).is_retryable());
        assert!(!LedgerError::UserDeclined.is_retryable());
        assert!(!LedgerError::Rejected(RejectionKind::ExceedsClaim).is_retryable());
        assert!(!LedgerError::DataUnavailable("feed".into()).is_retryable());

        let lost = SettlementError::Ledger(LedgerError::Network("timeout".into()));
        assert!(lost.is_retryable());
        assert!(!SettlementError::NotAuthorized.is_retryable());
    }
}
