use crate::error::Error;
use crate::storage::FunderInfo;

/// Add a contribution to a funder's row
///
/// Formula: reward = (amount + top_up) × interest_rate_bps / 10,000
///
/// Example:
/// - existing: 40,000 at 500 bps → reward 2,000
/// - top up 10,000 → amount 50,000, reward 2,500
pub fn apply_contribution(
    info: &FunderInfo,
    amount: i128,
    interest_rate_bps: u32,
) -> Result<FunderInfo, Error> {
    let total = info
        .amount
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    let reward =
        lending_math::reward_for(total, interest_rate_bps).ok_or(Error::ArithmeticOverflow)?;

    Ok(FunderInfo {
        amount: total,
        reward,
        principal_repaid: info.principal_repaid,
        interest_repaid: info.interest_repaid,
    })
}

/// Check and apply one repayment against a funder's claim
///
/// Principal is capped by the unpaid contribution and interest by the unpaid
/// reward, so the campaign's stored rate bounds what a funder can receive.
pub fn apply_repayment(
    info: &FunderInfo,
    principal: i128,
    interest: i128,
) -> Result<FunderInfo, Error> {
    if principal < 0 || interest < 0 {
        return Err(Error::InvalidAmount);
    }
    if info.is_settled() {
        return Err(Error::FunderAlreadySettled);
    }
    if principal == 0 && interest == 0 {
        return Err(Error::InvalidAmount);
    }
    if principal > info.outstanding_principal() || interest > info.outstanding_interest() {
        return Err(Error::ExceedsClaim);
    }

    Ok(FunderInfo {
        amount: info.amount,
        reward: info.reward,
        principal_repaid: info.principal_repaid + principal,
        interest_repaid: info.interest_repaid + interest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funder(amount: i128, reward: i128) -> FunderInfo {
        FunderInfo {
            amount,
            reward,
            principal_repaid: 0,
            interest_repaid: 0,
        }
    }

    #[test]
    fn test_first_contribution() {
        let info = apply_contribution(&FunderInfo::default(), 40_000, 500).unwrap();

        assert_eq!(info.amount, 40_000);
        assert_eq!(info.reward, 2_000);
    }

    #[test]
    fn test_top_up_recomputes_reward_from_total() {
        // 333 at 3% → 9, then +333 → 666 at 3% → 19 (not 9 + 9)
        let first = apply_contribution(&FunderInfo::default(), 333, 300).unwrap();
        assert_eq!(first.reward, 9);

        let second = apply_contribution(&first, 333, 300).unwrap();
        assert_eq!(second.amount, 666);
        assert_eq!(second.reward, 19);
    }

    #[test]
    fn test_full_repayment() {
        let paid = apply_repayment(&funder(40_000, 2_000), 40_000, 2_000).unwrap();

        assert!(paid.is_settled());
        assert_eq!(paid.outstanding_principal(), 0);
        assert_eq!(paid.outstanding_interest(), 0);
    }

    #[test]
    fn test_second_repayment_after_settlement_fails() {
        let paid = apply_repayment(&funder(40_000, 2_000), 40_000, 2_000).unwrap();

        assert_eq!(
            apply_repayment(&paid, 40_000, 2_000),
            Err(Error::FunderAlreadySettled)
        );
    }

    #[test]
    fn test_partial_repayments() {
        let info = apply_repayment(&funder(40_000, 2_000), 10_000, 500).unwrap();
        assert_eq!(info.outstanding_principal(), 30_000);
        assert_eq!(info.outstanding_interest(), 1_500);

        // Interest alone can be settled last
        let info = apply_repayment(&info, 30_000, 0).unwrap();
        assert!(!info.is_settled());
        let info = apply_repayment(&info, 0, 1_500).unwrap();
        assert!(info.is_settled());
    }

    #[test]
    fn test_repayment_over_claim_fails() {
        let info = funder(40_000, 2_000);

        assert_eq!(
            apply_repayment(&info, 40_001, 0),
            Err(Error::ExceedsClaim)
        );
        assert_eq!(
            apply_repayment(&info, 40_000, 2_001),
            Err(Error::ExceedsClaim)
        );
    }

    #[test]
    fn test_empty_or_negative_repayment_fails() {
        let info = funder(40_000, 2_000);

        assert_eq!(apply_repayment(&info, 0, 0), Err(Error::InvalidAmount));
        assert_eq!(apply_repayment(&info, -1, 10), Err(Error::InvalidAmount));
    }
}
