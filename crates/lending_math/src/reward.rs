use crate::BPS_DENOMINATOR;

/// Reward owed to a funder for a contribution
///
/// Formula: reward = amount × interest_rate_bps / 10,000
///
/// Always computed from the funder's total contribution, so topping up
/// recomputes the same value a single contribution of the total would give.
///
/// Example:
/// - amount: 40,000
/// - rate: 5% (500 basis points)
/// - reward: 2,000
pub fn reward_for(amount: i128, interest_rate_bps: u32) -> Option<i128> {
    amount
        .checked_mul(interest_rate_bps as i128)?
        .checked_div(BPS_DENOMINATOR)
}

/// Interest due alongside a principal repayment, from the campaign's own rate
///
/// Formula: interest = principal × outstanding_reward / outstanding_principal
///
/// Repaying the whole outstanding principal returns the whole outstanding
/// reward, so a sequence of partial repayments never leaves rounding dust.
///
/// Example:
/// - outstanding principal 40,000, outstanding reward 2,000
/// - repay 10,000 → interest 500
/// - repay 40,000 → interest 2,000
pub fn pro_rata_interest(
    principal: i128,
    outstanding_principal: i128,
    outstanding_reward: i128,
) -> Option<i128> {
    if principal < 0 || outstanding_principal < 0 || outstanding_reward < 0 {
        return None;
    }
    if principal >= outstanding_principal {
        return Some(outstanding_reward);
    }

    principal
        .checked_mul(outstanding_reward)?
        .checked_div(outstanding_principal)
}

/// Interest as a flat percentage of the principal being repaid
///
/// Formula: interest = principal × expected_return_percent / 100
///
/// This ignores the campaign's stored rate entirely; it is only offered as an
/// alternative interest source for settlement callers that price repayments
/// with an "expected return" percentage.
pub fn expected_return_interest(principal: i128, expected_return_percent: u32) -> Option<i128> {
    if principal < 0 {
        return None;
    }
    principal
        .checked_mul(expected_return_percent as i128)?
        .checked_div(100)
}
