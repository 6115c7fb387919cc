use crate::PRICE_DECIMALS;

/// `10^decimals` as an `i128`, `None` past 10^38.
pub fn pow10(decimals: u32) -> Option<i128> {
    10i128.checked_pow(decimals)
}

/// Value a raw collateral amount in raw debt-token units
///
/// Formula: value = amount × price × 10^debt_decimals / (10^asset_decimals × 10^PRICE_DECIMALS)
///
/// The decimal adjustment is folded into a single multiply or divide so the
/// intermediate product only carries the decimals it needs.
///
/// Example:
/// - amount: 2.5 BTC with 8 decimals = 250_000_000
/// - price: 60,000 debt tokens per BTC = 60_000 × 10^8
/// - debt token decimals: 2
/// - value: 2.5 × 60,000 = 150,000.00 = 15_000_000
pub fn value_of(
    amount: i128,
    price: i128,
    asset_decimals: u32,
    debt_decimals: u32,
) -> Option<i128> {
    if amount < 0 || price <= 0 {
        return None;
    }

    let product = amount.checked_mul(price)?;
    let source_decimals = asset_decimals.checked_add(PRICE_DECIMALS)?;

    if debt_decimals >= source_decimals {
        product.checked_mul(pow10(debt_decimals - source_decimals)?)
    } else {
        match pow10(source_decimals - debt_decimals) {
            Some(divisor) => product.checked_div(divisor),
            // Divisor exceeds any i128 product
            None => Some(0),
        }
    }
}
