use soroban_sdk::{contractclient, log, Address, Env};

use crate::error::Error;
use crate::storage::Storage;

/// Interface of the external price oracle.
///
/// Prices are debt-token units per one whole unit of `asset`, scaled by
/// `lending_math::PRICE_DECIMALS`.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn get_price(env: Env, asset: Address) -> Option<i128>;
}

/// Current oracle price for a listed asset
///
/// Fails closed: a reverted feed call, a missing quote and a non-positive
/// quote all surface as `PriceUnavailable`. There is no fallback price.
pub fn price_of(env: &Env, asset: &Address) -> Result<i128, Error> {
    let info = Storage::get_asset(env, asset)?;
    let feed = PriceFeedClient::new(env, &info.price_feed);

    match feed.try_get_price(asset) {
        Ok(Ok(Some(price))) if price > 0 => Ok(price),
        _ => {
            log!(env, "no usable price", asset.clone(), info.price_feed.clone());
            Err(Error::PriceUnavailable)
        }
    }
}

/// Value `amount` raw units of `asset` in raw debt-token units, rounded down.
pub fn value_of(env: &Env, asset: &Address, amount: i128) -> Result<i128, Error> {
    if amount == 0 {
        return Ok(0);
    }

    let info = Storage::get_asset(env, asset)?;
    let debt_decimals = Storage::get_debt_decimals(env)?;
    let price = price_of(env, asset)?;

    lending_math::value_of(amount, price, info.decimals, debt_decimals)
        .ok_or(Error::ArithmeticOverflow)
}

/// Sum of `value_of` over every listed asset the owner holds
///
/// `adjusted` substitutes a hypothetical balance for one asset, which is how a
/// withdrawal is checked before it is applied.
pub fn collateral_value(
    env: &Env,
    owner: &Address,
    adjusted: Option<(&Address, i128)>,
) -> Result<i128, Error> {
    let mut total: i128 = 0;

    for asset in Storage::get_asset_list(env).iter() {
        let balance = match adjusted {
            Some((target, balance)) if *target == asset => balance,
            _ => Storage::get_collateral(env, owner, &asset),
        };

        let value = value_of(env, &asset, balance)?;
        total = total.checked_add(value).ok_or(Error::ArithmeticOverflow)?;
    }

    Ok(total)
}
