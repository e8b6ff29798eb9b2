//! Cross-representation normalization rules
//!
//! Legitimate representational differences between the snapshot and the
//! read-model are compensated here, before any comparison: timestamp
//! resolution, sentinel identities and price precision.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use types::party::NETWORK_PARTY;

/// Reserved owner standing in for the network party in the snapshot.
pub const SENTINEL_OWNER: &str = "*";
/// Reserved market id standing in for "no market" in the snapshot.
pub const SENTINEL_MARKET: &str = "!";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid price {0:?}")]
    InvalidPrice(String),

    #[error("rescale overflow for price {price} over {exponent} decimals")]
    Overflow { price: String, exponent: u32 },
}

/// Truncate a Unix nanosecond timestamp to microsecond resolution.
///
/// The read-model stores microsecond-resolution timestamps; the snapshot
/// keeps full nanoseconds. Idempotent.
pub fn truncate_to_micros(ts: i64) -> i64 {
    ts / 1000 * 1000
}

/// Translate the sentinel owner for account comparison.
pub fn account_owner(owner: &str) -> String {
    if owner == SENTINEL_OWNER {
        String::new()
    } else {
        owner.to_string()
    }
}

/// Translate an owner into a party identity.
pub fn owner_to_party(owner: &str) -> String {
    if owner == SENTINEL_OWNER {
        NETWORK_PARTY.to_string()
    } else {
        owner.to_string()
    }
}

/// Translate the sentinel market id.
pub fn account_market(market: &str) -> String {
    if market == SENTINEL_MARKET {
        String::new()
    } else {
        market.to_string()
    }
}

/// Rescale a market-precision price to the asset-precision integer string
/// the read-model serves, truncating toward zero on a downscale.
pub fn scale_price(
    raw: &str,
    asset_decimals: u32,
    market_decimals: u32,
) -> Result<String, NormalizeError> {
    let price =
        Decimal::from_str(raw).map_err(|_| NormalizeError::InvalidPrice(raw.to_string()))?;

    let scaled = if asset_decimals >= market_decimals {
        let exponent = asset_decimals - market_decimals;
        let factor = pow10(exponent).ok_or_else(|| overflow(raw, exponent))?;
        price
            .checked_mul(factor)
            .ok_or_else(|| overflow(raw, exponent))?
    } else {
        let exponent = market_decimals - asset_decimals;
        let factor = pow10(exponent).ok_or_else(|| overflow(raw, exponent))?;
        price
            .checked_div(factor)
            .ok_or_else(|| overflow(raw, exponent))?
    };

    Ok(scaled.trunc().to_string())
}

fn pow10(exponent: u32) -> Option<Decimal> {
    if exponent > 28 {
        return None;
    }
    Some(Decimal::from_i128_with_scale(10i128.pow(exponent), 0))
}

fn overflow(raw: &str, exponent: u32) -> NormalizeError {
    NormalizeError::Overflow {
        price: raw.to_string(),
        exponent,
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncate_drops_sub_microsecond_digits() {
        assert_eq!(truncate_to_micros(1_700_000_000_123_456_789), 1_700_000_000_123_456_000);
        assert_eq!(truncate_to_micros(999), 0);
        assert_eq!(truncate_to_micros(0), 0);
    }

    #[test]
    fn test_sentinel_owner_translation() {
        assert_eq!(account_owner("*"), "");
        assert_eq!(account_owner("alice"), "alice");
        assert_eq!(owner_to_party("*"), "network");
        assert_eq!(owner_to_party("alice"), "alice");
    }

    #[test]
    fn test_sentinel_market_translation() {
        assert_eq!(account_market("!"), "");
        assert_eq!(account_market("mkt-1"), "mkt-1");
    }

    #[test]
    fn test_scale_price_upscales_to_asset_precision() {
        // asset 18 decimals, market 5 decimals: factor 10^13
        assert_eq!(scale_price("1", 18, 5).unwrap(), "10000000000000");
        assert_eq!(scale_price("25", 18, 5).unwrap(), "250000000000000");
    }

    #[test]
    fn test_scale_price_identity_when_precisions_match() {
        assert_eq!(scale_price("123456", 5, 5).unwrap(), "123456");
    }

    #[test]
    fn test_scale_price_downscale_truncates_toward_zero() {
        assert_eq!(scale_price("123456", 2, 5).unwrap(), "123");
        assert_eq!(scale_price("999", 2, 5).unwrap(), "0");
    }

    #[test]
    fn test_scale_price_rejects_garbage() {
        assert!(matches!(
            scale_price("not-a-price", 18, 5),
            Err(NormalizeError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_scale_price_overflow() {
        assert!(matches!(
            scale_price("1", 30, 0),
            Err(NormalizeError::Overflow { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_truncate_is_idempotent(ts in any::<i64>()) {
            let once = truncate_to_micros(ts);
            prop_assert_eq!(once, truncate_to_micros(once));
        }

        #[test]
        fn prop_truncate_lands_on_microsecond_boundary(ts in any::<i64>()) {
            prop_assert_eq!(truncate_to_micros(ts) % 1000, 0);
        }
    }
}
