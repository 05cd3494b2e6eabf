//! Fail-soft parsing of user-entered numbers.
//!
//! Values typed into an order are re-priced on every edit, so a half-typed or
//! garbage value must price as zero instead of rejecting the whole order.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Parses a money amount. Non-numeric, blank and negative input yields zero.
pub fn amount(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim())
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

/// Parses a piece count. Fractions are truncated; anything unparseable or
/// negative yields zero.
pub fn quantity(raw: &str) -> u32 {
    let raw = raw.trim();
    raw.parse::<u32>().unwrap_or_else(|_| {
        Decimal::from_str(raw)
            .ok()
            .and_then(|value| value.trunc().to_u32())
            .unwrap_or(0)
    })
}

/// `clap` value parser that never rejects input.
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    Ok(amount(raw))
}

pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(amount).unwrap_or(Decimal::ZERO))
}

pub fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(quantity).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_coercion() {
        assert_eq!(amount("12.50"), dec!(12.50));
        assert_eq!(amount(" 3 "), dec!(3));
        assert_eq!(amount(""), Decimal::ZERO);
        assert_eq!(amount("abc"), Decimal::ZERO);
        assert_eq!(amount("-4"), Decimal::ZERO);
    }

    #[test]
    fn test_quantity_coercion() {
        assert_eq!(quantity("7"), 7);
        assert_eq!(quantity("2.9"), 2);
        assert_eq!(quantity(""), 0);
        assert_eq!(quantity("ten"), 0);
        assert_eq!(quantity("-3"), 0);
    }

    #[test]
    fn test_numeric_limits() {
        assert_eq!(amount("79228162514264337593543950335"), Decimal::MAX);
        assert_eq!(quantity("4294967295"), u32::MAX);
        assert_eq!(quantity("4294967296"), 0);
        assert_eq!(quantity("4294967296.5"), 0);
    }

    #[test]
    fn test_parse_amount_never_fails() {
        assert_eq!(parse_amount("not money"), Ok(Decimal::ZERO));
        assert_eq!(parse_amount("9.99"), Ok(dec!(9.99)));
    }
}
