//! Quoted price backed by rust_decimal, used for signal levels.
//!
//! Engine math stays in f64; prices handed to consumers are rounded to cents
//! and carried as exact decimals so they format without binary noise.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places kept on quoted prices.
pub const PRICE_DP: u32 = 2;

/// Exact decimal price. Serializes to a JSON number.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Round an engine value to cents, half away from zero.
    ///
    /// Returns None for NaN or infinite input.
    pub fn from_f64_rounded(value: f64) -> Option<Self> {
        Decimal::from_f64(value)
            .map(|d| Price(d.round_dp_with_strategy(PRICE_DP, RoundingStrategy::MidpointAwayFromZero)))
    }

    /// Parse a price from a string losslessly.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str(s).map(Price)
    }

    /// Canonical string without trailing zeros or exponent.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_cents() {
        let p = Price::from_f64_rounded(101.23456).unwrap();
        assert_eq!(p.to_canonical_string(), "101.23");

        let p = Price::from_f64_rounded(99.999).unwrap();
        assert_eq!(p.to_canonical_string(), "100");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        let p = Price::from_f64_rounded(2.125).unwrap();
        assert_eq!(p, Price::from_str_canonical("2.13").unwrap());
    }

    #[test]
    fn test_non_finite_is_rejected() {
        assert!(Price::from_f64_rounded(f64::NAN).is_none());
        assert!(Price::from_f64_rounded(f64::INFINITY).is_none());
    }

    #[test]
    fn test_json_is_number() {
        let p = Price::from_str_canonical("123.45").unwrap();
        let json = serde_json::to_value(p).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "123.45");
    }
}
