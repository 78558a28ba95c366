//! Exact monetary amounts.
//!
//! toncenter reports balances, fees and message values in nanotons, usually
//! as decimal strings. [`Amount`] keeps them as an exact base-10 decimal so
//! equality and ordering never go through floating point.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 1 TON = 10^9 nanotons.
pub const NANOTONS_PER_TON: u64 = 1_000_000_000;

/// Decimal scale of one nanoton relative to one TON.
const TON_SCALE: u32 = 9;

/// An exact amount of nanotons.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Amount(pub Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Returns the wrapped decimal.
    pub const fn inner(self) -> Decimal {
        self.0
    }

    /// Create an [`Amount`] from a nanoton count.
    pub fn from_nanotons(nanotons: u64) -> Self {
        Self(Decimal::from(nanotons))
    }

    /// Create an [`Amount`] from a (possibly fractional) TON value.
    ///
    /// Returns `None` if the result does not fit the decimal range.
    pub fn from_tons(tons: Decimal) -> Option<Self> {
        tons.checked_mul(Decimal::from(NANOTONS_PER_TON)).map(Self)
    }

    /// Value in TON, exact (scaled down by 10^9).
    pub fn to_tons(self) -> Decimal {
        let mut tons = self.0;
        let scale = tons.scale() + TON_SCALE;
        if tons.set_scale(scale).is_ok() {
            tons.normalize()
        } else {
            self.0 / Decimal::from(NANOTONS_PER_TON)
        }
    }

    /// Whole nanotons as `u64`, if the amount is a non-negative integer in range.
    pub fn as_nanotons(self) -> Option<u64> {
        if self.0.fract().is_zero() {
            self.0.to_u64()
        } else {
            None
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::from_nanotons(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a string or a 64-bit integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
        Decimal::from_u128(v)
            .map(Amount)
            .ok_or_else(|| E::custom("amount out of decimal range"))
    }

    // Fractional or out-of-range JSON numbers arrive already rounded to f64.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Err(E::invalid_type(de::Unexpected::Float(v), &self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_string_without_precision_loss() {
        let amount: Amount = serde_json::from_str("\"123456789012345678901\"").unwrap();
        assert_eq!(amount.to_string(), "123456789012345678901");
    }

    #[test]
    fn decodes_integer_number() {
        let amount: Amount = serde_json::from_str("987654321").unwrap();
        assert_eq!(amount, Amount::from_nanotons(987_654_321));
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Amount>("\"twelve\"").is_err());
        assert!(serde_json::from_str::<Amount>("true").is_err());
    }

    #[test]
    fn rejects_numbers_that_lost_precision() {
        assert!(serde_json::from_str::<Amount>("18446744073709551617").is_err());
        assert!(serde_json::from_str::<Amount>("123456789012345678901234567").is_err());
        assert!(serde_json::from_str::<Amount>("0.1000000000000000055511151231257827").is_err());

        let amount: Amount =
            serde_json::from_str("\"0.1000000000000000055511151231257827\"").unwrap();
        assert_eq!(amount.to_string(), "0.1000000000000000055511151231257827");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Amount::from_nanotons(42)).unwrap();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn ton_conversions_are_exact() {
        let amount = Amount::from_nanotons(1_500_000_001);
        assert_eq!(amount.to_tons(), Decimal::from_str("1.500000001").unwrap());

        let back = Amount::from_tons(Decimal::from_str("1.500000001").unwrap()).unwrap();
        assert_eq!(back, amount);
        assert_eq!(back.as_nanotons(), Some(1_500_000_001));
    }

    #[test]
    fn ordering_is_exact() {
        let a: Amount = "1000000000000000001".parse().unwrap();
        let b: Amount = "1000000000000000000".parse().unwrap();
        assert!(a > b);
        assert_ne!(a, b);
    }

    #[test]
    fn fractional_amount_has_no_nanoton_count() {
        let amount: Amount = "0.5".parse().unwrap();
        assert_eq!(amount.as_nanotons(), None);
    }
}
