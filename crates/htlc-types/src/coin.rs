//! Amount types: a non-empty multiset of (denomination, quantity) pairs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{HtlcError, Result};

/// Type alias for denomination identifiers (e.g., "stake", "uatom").
pub type Denom = String;

/// A single (denomination, quantity) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coin {
    pub denom: Denom,
    pub amount: Decimal,
}

impl Coin {
    #[must_use]
    pub fn new(denom: impl Into<Denom>, amount: Decimal) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = HtlcError;

    /// Parse `<quantity><denom>`, e.g. `100stake` or `0.5uatom`.
    ///
    /// The quantity is plain decimal digits; exponent notation is rejected
    /// rather than read as part of the denomination.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| HtlcError::InvalidAmount {
                reason: format!("{s:?} has no denomination"),
            })?;
        let (qty, denom) = s.split_at(split);
        if denom.starts_with(['e', 'E'])
            && !qty.is_empty()
            && denom
                .chars()
                .nth(1)
                .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
        {
            return Err(HtlcError::InvalidAmount {
                reason: format!("{s:?}: exponent notation is not supported"),
            });
        }
        check_denom(denom)?;
        let amount = Decimal::from_str(qty).map_err(|e| HtlcError::InvalidAmount {
            reason: format!("{s:?}: bad quantity {qty:?}: {e}"),
        })?;
        Ok(Self::new(denom, amount))
    }
}

/// A denomination starts with an ASCII letter, followed by letters, digits,
/// or any of `/ : . _ -`.
fn check_denom(denom: &str) -> Result<()> {
    let mut chars = denom.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(HtlcError::InvalidAmount {
            reason: format!("invalid denomination {denom:?}"),
        })
    }
}

/// The amount locked by an HTLC.
///
/// Duplicate denominations are allowed; ledger movements use [`Coins::totals`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Coins(pub Vec<Coin>);

impl Coins {
    #[must_use]
    pub fn new(coins: Vec<Coin>) -> Self {
        Self(coins)
    }

    /// A single-denomination amount.
    #[must_use]
    pub fn single(denom: impl Into<Denom>, amount: Decimal) -> Self {
        Self(vec![Coin::new(denom, amount)])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    /// Check that the amount is non-empty, every denomination is well formed,
    /// and every quantity is strictly positive.
    ///
    /// # Errors
    /// Returns `InvalidAmount` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(HtlcError::InvalidAmount {
                reason: "amount must not be empty".into(),
            });
        }
        for coin in &self.0 {
            check_denom(&coin.denom)?;
            if coin.amount <= Decimal::ZERO {
                return Err(HtlcError::InvalidAmount {
                    reason: format!("coin {coin} must be positive"),
                });
            }
        }
        Ok(())
    }

    /// Quantities summed per denomination, in denomination order.
    #[must_use]
    pub fn totals(&self) -> BTreeMap<Denom, Decimal> {
        let mut totals = BTreeMap::new();
        for coin in &self.0 {
            *totals.entry(coin.denom.clone()).or_insert(Decimal::ZERO) += coin.amount;
        }
        totals
    }

    /// Quantity of one denomination.
    #[must_use]
    pub fn amount_of(&self, denom: &str) -> Decimal {
        self.0
            .iter()
            .filter(|c| c.denom == denom)
            .map(|c| c.amount)
            .sum()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

impl FromStr for Coins {
    type Err = HtlcError;

    /// Parse a comma-separated list, e.g. `100stake,5uatom`.
    fn from_str(s: &str) -> Result<Self> {
        let coins = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Coin::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(coins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_coin() {
        let coins: Coins = "100stake".parse().unwrap();
        assert_eq!(coins, Coins::single("stake", Decimal::new(100, 0)));
        assert!(coins.validate().is_ok());
    }

    #[test]
    fn parse_multiple_coins_and_display() {
        let coins: Coins = "100stake, 0.5uatom".parse().unwrap();
        assert_eq!(coins.0.len(), 2);
        assert_eq!(coins.amount_of("uatom"), Decimal::new(5, 1));
        assert_eq!(coins.to_string(), "100stake,0.5uatom");
    }

    #[test]
    fn parse_rejects_missing_denom() {
        let err = "100".parse::<Coins>().unwrap_err();
        assert!(matches!(err, HtlcError::InvalidAmount { .. }));
    }

    #[test]
    fn parse_rejects_exponent_notation() {
        for input in ["1e5stake", "2E3atom", "1e-2stake", "1.5e+3uatom"] {
            let err = input.parse::<Coin>().unwrap_err();
            assert!(matches!(err, HtlcError::InvalidAmount { .. }), "{input}");
        }
    }

    #[test]
    fn parse_accepts_denom_starting_with_e() {
        let coin: Coin = "10eth".parse().unwrap();
        assert_eq!(coin, Coin::new("eth", Decimal::new(10, 0)));
        let ibc: Coin = "7ibc/27394FB0".parse().unwrap();
        assert_eq!(ibc.denom, "ibc/27394FB0");
    }

    #[test]
    fn parse_rejects_bad_denom_and_sign() {
        for input in ["100 stake", "100st@ke", "-5stake", "stake"] {
            assert!(input.parse::<Coin>().is_err(), "{input}");
        }
    }

    #[test]
    fn malformed_denom_invalid() {
        let coins = Coins::single("1stake", Decimal::ONE);
        assert!(matches!(
            coins.validate().unwrap_err(),
            HtlcError::InvalidAmount { .. }
        ));
        assert!(Coins::single("", Decimal::ONE).validate().is_err());
    }

    #[test]
    fn empty_amount_invalid() {
        let err = Coins::default().validate().unwrap_err();
        assert!(matches!(err, HtlcError::InvalidAmount { .. }));
    }

    #[test]
    fn non_positive_amount_invalid() {
        let zero = Coins::single("stake", Decimal::ZERO);
        assert!(zero.validate().is_err());
        let negative = Coins::single("stake", Decimal::new(-1, 0));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn totals_merge_duplicate_denoms() {
        let coins = Coins::new(vec![
            Coin::new("stake", Decimal::new(10, 0)),
            Coin::new("atom", Decimal::new(1, 0)),
            Coin::new("stake", Decimal::new(5, 0)),
        ]);
        let totals = coins.totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["stake"], Decimal::new(15, 0));
        assert_eq!(totals["atom"], Decimal::ONE);
    }

    #[test]
    fn serde_uses_plain_list() {
        let coins = Coins::single("stake", Decimal::new(12345, 2));
        let json = serde_json::to_string(&coins).unwrap();
        assert!(json.starts_with('['), "Got: {json}");
        let back: Coins = serde_json::from_str(&json).unwrap();
        assert_eq!(coins, back);
    }
}
