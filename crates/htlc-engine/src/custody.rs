//! Custody conservation invariant.
//!
//! After every committed operation:
//! ```text
//! ∀ denom: balance(custody, denom) == Σ amount_of(denom) over stored-Open HTLCs
//! ```
//!
//! Expired-but-unrefunded HTLCs are still stored as `Open`, so their funds
//! remain in custody and count towards the sum. A mismatch means funds were
//! moved outside the handlers; the caller should halt.

use std::collections::{BTreeMap, BTreeSet};

use htlc_types::{AccountId, Denom, HtlcError, Result};
use rust_decimal::Decimal;

use crate::ledger::Ledger;
use crate::registry::HtlcRegistry;

/// Checks the custody account against the registry.
pub struct CustodyInvariant;

impl CustodyInvariant {
    /// Sum of amounts locked by stored-`Open` HTLCs, per denomination.
    #[must_use]
    pub fn expected(registry: &HtlcRegistry) -> BTreeMap<Denom, Decimal> {
        let mut totals: BTreeMap<Denom, Decimal> = BTreeMap::new();
        for htlc in registry.iter_open() {
            for (denom, amount) in htlc.amount.totals() {
                *totals.entry(denom).or_insert(Decimal::ZERO) += amount;
            }
        }
        totals
    }

    /// Verify every denomination held by custody or locked in an open HTLC.
    ///
    /// # Errors
    /// Returns [`HtlcError::InvariantViolation`] naming the first mismatched
    /// denomination (in lexical order).
    pub fn verify<L: Ledger>(
        registry: &HtlcRegistry,
        ledger: &L,
        custody: &AccountId,
    ) -> Result<()> {
        let expected = Self::expected(registry);
        let actual = ledger.balances(custody);

        let denoms: BTreeSet<&Denom> = expected.keys().chain(actual.keys()).collect();
        for denom in denoms {
            let want = expected.get(denom).copied().unwrap_or(Decimal::ZERO);
            let have = actual.get(denom).copied().unwrap_or(Decimal::ZERO);
            if want != have {
                tracing::error!(denom = %denom, expected = %want, actual = %have, "CRITICAL: custody invariant violated");
                return Err(HtlcError::InvariantViolation {
                    reason: format!(
                        "custody {custody} holds {have}{denom}, open HTLCs lock {want}{denom}"
                    ),
                });
            }
        }
        Ok(())
    }
}
