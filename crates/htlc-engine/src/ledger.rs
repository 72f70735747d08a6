//! Ledger collaborator: the balance-transfer primitive the engine consumes.
//!
//! The engine never mutates balances itself. It asks a [`Ledger`] to move
//! an amount between two accounts, and a transfer either moves every coin
//! or nothing. [`InMemoryLedger`] is the reference implementation used by
//! tests and the CLI.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use htlc_types::{AccountId, Coins, Denom, HtlcError, Result};
use rust_decimal::Decimal;

/// Balance-transfer primitive provided by the surrounding ledger.
pub trait Ledger {
    /// Move `amount` from `from` to `to`. All-or-nothing across coins.
    ///
    /// # Errors
    /// - `InsufficientFunds` if `from` lacks any denomination
    /// - `TransferRejected` if the ledger refuses the movement
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: &Coins) -> Result<()>;

    /// All non-zero balances of `account`, in denomination order.
    fn balances(&self, account: &AccountId) -> BTreeMap<Denom, Decimal>;

    /// Balance of one denomination.
    fn balance(&self, account: &AccountId, denom: &str) -> Decimal {
        self.balances(account)
            .get(denom)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// In-memory ledger with per-(account, denom) balances.
///
/// Accounts can be blocked from receiving funds, which makes credits to
/// them fail with `TransferRejected`.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<(AccountId, Denom), Decimal>,
    blocked: BTreeSet<AccountId>,
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint funds into an account.
    pub fn deposit(&mut self, account: &AccountId, denom: &str, amount: Decimal) {
        *self
            .balances
            .entry((account.clone(), denom.to_string()))
            .or_insert(Decimal::ZERO) += amount;
    }

    /// Refuse all future credits to `account`.
    pub fn block(&mut self, account: &AccountId) {
        self.blocked.insert(account.clone());
    }

    /// Accept credits to `account` again.
    pub fn unblock(&mut self, account: &AccountId) {
        self.blocked.remove(account);
    }

    /// Total supply of a denomination across all accounts.
    #[must_use]
    pub fn total_supply(&self, denom: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|((_, d), _)| d == denom)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

impl Ledger for InMemoryLedger {
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: &Coins) -> Result<()> {
        if self.blocked.contains(to) {
            return Err(HtlcError::TransferRejected {
                reason: format!("{to} is not allowed to receive funds"),
            });
        }

        let totals = amount.totals();

        // Check every denomination before touching any balance.
        for (denom, needed) in &totals {
            let available = self
                .balances
                .get(&(from.clone(), denom.clone()))
                .copied()
                .unwrap_or(Decimal::ZERO);
            if available < *needed {
                return Err(HtlcError::InsufficientFunds {
                    account: from.clone(),
                    denom: denom.clone(),
                    needed: *needed,
                    available,
                });
            }
        }

        for (denom, qty) in totals {
            *self
                .balances
                .entry((from.clone(), denom.clone()))
                .or_insert(Decimal::ZERO) -= qty;
            *self
                .balances
                .entry((to.clone(), denom))
                .or_insert(Decimal::ZERO) += qty;
        }
        Ok(())
    }

    fn balances(&self, account: &AccountId) -> BTreeMap<Denom, Decimal> {
        self.balances
            .iter()
            .filter(|((a, _), amount)| a == account && !amount.is_zero())
            .map(|((_, denom), amount)| (denom.clone(), *amount))
            .collect()
    }
}
