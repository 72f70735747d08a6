//! User intents consumed by the command handlers.
//!
//! Each message carries a stateless `validate_basic()` that rejects
//! malformed input before any registry or ledger access.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_LENGTH_FOR_ADDRESS_ON_OTHER_CHAIN;
use crate::{AccountId, Coins, HashLock, HtlcError, Result, Secret, hashlock};

/// How the hash lock of a new HTLC is supplied.
///
/// Exactly one variant is accepted; there is no inference from optional
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CreateMode {
    /// Derive the hash lock from a locally known secret.
    BySecret { secret: Secret, timestamp: u64 },
    /// The counter-leg already committed to a hash lock off-chain.
    ByHashLock { hash_lock: HashLock, timestamp: u64 },
}

impl CreateMode {
    /// The hash lock this mode commits to.
    ///
    /// # Errors
    /// Returns `InvalidSecretLength` for a `BySecret` secret of the wrong
    /// length.
    pub fn hash_lock(&self) -> Result<HashLock> {
        match self {
            Self::BySecret { secret, timestamp } => hashlock::derive(secret, *timestamp),
            Self::ByHashLock { hash_lock, .. } => Ok(*hash_lock),
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::BySecret { timestamp, .. } | Self::ByHashLock { timestamp, .. } => *timestamp,
        }
    }

    /// Replace a `BySecret` mode with the equivalent `ByHashLock` mode, so
    /// the secret never leaves the local machine.
    ///
    /// # Errors
    /// Returns `InvalidSecretLength` for a secret of the wrong length.
    pub fn into_committed(self) -> Result<Self> {
        let hash_lock = self.hash_lock()?;
        Ok(Self::ByHashLock {
            hash_lock,
            timestamp: self.timestamp(),
        })
    }
}

/// Create an HTLC, escrowing `amount` from `sender`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateHtlc {
    pub sender: AccountId,
    pub to: AccountId,
    pub receiver_on_other_chain: String,
    pub amount: Coins,
    #[serde(flatten)]
    pub mode: CreateMode,
    pub time_lock: u64,
}

impl MsgCreateHtlc {
    /// Stateless checks. Time-lock range limits are configuration and are
    /// enforced by the handler.
    pub fn validate_basic(&self) -> Result<()> {
        check_account("sender", &self.sender)?;
        check_account("recipient", &self.to)?;
        if self.receiver_on_other_chain.len() > MAX_LENGTH_FOR_ADDRESS_ON_OTHER_CHAIN {
            return Err(HtlcError::InvalidAddress {
                reason: format!(
                    "length of the receiver on other chain must be between [0,{MAX_LENGTH_FOR_ADDRESS_ON_OTHER_CHAIN}]"
                ),
            });
        }
        self.amount.validate()?;
        self.mode.hash_lock()?;
        if self.time_lock == 0 {
            return Err(HtlcError::InvalidTimeLock {
                reason: "time lock must be positive".into(),
            });
        }
        Ok(())
    }
}

/// Claim an open HTLC by revealing its secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimHtlc {
    pub sender: AccountId,
    pub hash_lock: HashLock,
    pub secret: Secret,
}

impl MsgClaimHtlc {
    pub fn validate_basic(&self) -> Result<()> {
        check_account("sender", &self.sender)?;
        self.secret.check_length()
    }
}

/// Refund an expired HTLC to its recorded sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRefundHtlc {
    pub sender: AccountId,
    pub hash_lock: HashLock,
}

impl MsgRefundHtlc {
    pub fn validate_basic(&self) -> Result<()> {
        check_account("sender", &self.sender)
    }
}

fn check_account(role: &str, account: &AccountId) -> Result<()> {
    if account.is_empty() {
        return Err(HtlcError::InvalidAddress {
            reason: format!("{role} missing"),
        });
    }
    Ok(())
}
