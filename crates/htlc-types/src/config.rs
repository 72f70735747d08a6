//! Configuration for the HTLC engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AccountId, HtlcError, Result, constants};

/// Who may trigger a refund of an expired HTLC.
///
/// Funds always return to the recorded sender; this only controls who may
/// submit the refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundPolicy {
    /// Only the recorded sender.
    #[default]
    SenderOnly,
    /// Any account, e.g. a cross-chain relayer.
    Anyone,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ledger account holding all escrowed funds.
    pub custody_account: AccountId,
    /// Smallest accepted time lock, in blocks.
    pub min_time_lock: u64,
    /// Largest accepted time lock, in blocks.
    pub max_time_lock: u64,
    /// Refund authorization.
    pub refund_policy: RefundPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            custody_account: AccountId::new(constants::DEFAULT_CUSTODY_ACCOUNT),
            min_time_lock: constants::MIN_TIME_LOCK,
            max_time_lock: constants::MAX_TIME_LOCK,
            refund_policy: RefundPolicy::SenderOnly,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.custody_account.is_empty() {
            return Err(HtlcError::Configuration(
                "custody_account must not be empty".into(),
            ));
        }
        if self.min_time_lock == 0 {
            return Err(HtlcError::Configuration(
                "min_time_lock must be positive".into(),
            ));
        }
        if self.min_time_lock > self.max_time_lock {
            return Err(HtlcError::Configuration(format!(
                "min_time_lock {} exceeds max_time_lock {}",
                self.min_time_lock, self.max_time_lock
            )));
        }
        Ok(())
    }

    /// Reject a time lock outside `[min_time_lock, max_time_lock]`.
    pub fn check_time_lock(&self, time_lock: u64) -> Result<()> {
        if time_lock < self.min_time_lock || time_lock > self.max_time_lock {
            return Err(HtlcError::InvalidTimeLock {
                reason: format!(
                    "the time lock must be between [{},{}], got {time_lock}",
                    self.min_time_lock, self.max_time_lock
                ),
            });
        }
        Ok(())
    }

    /// Reject the custody account as either party of an HTLC.
    ///
    /// Custody can only hold escrowed funds. As a sender its transfer would
    /// be a self-transfer; as a receiver a claim would leave the funds in place.
    pub fn check_parties(&self, sender: &AccountId, to: &AccountId) -> Result<()> {
        for (role, account) in [("sender", sender), ("receiver", to)] {
            if *account == self.custody_account {
                return Err(HtlcError::InvalidAddress {
                    reason: format!("the {role} must not be the custody account {account}"),
                });
            }
        }
        Ok(())
    }
}
