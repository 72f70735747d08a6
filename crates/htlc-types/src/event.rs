//! Audit events emitted by the command handlers.
//!
//! Every successful create, claim or refund produces exactly one
//! [`HtlcEvent`]. Together with the retained terminal entities they form
//! the audit trail of the custody account.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Coins, HashLock, Secret};

/// A state change that was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HtlcEvent {
    /// Funds moved from `sender` into custody; the HTLC is open.
    Created {
        hash_lock: HashLock,
        sender: AccountId,
        to: AccountId,
        receiver_on_other_chain: String,
        amount: Coins,
        expiration_height: u64,
    },
    /// The secret was revealed; funds moved from custody to `to`.
    Claimed {
        hash_lock: HashLock,
        claimer: AccountId,
        to: AccountId,
        secret: Secret,
        amount: Coins,
    },
    /// The deadline passed; funds moved from custody back to `sender`.
    Refunded {
        hash_lock: HashLock,
        caller: AccountId,
        sender: AccountId,
        amount: Coins,
    },
}

impl HtlcEvent {
    /// The HTLC this event belongs to.
    #[must_use]
    pub fn hash_lock(&self) -> HashLock {
        match self {
            Self::Created { hash_lock, .. }
            | Self::Claimed { hash_lock, .. }
            | Self::Refunded { hash_lock, .. } => *hash_lock,
        }
    }
}

impl std::fmt::Display for HtlcEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created { hash_lock, amount, .. } => {
                write!(f, "CREATE_HTLC {hash_lock} {amount}")
            }
            Self::Claimed { hash_lock, amount, .. } => {
                write!(f, "CLAIM_HTLC {hash_lock} {amount}")
            }
            Self::Refunded { hash_lock, amount, .. } => {
                write!(f, "REFUND_HTLC {hash_lock} {amount}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn display_names_action() {
        let event = HtlcEvent::Refunded {
            hash_lock: HashLock([0x11; 32]),
            caller: "alice".into(),
            sender: "alice".into(),
            amount: Coins::single("stake", Decimal::new(100, 0)),
        };
        let msg = event.to_string();
        assert!(msg.starts_with("REFUND_HTLC 1111"));
        assert!(msg.ends_with("100stake"));
        assert_eq!(event.hash_lock(), HashLock([0x11; 32]));
    }

    #[test]
    fn serde_is_tagged() {
        let event = HtlcEvent::Claimed {
            hash_lock: HashLock([0x22; 32]),
            claimer: "carol".into(),
            to: "bob".into(),
            secret: Secret::new(vec![7u8; 32]),
            amount: Coins::single("stake", Decimal::ONE),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"claimed\""));
        let back: HtlcEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
