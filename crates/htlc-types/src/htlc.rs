//! # HTLC: the hash time-locked escrow record
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  claim(secret)  ┌───────────┐
//!   │ OPEN ├────────────────▶│ COMPLETED │
//!   └──┬───┘                 └───────────┘
//!      │ height >= expiration_height
//!      ▼
//!   ┌─────────┐   refund   ┌──────────┐
//!   │ EXPIRED ├───────────▶│ REFUNDED │
//!   └─────────┘            └──────────┘
//! ```
//!
//! Expiry is evaluated lazily: the engine never rewrites an entity to
//! `Expired`. Claim and refund compare the supplied height against the
//! stored `expiration_height`, and read paths use
//! [`Htlc::effective_state`] to present the derived state.
//!
//! Transitions are pure: [`Htlc::apply`] returns the next entity and leaves
//! `self` untouched, so callers can defer persisting until their ledger
//! movement succeeded.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_LENGTH_FOR_ADDRESS_ON_OTHER_CHAIN;
use crate::{AccountId, Coins, HashLock, HtlcError, Result, Secret, hashlock};

/// The lifecycle state of an HTLC.
///
/// Transitions are **monotonic**:
/// - `Open → Completed` (claimed with the correct secret)
/// - `Open → Expired → Refunded` (deadline passed, funds returned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtlcState {
    /// Funds are in custody and claimable with the secret.
    Open,
    /// Claimed. Funds released to the receiver. **Terminal.**
    Completed,
    /// Deadline passed without a claim. Refundable.
    Expired,
    /// Funds returned to the sender. **Terminal.**
    Refunded,
}

impl HtlcState {
    /// Can this state transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Completed | Self::Expired | Self::Refunded)
                | (Self::Expired, Self::Refunded)
        )
    }

    /// `Completed` and `Refunded` have no outgoing transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Refunded)
    }
}

impl std::fmt::Display for HtlcState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// An event applied to an existing HTLC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Reveal the secret and release funds to the receiver.
    Claim(Secret),
    /// Return funds to the sender after expiry.
    Refund,
}

/// Terms agreed at creation time, before the entity exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtlcTerms {
    pub sender: AccountId,
    pub to: AccountId,
    pub receiver_on_other_chain: String,
    pub amount: Coins,
    pub hash_lock: HashLock,
    pub timestamp: u64,
    pub time_lock: u64,
}

/// A hash time-locked contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Htlc {
    /// Account whose funds were escrowed.
    pub sender: AccountId,
    /// Account that receives the funds on a successful claim.
    pub to: AccountId,
    /// Opaque counter-chain receiver tag.
    pub receiver_on_other_chain: String,
    /// Escrowed amount.
    pub amount: Coins,
    /// Primary key: commitment to the secret.
    pub hash_lock: HashLock,
    /// Empty until revealed by a claim.
    pub secret: Secret,
    /// Creation-time input to hash-lock derivation.
    pub timestamp: u64,
    /// Offset from the creation height, in blocks.
    pub time_lock: u64,
    /// `creation_height + time_lock`. Immutable after creation.
    pub expiration_height: u64,
    /// Current stored state.
    pub state: HtlcState,
}

impl Htlc {
    /// The `Create` transition: build an `Open` HTLC at `current_height`.
    ///
    /// # Errors
    /// - `InvalidTimeLock` if the time lock is zero or the expiration height
    ///   overflows
    /// - any error from [`Htlc::validate`]
    pub fn create(terms: HtlcTerms, current_height: u64) -> Result<Self> {
        let expiration_height = current_height.checked_add(terms.time_lock).ok_or_else(|| {
            HtlcError::InvalidTimeLock {
                reason: format!(
                    "height {current_height} + time lock {} overflows",
                    terms.time_lock
                ),
            }
        })?;

        let htlc = Self {
            sender: terms.sender,
            to: terms.to,
            receiver_on_other_chain: terms.receiver_on_other_chain,
            amount: terms.amount,
            hash_lock: terms.hash_lock,
            secret: Secret::empty(),
            timestamp: terms.timestamp,
            time_lock: terms.time_lock,
            expiration_height,
            state: HtlcState::Open,
        };
        htlc.validate()?;
        Ok(htlc)
    }

    /// Apply `transition` at `current_height` and return the next entity.
    ///
    /// The HTLC is expired from `expiration_height` onward: at exactly that
    /// height a claim fails with `HtlcExpired` and a refund succeeds.
    ///
    /// # Errors
    /// - `HtlcNotOpen` if the HTLC already reached a terminal state
    /// - `HtlcExpired` for a claim at or after the expiration height
    /// - `HashLockMismatch` for a claim with the wrong secret
    /// - `HtlcNotExpired` for a refund before the expiration height
    pub fn apply(&self, transition: &Transition, current_height: u64) -> Result<Self> {
        match transition {
            Transition::Claim(secret) => self.claimed(secret, current_height),
            Transition::Refund => self.refunded(current_height),
        }
    }

    fn claimed(&self, secret: &Secret, current_height: u64) -> Result<Self> {
        if self.state != HtlcState::Open {
            return Err(self.not_open());
        }
        if self.is_expired(current_height) {
            return Err(HtlcError::HtlcExpired {
                hash_lock: self.hash_lock,
                expiration_height: self.expiration_height,
                current_height,
            });
        }
        if !hashlock::verify(secret, self.timestamp, &self.hash_lock) {
            return Err(HtlcError::HashLockMismatch(self.hash_lock));
        }

        let mut next = self.clone();
        next.secret = secret.clone();
        next.state = HtlcState::Completed;
        Ok(next)
    }

    fn refunded(&self, current_height: u64) -> Result<Self> {
        if !self.state.can_transition_to(HtlcState::Refunded) {
            return Err(self.not_open());
        }
        if !self.is_expired(current_height) {
            return Err(HtlcError::HtlcNotExpired {
                hash_lock: self.hash_lock,
                expiration_height: self.expiration_height,
                current_height,
            });
        }

        let mut next = self.clone();
        next.state = HtlcState::Refunded;
        Ok(next)
    }

    fn not_open(&self) -> HtlcError {
        HtlcError::HtlcNotOpen {
            hash_lock: self.hash_lock,
            state: self.state,
        }
    }

    /// An HTLC is expired once the chain reaches its expiration height.
    #[must_use]
    pub fn is_expired(&self, current_height: u64) -> bool {
        current_height >= self.expiration_height
    }

    /// The state a read-only consumer should see at `current_height`.
    ///
    /// An `Open` HTLC past its deadline reports `Expired`.
    #[must_use]
    pub fn effective_state(&self, current_height: u64) -> HtlcState {
        match self.state {
            HtlcState::Open if self.is_expired(current_height) => HtlcState::Expired,
            state => state,
        }
    }

    /// Height at which the HTLC was created.
    #[must_use]
    pub fn creation_height(&self) -> u64 {
        self.expiration_height.saturating_sub(self.time_lock)
    }

    /// Check the entity-level invariants, reporting the first violated field.
    ///
    /// # Errors
    /// `InvalidAddress`, `InvalidAmount`, `InvalidHashLock`,
    /// `InvalidTimeLock`, `InvalidSecretLength` or `HashLockMismatch`.
    pub fn validate(&self) -> Result<()> {
        if self.sender.is_empty() {
            return Err(HtlcError::InvalidAddress {
                reason: "sender missing".into(),
            });
        }
        if self.to.is_empty() {
            return Err(HtlcError::InvalidAddress {
                reason: "recipient missing".into(),
            });
        }
        if self.receiver_on_other_chain.len() > MAX_LENGTH_FOR_ADDRESS_ON_OTHER_CHAIN {
            return Err(HtlcError::InvalidAddress {
                reason: format!(
                    "receiver on other chain is {} bytes, max {MAX_LENGTH_FOR_ADDRESS_ON_OTHER_CHAIN}",
                    self.receiver_on_other_chain.len()
                ),
            });
        }

        self.amount.validate()?;

        // HashLock is fixed-size; a zero digest is never a real commitment.
        if self.hash_lock.0.iter().all(|b| *b == 0) {
            return Err(HtlcError::InvalidHashLock {
                reason: "hash lock must not be all zeros".into(),
            });
        }

        if self.time_lock == 0 {
            return Err(HtlcError::InvalidTimeLock {
                reason: "time lock must be positive".into(),
            });
        }
        if self.expiration_height < self.time_lock {
            return Err(HtlcError::InvalidTimeLock {
                reason: format!(
                    "expiration height {} is below time lock {}",
                    self.expiration_height, self.time_lock
                ),
            });
        }

        if !self.secret.is_empty() {
            self.secret.check_length()?;
            if !hashlock::verify(&self.secret, self.timestamp, &self.hash_lock) {
                return Err(HtlcError::HashLockMismatch(self.hash_lock));
            }
        }
        Ok(())
    }
}

/// Dummy HTLC for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Htlc {
    /// An `Open` HTLC locking `100stake` from `alice` to `bob` under the
    /// all-`fill` secret, created at `height` with a 50-block time lock.
    pub fn dummy(fill: u8, timestamp: u64, height: u64) -> Self {
        let secret = Secret::new(vec![fill; crate::constants::SECRET_LENGTH]);
        let terms = HtlcTerms {
            sender: AccountId::new("alice"),
            to: AccountId::new("bob"),
            receiver_on_other_chain: "0xcounterparty".into(),
            amount: Coins::single("stake", rust_decimal::Decimal::new(100, 0)),
            hash_lock: hashlock::derive(&secret, timestamp).expect("fixed-length secret"),
            timestamp,
            time_lock: 50,
        };
        Self::create(terms, height).expect("dummy terms are valid")
    }
}
