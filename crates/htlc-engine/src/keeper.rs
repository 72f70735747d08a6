//! Command handlers for create, claim and refund.
//!
//! Each handler follows the same order:
//! 1. Stateless message checks (`validate_basic`)
//! 2. Registry lookup and the pure state transition on a copy
//! 3. The ledger movement
//! 4. Persist the new entity and record an [`HtlcEvent`]
//!
//! Step 4 only runs when step 3 succeeded, so a failed debit or credit
//! leaves both the registry and the ledger untouched and the caller may
//! retry.

use htlc_types::{
    EngineConfig, HashLock, Htlc, HtlcError, HtlcEvent, HtlcTerms, MsgClaimHtlc, MsgCreateHtlc,
    MsgRefundHtlc, RefundPolicy, Result, Transition,
};

use crate::clock::Clock;
use crate::custody::CustodyInvariant;
use crate::ledger::Ledger;
use crate::registry::HtlcRegistry;

/// Applies user intents against the registry and the ledger.
pub struct HtlcKeeper<L: Ledger> {
    registry: HtlcRegistry,
    ledger: L,
    config: EngineConfig,
    /// Committed events, drained by [`HtlcKeeper::take_events`].
    events: Vec<HtlcEvent>,
}

impl<L: Ledger> HtlcKeeper<L> {
    /// Create a keeper over `ledger`.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` is inconsistent.
    pub fn new(ledger: L, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: HtlcRegistry::new(),
            ledger,
            config,
            events: Vec::new(),
        })
    }

    /// Lock `msg.amount` from the sender under a hash lock and time lock.
    ///
    /// The secret of a `BySecret` message is only used to derive the hash
    /// lock; the stored HTLC keeps an empty secret until it is claimed.
    ///
    /// # Errors
    /// - validation errors from the message or the configured time-lock range
    /// - `InvalidAddress` if the sender or receiver is the custody account
    /// - `DuplicateHashLock` if the hash lock is taken
    /// - `InsufficientFunds` if the sender cannot cover the amount
    pub fn create(&mut self, clock: &impl Clock, msg: MsgCreateHtlc) -> Result<HashLock> {
        let height = clock.current_height();
        msg.validate_basic()?;
        self.config.check_time_lock(msg.time_lock)?;
        self.config
            .check_parties(&msg.sender, &msg.to)
            .inspect_err(|err| {
                tracing::warn!(sender = %msg.sender, to = %msg.to, error = %err, "Create rejected: custody account as a party");
            })?;

        let hash_lock = msg.mode.hash_lock()?;
        if self.registry.contains(&hash_lock) {
            tracing::warn!(hash_lock = %hash_lock, sender = %msg.sender, "Create rejected: duplicate hash lock");
            return Err(HtlcError::DuplicateHashLock(hash_lock));
        }

        let htlc = Htlc::create(
            HtlcTerms {
                sender: msg.sender,
                to: msg.to,
                receiver_on_other_chain: msg.receiver_on_other_chain,
                amount: msg.amount,
                hash_lock,
                timestamp: msg.mode.timestamp(),
                time_lock: msg.time_lock,
            },
            height,
        )?;

        // Debit first: if this fails, nothing has been stored.
        if let Err(err) =
            self.ledger
                .transfer(&htlc.sender, &self.config.custody_account, &htlc.amount)
        {
            tracing::warn!(hash_lock = %hash_lock, sender = %htlc.sender, error = %err, "Create aborted: escrow debit failed");
            return Err(err);
        }

        let event = HtlcEvent::Created {
            hash_lock,
            sender: htlc.sender.clone(),
            to: htlc.to.clone(),
            receiver_on_other_chain: htlc.receiver_on_other_chain.clone(),
            amount: htlc.amount.clone(),
            expiration_height: htlc.expiration_height,
        };
        tracing::info!(
            hash_lock = %hash_lock,
            sender = %htlc.sender,
            to = %htlc.to,
            amount = %htlc.amount,
            height,
            expiration_height = htlc.expiration_height,
            "HTLC created"
        );
        self.registry.put(htlc)?;
        self.events.push(event);
        Ok(hash_lock)
    }

    /// Claim an open HTLC with its secret, releasing funds to the receiver.
    ///
    /// Anyone holding the secret may submit the claim; funds always go to
    /// the recorded `to` account.
    ///
    /// # Errors
    /// - `InvalidSecretLength`, `HtlcNotFound`, `HtlcNotOpen`, `HtlcExpired`,
    ///   `HashLockMismatch`
    /// - a resource error if the credit fails (the HTLC stays `Open`)
    pub fn claim(&mut self, clock: &impl Clock, msg: MsgClaimHtlc) -> Result<()> {
        let height = clock.current_height();
        msg.validate_basic()?;

        let current = self.registry.get(&msg.hash_lock)?;
        let next = current
            .apply(&Transition::Claim(msg.secret.clone()), height)
            .inspect_err(|err| {
                tracing::warn!(hash_lock = %msg.hash_lock, claimer = %msg.sender, height, error = %err, "Claim rejected");
            })?;

        if let Err(err) = self
            .ledger
            .transfer(&self.config.custody_account, &next.to, &next.amount)
        {
            tracing::warn!(hash_lock = %msg.hash_lock, to = %next.to, error = %err, "Claim aborted: release credit failed");
            return Err(err);
        }

        let event = HtlcEvent::Claimed {
            hash_lock: msg.hash_lock,
            claimer: msg.sender,
            to: next.to.clone(),
            secret: msg.secret,
            amount: next.amount.clone(),
        };
        tracing::info!(hash_lock = %msg.hash_lock, to = %next.to, amount = %next.amount, height, "HTLC claimed");
        self.registry.update(next)?;
        self.events.push(event);
        Ok(())
    }

    /// Refund an expired HTLC to its recorded sender.
    ///
    /// # Errors
    /// - `HtlcNotFound`, `HtlcNotOpen`, `HtlcNotExpired`
    /// - `Unauthorized` if the refund policy restricts the caller
    /// - a resource error if the credit fails (the HTLC stays `Open`)
    pub fn refund(&mut self, clock: &impl Clock, msg: MsgRefundHtlc) -> Result<()> {
        let height = clock.current_height();
        msg.validate_basic()?;

        let current = self.registry.get(&msg.hash_lock)?;
        let next = current
            .apply(&Transition::Refund, height)
            .inspect_err(|err| {
                tracing::warn!(hash_lock = %msg.hash_lock, caller = %msg.sender, height, error = %err, "Refund rejected");
            })?;

        if self.config.refund_policy == RefundPolicy::SenderOnly && msg.sender != next.sender {
            tracing::warn!(hash_lock = %msg.hash_lock, caller = %msg.sender, sender = %next.sender, "Refund rejected: caller is not the sender");
            return Err(HtlcError::Unauthorized {
                reason: format!(
                    "only the sender {} may refund HTLC {}",
                    next.sender, msg.hash_lock
                ),
            });
        }

        if let Err(err) = self
            .ledger
            .transfer(&self.config.custody_account, &next.sender, &next.amount)
        {
            tracing::warn!(hash_lock = %msg.hash_lock, sender = %next.sender, error = %err, "Refund aborted: credit failed");
            return Err(err);
        }

        let event = HtlcEvent::Refunded {
            hash_lock: msg.hash_lock,
            caller: msg.sender,
            sender: next.sender.clone(),
            amount: next.amount.clone(),
        };
        tracing::info!(hash_lock = %msg.hash_lock, sender = %next.sender, amount = %next.amount, height, "HTLC refunded");
        self.registry.update(next)?;
        self.events.push(event);
        Ok(())
    }

    /// Check that custody holds exactly the funds of all open HTLCs.
    ///
    /// # Errors
    /// Returns `InvariantViolation` on any mismatch.
    pub fn verify_custody(&self) -> Result<()> {
        CustodyInvariant::verify(&self.registry, &self.ledger, &self.config.custody_account)
    }

    /// Drain the committed events.
    pub fn take_events(&mut self) -> Vec<HtlcEvent> {
        std::mem::take(&mut self.events)
    }

    /// Committed events not yet drained.
    #[must_use]
    pub fn events(&self) -> &[HtlcEvent] {
        &self.events
    }

    #[must_use]
    pub fn registry(&self) -> &HtlcRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut HtlcRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable ledger access for the surrounding node (deposits, blocks).
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
