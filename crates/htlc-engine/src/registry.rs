//! HTLC registry: keyed store of all HTLCs ever created.
//!
//! Entries are kept in a `BTreeMap` keyed by hash lock, so iteration is
//! always in canonical (byte / lowercase-hex) key order. Nothing is ever
//! removed: terminal HTLCs stay as the audit trail.

use std::collections::BTreeMap;

use htlc_types::{HashLock, Htlc, HtlcError, HtlcState, Result};

/// Keyed store of HTLC entities.
#[derive(Debug, Default)]
pub struct HtlcRegistry {
    /// All HTLCs indexed by their hash lock.
    htlcs: BTreeMap<HashLock, Htlc>,
}

impl HtlcRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new HTLC.
    ///
    /// # Errors
    /// Returns `DuplicateHashLock` if the key already exists.
    pub fn put(&mut self, htlc: Htlc) -> Result<()> {
        if self.htlcs.contains_key(&htlc.hash_lock) {
            return Err(HtlcError::DuplicateHashLock(htlc.hash_lock));
        }
        tracing::debug!(hash_lock = %htlc.hash_lock, "HTLC stored");
        self.htlcs.insert(htlc.hash_lock, htlc);
        Ok(())
    }

    /// Replace an existing HTLC with its next state.
    ///
    /// # Errors
    /// Returns `HtlcNotFound` if no HTLC is stored under the key.
    pub(crate) fn update(&mut self, htlc: Htlc) -> Result<()> {
        let slot = self
            .htlcs
            .get_mut(&htlc.hash_lock)
            .ok_or(HtlcError::HtlcNotFound(htlc.hash_lock))?;
        tracing::debug!(hash_lock = %htlc.hash_lock, from = %slot.state, to = %htlc.state, "HTLC updated");
        *slot = htlc;
        Ok(())
    }

    /// Look up an HTLC by hash lock.
    ///
    /// # Errors
    /// Returns `HtlcNotFound` if absent.
    pub fn get(&self, hash_lock: &HashLock) -> Result<&Htlc> {
        self.htlcs
            .get(hash_lock)
            .ok_or(HtlcError::HtlcNotFound(*hash_lock))
    }

    #[must_use]
    pub fn contains(&self, hash_lock: &HashLock) -> bool {
        self.htlcs.contains_key(hash_lock)
    }

    /// All entries in canonical key order. Call again to restart.
    pub fn iter(&self) -> impl Iterator<Item = (&HashLock, &Htlc)> + '_ {
        self.htlcs.iter()
    }

    /// Entries whose stored state is `Open`, in canonical key order.
    pub fn iter_open(&self) -> impl Iterator<Item = &Htlc> + '_ {
        self.htlcs
            .values()
            .filter(|htlc| htlc.state == HtlcState::Open)
    }

    /// Number of HTLCs tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.htlcs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.htlcs.is_empty()
    }

    /// Number of HTLCs with stored state `Open`.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.iter_open().count()
    }
}
