//! Genesis lifecycle: load a snapshot into a keeper and export one back.

use std::collections::BTreeMap;

use htlc_types::{GenesisHtlc, GenesisState, Result, validate_genesis};

use crate::custody::CustodyInvariant;
use crate::keeper::HtlcKeeper;
use crate::ledger::Ledger;
use crate::registry::HtlcRegistry;

/// Validate `state` and load every pending HTLC into the keeper's registry.
///
/// No funds move: the custody balance is part of the ledger's own
/// snapshot, so it must already hold the locked amounts. The load is
/// all-or-nothing.
///
/// # Errors
/// - the first error reported by [`validate_genesis`]
/// - `InvalidAddress` if an entry names the custody account as a party
/// - `DuplicateHashLock` if an entry is already registered
/// - `InvariantViolation` if custody does not match the loaded HTLCs
pub fn init_genesis<L: Ledger>(keeper: &mut HtlcKeeper<L>, state: &GenesisState) -> Result<()> {
    validate_genesis(state)?;

    // Stage on a copy; the keeper only sees the result if every check passes.
    let mut staged = HtlcRegistry::new();
    for (_, htlc) in keeper.registry().iter() {
        staged.put(htlc.clone())?;
    }
    let mut loaded = 0usize;
    for htlc in state.htlcs()? {
        keeper.config().check_parties(&htlc.sender, &htlc.to)?;
        staged.put(htlc)?;
        loaded += 1;
    }
    CustodyInvariant::verify(&staged, keeper.ledger(), &keeper.config().custody_account)?;

    *keeper.registry_mut() = staged;
    tracing::info!(pending = loaded, "Genesis loaded");
    Ok(())
}

/// Snapshot every HTLC whose stored state is `Open`, keyed by hex hash lock.
///
/// HTLCs past their expiration are included: their funds are still in
/// custody until someone refunds them.
#[must_use]
pub fn export_genesis<L: Ledger>(keeper: &HtlcKeeper<L>) -> GenesisState {
    let pending_htlcs: BTreeMap<String, GenesisHtlc> = keeper
        .registry()
        .iter_open()
        .map(|htlc| (htlc.hash_lock.to_hex(), GenesisHtlc::from(htlc)))
        .collect();
    tracing::info!(pending = pending_htlcs.len(), "Genesis exported");
    GenesisState::new(pending_htlcs)
}
