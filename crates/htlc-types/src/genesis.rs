//! Genesis snapshot types and the startup consistency check.
//!
//! A snapshot carries only pending (open) HTLCs, keyed by the lowercase hex
//! encoding of their hash lock. Keys are held in a `BTreeMap`, so validation
//! and export always walk entries in lexical key order and every node hits
//! the same first error on a malformed snapshot.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    AccountId, Coins, HashLock, Htlc, HtlcError, HtlcState, Result, Secret, constants,
};

/// One pending HTLC as it appears in a snapshot. The hash lock is the map key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenesisHtlc {
    pub sender: AccountId,
    pub to: AccountId,
    #[serde(default)]
    pub receiver_on_other_chain: String,
    pub amount: Coins,
    #[serde(default)]
    pub secret: Secret,
    pub timestamp: u64,
    pub time_lock: u64,
    pub expiration_height: u64,
    pub state: HtlcState,
}

impl GenesisHtlc {
    /// Attach the hash lock taken from the snapshot key.
    #[must_use]
    pub fn into_htlc(self, hash_lock: HashLock) -> Htlc {
        Htlc {
            sender: self.sender,
            to: self.to,
            receiver_on_other_chain: self.receiver_on_other_chain,
            amount: self.amount,
            hash_lock,
            secret: self.secret,
            timestamp: self.timestamp,
            time_lock: self.time_lock,
            expiration_height: self.expiration_height,
            state: self.state,
        }
    }
}

impl From<&Htlc> for GenesisHtlc {
    fn from(htlc: &Htlc) -> Self {
        Self {
            sender: htlc.sender.clone(),
            to: htlc.to.clone(),
            receiver_on_other_chain: htlc.receiver_on_other_chain.clone(),
            amount: htlc.amount.clone(),
            secret: htlc.secret.clone(),
            timestamp: htlc.timestamp,
            time_lock: htlc.time_lock,
            expiration_height: htlc.expiration_height,
            state: htlc.state,
        }
    }
}

/// All HTLC state that must be provided at genesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenesisState {
    /// Claimable HTLCs keyed by hex hash lock.
    pub pending_htlcs: BTreeMap<String, GenesisHtlc>,
}

impl GenesisState {
    #[must_use]
    pub fn new(pending_htlcs: BTreeMap<String, GenesisHtlc>) -> Self {
        Self { pending_htlcs }
    }

    /// The empty snapshot a fresh chain starts from.
    #[must_use]
    pub fn default_genesis() -> Self {
        Self::default()
    }

    /// Parse a snapshot from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validated entries in canonical key order.
    ///
    /// # Errors
    /// The first error [`validate_genesis`] would report.
    pub fn htlcs(&self) -> Result<Vec<Htlc>> {
        self.pending_htlcs
            .iter()
            .map(|(key, entry)| validate_entry(key, entry))
            .collect()
    }
}

/// Validate a genesis snapshot. Fail-fast: the first violation in
/// lexical key order aborts the whole load.
///
/// For each entry:
/// 1. the key must be the lowercase hex of a `HASH_LOCK_LENGTH`-byte lock,
///    with no padding (`InvalidHashLock`)
/// 2. the entry must be `Open` (`HtlcNotOpen`)
/// 3. the entity must pass [`Htlc::validate`]
pub fn validate_genesis(state: &GenesisState) -> Result<()> {
    for (key, entry) in &state.pending_htlcs {
        validate_entry(key, entry)?;
    }
    Ok(())
}

/// Decode a snapshot key, accepting only the form export writes.
///
/// Two spellings of one hash lock would otherwise sort apart and slip past
/// the duplicate check.
fn parse_key(key: &str) -> Result<HashLock> {
    let canonical = key.len() == 2 * constants::HASH_LOCK_LENGTH
        && key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    if !canonical {
        return Err(HtlcError::InvalidHashLock {
            reason: format!(
                "genesis key {key:?} is not {} lowercase hex chars",
                2 * constants::HASH_LOCK_LENGTH
            ),
        });
    }
    HashLock::from_hex(key)
}

fn validate_entry(key: &str, entry: &GenesisHtlc) -> Result<Htlc> {
    let hash_lock = parse_key(key)?;
    if entry.state != HtlcState::Open {
        return Err(HtlcError::HtlcNotOpen {
            hash_lock,
            state: entry.state,
        });
    }
    let htlc = entry.clone().into_htlc(hash_lock);
    htlc.validate()?;
    Ok(htlc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transition;

    fn entry_for(htlc: &Htlc) -> (String, GenesisHtlc) {
        (htlc.hash_lock.to_hex(), GenesisHtlc::from(htlc))
    }

    fn state_with(htlcs: &[Htlc]) -> GenesisState {
        GenesisState::new(htlcs.iter().map(entry_for).collect())
    }

    #[test]
    fn default_genesis_is_valid() {
        assert!(validate_genesis(&GenesisState::default_genesis()).is_ok());
    }

    #[test]
    fn open_htlcs_are_valid() {
        let state = state_with(&[Htlc::dummy(1, 10, 5), Htlc::dummy(2, 20, 5)]);
        assert!(validate_genesis(&state).is_ok());
        assert_eq!(state.htlcs().unwrap().len(), 2);
    }

    #[test]
    fn short_key_rejected() {
        let htlc = Htlc::dummy(1, 10, 5);
        let mut state = GenesisState::default();
        state
            .pending_htlcs
            .insert("ab".repeat(31), GenesisHtlc::from(&htlc));
        let err = validate_genesis(&state).unwrap_err();
        assert!(matches!(err, HtlcError::InvalidHashLock { .. }));
    }

    #[test]
    fn malformed_key_rejected() {
        let htlc = Htlc::dummy(1, 10, 5);
        let mut state = GenesisState::default();
        state
            .pending_htlcs
            .insert("not-hex".into(), GenesisHtlc::from(&htlc));
        assert!(matches!(
            validate_genesis(&state).unwrap_err(),
            HtlcError::InvalidHashLock { .. }
        ));
    }

    #[test]
    fn non_canonical_key_rejected() {
        let htlc = Htlc::dummy(1, 10, 5);
        let key = htlc.hash_lock.to_hex();
        for variant in [key.to_uppercase(), format!(" {} ", key.to_uppercase())] {
            let mut state = GenesisState::default();
            state
                .pending_htlcs
                .insert(variant.clone(), GenesisHtlc::from(&htlc));
            assert!(
                matches!(
                    validate_genesis(&state).unwrap_err(),
                    HtlcError::InvalidHashLock { .. }
                ),
                "{variant:?} accepted"
            );
        }
    }

    #[test]
    fn same_lock_spelled_twice_rejected() {
        let htlc = Htlc::dummy(1, 10, 5);
        let mut state = state_with(std::slice::from_ref(&htlc));
        state
            .pending_htlcs
            .insert(htlc.hash_lock.to_hex().to_uppercase(), GenesisHtlc::from(&htlc));
        assert!(validate_genesis(&state).is_err());
        assert!(state.htlcs().is_err());
    }

    #[test]
    fn non_open_entry_rejected() {
        let completed = Htlc::dummy(1, 10, 5)
            .apply(&Transition::Claim(Secret::new(vec![1u8; 32])), 6)
            .unwrap();
        let err = validate_genesis(&state_with(&[completed])).unwrap_err();
        assert!(matches!(
            err,
            HtlcError::HtlcNotOpen {
                state: HtlcState::Completed,
                ..
            }
        ));

        let mut expired = Htlc::dummy(2, 10, 5);
        expired.state = HtlcState::Expired;
        assert!(matches!(
            validate_genesis(&state_with(&[expired])).unwrap_err(),
            HtlcError::HtlcNotOpen { .. }
        ));
    }

    #[test]
    fn invalid_entity_rejected() {
        let mut htlc = Htlc::dummy(1, 10, 5);
        htlc.amount = Coins::default();
        assert!(matches!(
            validate_genesis(&state_with(&[htlc])).unwrap_err(),
            HtlcError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn first_error_in_key_order_wins() {
        let htlc = Htlc::dummy(1, 10, 5);
        let mut state = GenesisState::default();
        // "00" sorts before "ff..", so the length error is reported first.
        let mut bad_state = GenesisHtlc::from(&htlc);
        bad_state.state = HtlcState::Refunded;
        state.pending_htlcs.insert("ff".repeat(32), bad_state);
        state
            .pending_htlcs
            .insert("00".into(), GenesisHtlc::from(&htlc));
        assert!(matches!(
            validate_genesis(&state).unwrap_err(),
            HtlcError::InvalidHashLock { .. }
        ));
    }

    #[test]
    fn json_roundtrip_and_shape() {
        let state = state_with(&[Htlc::dummy(3, 1000, 10)]);
        let json = state.to_json().unwrap();
        assert!(json.contains("pending_htlcs"));
        assert!(json.contains("\"secret\": \"\""));
        let back = GenesisState::from_json_str(&json).unwrap();
        assert_eq!(state, back);
    }

    #[test]
    fn bad_json_is_serialization_error() {
        let err = GenesisState::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, HtlcError::Serialization(_)));
    }
}
