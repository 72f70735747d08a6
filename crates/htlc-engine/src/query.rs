//! Read-only queries with derived expiry.
//!
//! The registry never sweeps expired HTLCs. Queries report an `Open` HTLC
//! past its deadline as `Expired` without touching stored state.

use htlc_types::{HashLock, Htlc, HtlcState, Result};
use serde::Serialize;

/// An HTLC as seen by a query consumer at a given height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtlcView {
    #[serde(flatten)]
    pub htlc: Htlc,
    /// State derived at `height`; may be `Expired` while the stored state is `Open`.
    pub effective_state: HtlcState,
    pub height: u64,
}

impl HtlcView {
    fn at(htlc: &Htlc, height: u64) -> Self {
        Self {
            htlc: htlc.clone(),
            effective_state: htlc.effective_state(height),
            height,
        }
    }
}

/// Look up one HTLC.
///
/// # Errors
/// Returns `HtlcNotFound` if absent.
pub fn query_htlc(
    registry: &crate::HtlcRegistry,
    hash_lock: &HashLock,
    height: u64,
) -> Result<HtlcView> {
    registry.get(hash_lock).map(|htlc| HtlcView::at(htlc, height))
}

/// All HTLCs whose effective state at `height` is `state`, in key order.
#[must_use]
pub fn query_by_state(
    registry: &crate::HtlcRegistry,
    state: HtlcState,
    height: u64,
) -> Vec<HtlcView> {
    registry
        .iter()
        .map(|(_, htlc)| HtlcView::at(htlc, height))
        .filter(|view| view.effective_state == state)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtlcRegistry;
    use htlc_types::{HtlcError, Secret, Transition};

    fn registry() -> HtlcRegistry {
        let mut registry = HtlcRegistry::new();
        // Created at height 10, expires at 60.
        registry.put(Htlc::dummy(1, 1000, 10)).unwrap();
        // Created at height 30, expires at 80.
        registry.put(Htlc::dummy(2, 1000, 30)).unwrap();
        registry
    }

    #[test]
    fn open_before_expiration() {
        let registry = registry();
        let lock = Htlc::dummy(1, 1000, 10).hash_lock;
        let view = query_htlc(&registry, &lock, 59).unwrap();
        assert_eq!(view.effective_state, HtlcState::Open);
    }

    #[test]
    fn expired_at_expiration_without_mutation() {
        let registry = registry();
        let lock = Htlc::dummy(1, 1000, 10).hash_lock;
        let view = query_htlc(&registry, &lock, 60).unwrap();
        assert_eq!(view.effective_state, HtlcState::Expired);
        assert_eq!(view.htlc.state, HtlcState::Open);
        assert_eq!(registry.get(&lock).unwrap().state, HtlcState::Open);
    }

    #[test]
    fn by_state_splits_open_and_expired() {
        let registry = registry();
        assert_eq!(query_by_state(&registry, HtlcState::Open, 70).len(), 1);
        assert_eq!(query_by_state(&registry, HtlcState::Expired, 70).len(), 1);
        assert_eq!(query_by_state(&registry, HtlcState::Expired, 90).len(), 2);
        assert!(query_by_state(&registry, HtlcState::Completed, 90).is_empty());
    }

    #[test]
    fn terminal_state_is_reported_as_stored() {
        let mut registry = HtlcRegistry::new();
        let htlc = Htlc::dummy(3, 7, 10);
        let done = htlc
            .apply(&Transition::Claim(Secret::new(vec![3u8; 32])), 20)
            .unwrap();
        registry.put(done).unwrap();
        let view = query_htlc(&registry, &htlc.hash_lock, 500).unwrap();
        assert_eq!(view.effective_state, HtlcState::Completed);
    }

    #[test]
    fn missing_not_found() {
        let lock = HashLock([7u8; 32]);
        assert_eq!(
            query_htlc(&HtlcRegistry::new(), &lock, 1).unwrap_err(),
            HtlcError::HtlcNotFound(lock)
        );
    }

    #[test]
    fn view_serializes_flat() {
        let registry = registry();
        let lock = Htlc::dummy(1, 1000, 10).hash_lock;
        let json = serde_json::to_value(query_htlc(&registry, &lock, 60).unwrap()).unwrap();
        assert_eq!(json["effective_state"], "expired");
        assert_eq!(json["state"], "open");
        assert_eq!(json["hash_lock"], lock.to_hex());
    }
}
