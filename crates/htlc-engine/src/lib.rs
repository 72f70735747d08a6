//! # htlc-engine
//!
//! **Custody plane**: hash time-locked escrow on top of a host ledger.
//!
//! ## Architecture
//!
//! The [`HtlcKeeper`] receives user messages and:
//! 1. Runs stateless checks (`validate_basic`, time-lock range)
//! 2. Applies the pure state transition from `htlc-types` to a copy
//! 3. Moves funds through the [`Ledger`] collaborator
//! 4. Persists the new entity in the [`HtlcRegistry`] and records an event
//!
//! Expiry is lazy and derived from the [`Clock`]; the [`query`] layer
//! presents it to readers. [`CustodyInvariant`] checks that the custody
//! account holds exactly the funds of all open HTLCs.

pub mod clock;
pub mod custody;
pub mod genesis;
pub mod keeper;
pub mod ledger;
pub mod query;
pub mod registry;

pub use clock::{BlockHeight, Clock};
pub use custody::CustodyInvariant;
pub use genesis::{export_genesis, init_genesis};
pub use keeper::HtlcKeeper;
pub use ledger::{InMemoryLedger, Ledger};
pub use query::{HtlcView, query_by_state, query_htlc};
pub use registry::HtlcRegistry;
