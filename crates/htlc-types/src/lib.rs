//! # htlc-types
//!
//! Shared types, errors, and configuration for the **HTLC engine**.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`HashLock`], [`Secret`]
//! - **Amounts**: [`Coin`], [`Coins`]
//! - **HTLC model**: [`Htlc`], [`HtlcState`], [`HtlcTerms`], [`Transition`]
//! - **Hash-lock codec**: [`hashlock::derive`], [`hashlock::verify`]
//! - **Messages**: [`MsgCreateHtlc`], [`CreateMode`], [`MsgClaimHtlc`], [`MsgRefundHtlc`]
//! - **Genesis**: [`GenesisState`], [`GenesisHtlc`], [`validate_genesis`]
//! - **Events**: [`HtlcEvent`]
//! - **Configuration**: [`EngineConfig`], [`RefundPolicy`]
//! - **Errors**: [`HtlcError`] with `HTLC_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod coin;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod genesis;
pub mod hashlock;
pub mod htlc;
pub mod ids;
pub mod msgs;

pub use coin::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use genesis::*;
pub use htlc::*;
pub use ids::*;
pub use msgs::*;

// Constants are accessed via `htlc_types::constants::FOO` and the codec via
// `htlc_types::hashlock::derive` (not re-exported to avoid name collisions).
