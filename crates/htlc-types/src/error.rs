//! Error types for the HTLC engine.
//!
//! All errors use the `HTLC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by class:
//! - 1xx: Validation errors (malformed input, rejected before any mutation)
//! - 2xx: State errors (well-formed input rejected by the current entity state)
//! - 3xx: Resource errors (ledger debit/credit failures)
//! - 9xx: General / internal errors
//!
//! Validation and state errors are pure functions of the input and the
//! current entity state, so every replica reports the identical error.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, HashLock, HtlcState};

/// The class an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed or out-of-range input. Zero side effects.
    Validation,
    /// Input rejected by the current entity state.
    State,
    /// A ledger debit or credit failed. The whole operation was aborted.
    Resource,
    /// Configuration, I/O, serialization or invariant failures.
    Internal,
}

/// Central error enum for all HTLC operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtlcError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The hash lock is malformed or has the wrong length.
    #[error("HTLC_ERR_100: Invalid hash lock: {reason}")]
    InvalidHashLock { reason: String },

    /// The secret does not have exactly `SECRET_LENGTH` bytes.
    #[error("HTLC_ERR_101: Invalid secret length: expected {expected} bytes, got {actual}")]
    InvalidSecretLength { expected: usize, actual: usize },

    /// The amount is empty or contains a non-positive quantity.
    #[error("HTLC_ERR_102: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// The time lock is zero, out of the configured range, or overflows.
    #[error("HTLC_ERR_103: Invalid time lock: {reason}")]
    InvalidTimeLock { reason: String },

    /// An account identifier or counter-chain address is invalid.
    #[error("HTLC_ERR_104: Invalid address: {reason}")]
    InvalidAddress { reason: String },

    // =================================================================
    // State Errors (2xx)
    // =================================================================
    /// An HTLC with this hash lock already exists.
    #[error("HTLC_ERR_200: Hash lock already exists: {0}")]
    DuplicateHashLock(HashLock),

    /// No HTLC is stored under this hash lock.
    #[error("HTLC_ERR_201: HTLC not found: {0}")]
    HtlcNotFound(HashLock),

    /// The HTLC is not open (already completed, refunded or expired).
    #[error("HTLC_ERR_202: HTLC {hash_lock} is not open (state {state})")]
    HtlcNotOpen { hash_lock: HashLock, state: HtlcState },

    /// A claim arrived at or after the expiration height.
    #[error(
        "HTLC_ERR_203: HTLC {hash_lock} expired at height {expiration_height} (current {current_height})"
    )]
    HtlcExpired {
        hash_lock: HashLock,
        expiration_height: u64,
        current_height: u64,
    },

    /// A refund arrived before the expiration height.
    #[error(
        "HTLC_ERR_204: HTLC {hash_lock} not expired until height {expiration_height} (current {current_height})"
    )]
    HtlcNotExpired {
        hash_lock: HashLock,
        expiration_height: u64,
        current_height: u64,
    },

    /// The supplied secret does not hash to the stored hash lock.
    #[error("HTLC_ERR_205: Secret does not match hash lock {0}")]
    HashLockMismatch(HashLock),

    /// The caller is not allowed to perform this operation.
    #[error("HTLC_ERR_206: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // =================================================================
    // Resource Errors (3xx)
    // =================================================================
    /// The debited account does not hold enough of a denomination.
    #[error("HTLC_ERR_300: Insufficient funds in {account}: need {needed}{denom}, have {available}{denom}")]
    InsufficientFunds {
        account: AccountId,
        denom: String,
        needed: Decimal,
        available: Decimal,
    },

    /// The ledger refused the movement (e.g., a blocked recipient).
    #[error("HTLC_ERR_301: Transfer rejected: {reason}")]
    TransferRejected { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("HTLC_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Custody conservation invariant violated. Critical.
    #[error("HTLC_ERR_901: Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    /// Serialization / deserialization error.
    #[error("HTLC_ERR_902: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, bad limits, etc.).
    #[error("HTLC_ERR_903: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("HTLC_ERR_904: I/O error: {0}")]
    Io(String),
}

impl HtlcError {
    /// The class this error belongs to.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidHashLock { .. }
            | Self::InvalidSecretLength { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidTimeLock { .. }
            | Self::InvalidAddress { .. } => ErrorClass::Validation,
            Self::DuplicateHashLock(_)
            | Self::HtlcNotFound(_)
            | Self::HtlcNotOpen { .. }
            | Self::HtlcExpired { .. }
            | Self::HtlcNotExpired { .. }
            | Self::HashLockMismatch(_)
            | Self::Unauthorized { .. } => ErrorClass::State,
            Self::InsufficientFunds { .. } | Self::TransferRejected { .. } => {
                ErrorClass::Resource
            }
            Self::Internal(_)
            | Self::InvariantViolation { .. }
            | Self::Serialization(_)
            | Self::Configuration(_)
            | Self::Io(_) => ErrorClass::Internal,
        }
    }

    /// Stable error code name surfaced at the boundary.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidHashLock { .. } => "InvalidHashLock",
            Self::InvalidSecretLength { .. } => "InvalidSecretLength",
            Self::InvalidAmount { .. } => "InvalidAmount",
            Self::InvalidTimeLock { .. } => "InvalidTimeLock",
            Self::InvalidAddress { .. } => "InvalidAddress",
            Self::DuplicateHashLock(_) => "DuplicateHashLock",
            Self::HtlcNotFound(_) => "HTLCNotFound",
            Self::HtlcNotOpen { .. } => "HTLCNotOpen",
            Self::HtlcExpired { .. } => "HTLCExpired",
            Self::HtlcNotExpired { .. } => "HTLCNotExpired",
            Self::HashLockMismatch(_) => "HashLockMismatch",
            Self::Unauthorized { .. } => "Unauthorized",
            Self::InsufficientFunds { .. } => "InsufficientFunds",
            Self::TransferRejected { .. } => "TransferRejected",
            Self::Internal(_) => "Internal",
            Self::InvariantViolation { .. } => "InvariantViolation",
            Self::Serialization(_) => "Serialization",
            Self::Configuration(_) => "Configuration",
            Self::Io(_) => "Io",
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, HtlcError>;

impl From<std::io::Error> for HtlcError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HtlcError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
