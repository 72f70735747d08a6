//! System-wide constants for the HTLC engine.

/// Length of a hash-lock preimage (the secret), in bytes.
pub const SECRET_LENGTH: usize = 32;

/// Length of a hash lock (SHA-256 digest), in bytes.
pub const HASH_LOCK_LENGTH: usize = 32;

/// Maximum length of the counter-chain receiver tag.
pub const MAX_LENGTH_FOR_ADDRESS_ON_OTHER_CHAIN: usize = 128;

/// Default minimum time lock, in blocks.
pub const MIN_TIME_LOCK: u64 = 50;

/// Default maximum time lock, in blocks (roughly 48h at 6.8s blocks).
pub const MAX_TIME_LOCK: u64 = 25_480;

/// Default custody account holding all escrowed funds.
pub const DEFAULT_CUSTODY_ACCOUNT: &str = "htlc_custody";
