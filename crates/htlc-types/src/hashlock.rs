//! Hash-lock derivation and verification.
//!
//! ```text
//! hash_lock = SHA256(secret || be_u64(timestamp))   if timestamp > 0
//! hash_lock = SHA256(secret)                         if timestamp == 0
//! ```
//!
//! The timestamp adds entropy so that reusing a secret across swaps still
//! produces distinct hash locks.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::constants::SECRET_LENGTH;
use crate::{HashLock, Result, Secret};

/// Derive the hash lock committing to `secret` at `timestamp`.
///
/// # Errors
/// Returns `InvalidSecretLength` unless the secret has exactly
/// `SECRET_LENGTH` bytes.
pub fn derive(secret: &Secret, timestamp: u64) -> Result<HashLock> {
    secret.check_length()?;
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    if timestamp > 0 {
        hasher.update(timestamp.to_be_bytes());
    }
    Ok(HashLock(hasher.finalize().into()))
}

/// Whether `secret` at `timestamp` hashes to `expected`.
///
/// A secret of the wrong length never verifies.
#[must_use]
pub fn verify(secret: &Secret, timestamp: u64, expected: &HashLock) -> bool {
    derive(secret, timestamp).is_ok_and(|actual| actual == *expected)
}

/// Generate a fresh `SECRET_LENGTH`-byte secret from the OS CSPRNG.
#[must_use]
pub fn generate_secret() -> Secret {
    let mut bytes = [0u8; SECRET_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    Secret::new(bytes.to_vec())
}
