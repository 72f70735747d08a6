//! Identifiers and byte-string values used throughout the engine.
//!
//! `HashLock` is the primary key of every HTLC. Externally it is always the
//! lowercase hex encoding of its `HASH_LOCK_LENGTH` bytes, and its `Ord`
//! (byte order) agrees with lexical order of that hex string.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{HASH_LOCK_LENGTH, SECRET_LENGTH};
use crate::{HtlcError, Result};

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A ledger account identifier (e.g., a bech32 address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// HashLock
// ---------------------------------------------------------------------------

/// Fixed-length digest committing to a secret. Primary key of an HTLC.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct HashLock(pub [u8; HASH_LOCK_LENGTH]);

impl HashLock {
    /// Build a hash lock from raw bytes.
    ///
    /// # Errors
    /// Returns `InvalidHashLock` unless `bytes.len() == HASH_LOCK_LENGTH`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; HASH_LOCK_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| HtlcError::InvalidHashLock {
                    reason: format!(
                        "length of the hash lock must be {HASH_LOCK_LENGTH} bytes, got {}",
                        bytes.len()
                    ),
                })?;
        Ok(Self(arr))
    }

    /// Parse a hex-encoded hash lock.
    ///
    /// # Errors
    /// Returns `InvalidHashLock` if the string is not hex or decodes to the
    /// wrong length.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| HtlcError::InvalidHashLock {
            reason: format!("{s:?} is not valid hex: {e}"),
        })?;
        Self::from_slice(&bytes)
    }

    /// Lowercase hex encoding (the external representation).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; HASH_LOCK_LENGTH] {
        &self.0
    }
}

impl fmt::Display for HashLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for HashLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashLock({})", self.to_hex())
    }
}

impl Serialize for HashLock {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HashLock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// Hash-lock preimage. Empty until revealed by a successful claim.
///
/// `Debug` never prints the bytes: an unrevealed secret must not leak
/// through log lines.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Secret(Vec<u8>);

impl Secret {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The unrevealed (empty) secret.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Parse a hex-encoded secret. The empty string yields the empty secret.
    ///
    /// # Errors
    /// Returns `InvalidSecretLength` if the string is not valid hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        hex::decode(s)
            .map(Self)
            .map_err(|_| HtlcError::InvalidSecretLength {
                expected: SECRET_LENGTH,
                actual: s.len() / 2,
            })
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ensure the secret has exactly `SECRET_LENGTH` bytes.
    ///
    /// # Errors
    /// Returns `InvalidSecretLength` otherwise.
    pub fn check_length(&self) -> Result<()> {
        if self.0.len() == SECRET_LENGTH {
            Ok(())
        } else {
            Err(HtlcError::InvalidSecretLength {
                expected: SECRET_LENGTH,
                actual: self.0.len(),
            })
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({} bytes)", self.0.len())
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_lock_hex_roundtrip() {
        let lock = HashLock([7u8; 32]);
        let hex = lock.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(HashLock::from_hex(&hex).unwrap(), lock);
    }

    #[test]
    fn hash_lock_rejects_wrong_length() {
        let err = HashLock::from_hex("abcd").unwrap_err();
        assert!(matches!(err, HtlcError::InvalidHashLock { .. }));
        let err = HashLock::from_slice(&[0u8; 33]).unwrap_err();
        assert!(matches!(err, HtlcError::InvalidHashLock { .. }));
    }

    #[test]
    fn hash_lock_rejects_non_hex() {
        let err = HashLock::from_hex(&"zz".repeat(32)).unwrap_err();
        assert!(matches!(err, HtlcError::InvalidHashLock { .. }));
    }

    #[test]
    fn hash_lock_order_matches_hex_order() {
        let mut locks = vec![
            HashLock([0xff; 32]),
            HashLock([0x0a; 32]),
            HashLock([0xa0; 32]),
        ];
        let mut hexes: Vec<String> = locks.iter().map(HashLock::to_hex).collect();
        locks.sort();
        hexes.sort();
        let sorted: Vec<String> = locks.iter().map(HashLock::to_hex).collect();
        assert_eq!(sorted, hexes);
    }

    #[test]
    fn hash_lock_serializes_as_hex_string() {
        let lock = HashLock([1u8; 32]);
        let json = serde_json::to_string(&lock).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: HashLock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lock);
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = Secret::new(vec![0x42; 32]);
        let dbg = format!("{secret:?}");
        assert_eq!(dbg, "Secret(32 bytes)");
        assert!(!dbg.contains("42"));
    }

    #[test]
    fn empty_secret_serializes_as_empty_string() {
        let json = serde_json::to_string(&Secret::empty()).unwrap();
        assert_eq!(json, "\"\"");
        let back: Secret = serde_json::from_str(&json).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn secret_length_check() {
        assert!(Secret::new(vec![0u8; 32]).check_length().is_ok());
        let err = Secret::new(vec![0u8; 31]).check_length().unwrap_err();
        assert_eq!(
            err,
            HtlcError::InvalidSecretLength {
                expected: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn account_id_empty() {
        assert!(AccountId::new("  ").is_empty());
        assert!(!AccountId::new("alice").is_empty());
    }
}
