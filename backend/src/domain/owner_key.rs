//! Owner keys: the private credential exchanged for access tokens.
//!
//! A key is 32 random bytes, hex-encoded, handed to the owner once at signup.
//! Tenants only keep its SHA-256 digest.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const KEY_BYTES: usize = 32;
const DIGEST_HEX_LEN: usize = 64;

/// Plain owner key. Only exists in the signup response.
#[derive(Clone, PartialEq, Eq)]
pub struct OwnerKey(String);

impl OwnerKey {
    /// Draw a fresh key from the thread RNG.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    #[cfg(test)]
    pub(crate) fn from_fixture(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digest(&self) -> OwnerKeyDigest {
        OwnerKeyDigest::of(&self.0)
    }
}

impl fmt::Debug for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OwnerKey(..)")
    }
}

/// Stored digest was not 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("owner key digest must be 64 hex characters")]
pub struct OwnerKeyDigestError;

/// SHA-256 digest of an owner key, lowercase hex.
///
/// # Examples
/// ```
/// use lejio::domain::OwnerKey;
///
/// let key = OwnerKey::generate();
/// let digest = key.digest();
/// assert!(digest.matches(key.as_str()));
/// assert!(!digest.matches("guess"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerKeyDigest(String);

impl OwnerKeyDigest {
    fn of(raw: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(raw.trim().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Rebuild a digest loaded from storage.
    pub fn from_stored(value: impl Into<String>) -> Result<Self, OwnerKeyDigestError> {
        let value = value.into();
        let well_formed = value.len() == DIGEST_HEX_LEN
            && value
                .bytes()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
        if !well_formed {
            return Err(OwnerKeyDigestError);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `presented` hashes to this digest. Compares in constant time.
    pub fn matches(&self, presented: &str) -> bool {
        let candidate = Self::of(presented);
        self.0
            .bytes()
            .zip(candidate.0.bytes())
            .fold(0_u8, |diff, (left, right)| diff | (left ^ right))
            == 0
    }
}

impl TryFrom<String> for OwnerKeyDigest {
    type Error = OwnerKeyDigestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_stored(value)
    }
}

impl From<OwnerKeyDigest> for String {
    fn from(value: OwnerKeyDigest) -> Self {
        value.0
    }
}
