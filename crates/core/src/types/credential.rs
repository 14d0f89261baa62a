//! Stored password digest.
//!
//! A [`PasswordDigest`] is the lowercase hex encoding of a 32-byte digest.
//! This crate only validates and compares digests; producing one is the
//! storefront's job.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PasswordDigest`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// Wrong number of hex characters.
    #[error("digest must be {expected} hex characters (got {actual})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length received.
        actual: usize,
    },
    /// Contains a character outside `0-9a-f`.
    #[error("digest must be lowercase hex")]
    NotHex,
}

/// Hex-encoded password digest as persisted in the user list.
///
/// `Debug` is redacted so digests never end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Length of the hex encoding (32 bytes).
    pub const HEX_LENGTH: usize = 64;

    /// Parse a digest from its hex form.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is exactly 64 lowercase hex characters.
    pub fn from_hex(hex: &str) -> Result<Self, DigestError> {
        if hex.len() != Self::HEX_LENGTH {
            return Err(DigestError::WrongLength {
                expected: Self::HEX_LENGTH,
                actual: hex.len(),
            });
        }
        if !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(DigestError::NotHex);
        }
        Ok(Self(hex.to_owned()))
    }

    /// The hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against another digest without short-circuiting on the first
    /// differing byte.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0
            .bytes()
            .zip(other.0.bytes())
            .fold(self.0.len() ^ other.0.len(), |acc, (a, b)| {
                acc | usize::from(a ^ b)
            })
            == 0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

impl TryFrom<String> for PasswordDigest {
    type Error = DigestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<PasswordDigest> for String {
    fn from(digest: PasswordDigest) -> Self {
        digest.0
    }
}
