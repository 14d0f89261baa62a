//! Demo-grade password digests.
//!
//! **Not production grade.** Passwords are reduced to a bare SHA-256 digest:
//! no salt, no work factor, no rate limiting on attempts. Identical passwords
//! produce identical digests and the digest is cheap to brute force. This
//! exists only to keep plaintext demo passwords out of durable storage.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use yrush_core::PasswordDigest;

use super::AuthError;

/// Digest a password on the blocking pool.
///
/// The caller is suspended until the digest is ready. There is no timeout
/// and no retry.
pub async fn digest_password(password: &SecretString) -> Result<PasswordDigest, AuthError> {
    let owned = SecretString::from(password.expose_secret().to_owned());
    tokio::task::spawn_blocking(move || sha256_hex(owned.expose_secret()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password digest task failed");
            AuthError::PasswordHash
        })?
}

/// Lowercase hex SHA-256 of the UTF-8 password.
fn sha256_hex(password: &str) -> Result<PasswordDigest, AuthError> {
    let digest = Sha256::digest(password.as_bytes());
    PasswordDigest::from_hex(&hex::encode(digest)).map_err(|_| AuthError::PasswordHash)
}
