//! Key/value persistence for the storefront.
//!
//! Two storage scopes back the shop, mirroring browser storage:
//!
//! - **Durable** (`local_storage.json` by default) - cart, order list, user list
//! - **Session** (in-memory by default) - the signed-in identity
//!
//! Backends implement [`StorageBackend`], a string-in/string-out API. The
//! [`JsonStore`] wrapper layers JSON encoding on top and applies the shop's
//! failure policy: reads never fail (they report a [`ReadOutcome`] carrying
//! the caller's fallback), writes log a warning instead of propagating.
//!
//! There are no transactions. Two processes sharing one backing file race,
//! and the last write wins.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Fixed storage keys.
pub mod keys {
    /// Durable: `{ productId: quantity }`.
    pub const CART: &str = "yrush_cart";

    /// Durable: append-only list of placed orders.
    pub const ORDERS: &str = "yrush_orders";

    /// Durable: seeded account list.
    pub const USERS: &str = "yrush_users";

    /// Session: the signed-in identity (public fields only).
    pub const CURRENT_USER: &str = "currentUser";
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing would push the scope past its byte quota.
    #[error("quota exceeded writing {key}: needs {needed} bytes, quota is {quota}")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Total bytes the scope would hold after the write.
        needed: usize,
        /// Configured quota in bytes.
        quota: usize,
    },

    /// The backing medium cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backing file exists but is not a key/value map.
    #[error("storage file is corrupt: {0}")]
    Corrupt(String),

    /// A value could not be encoded as JSON.
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String-level storage API, shaped like the browser `Storage` interface.
pub trait StorageBackend: Send + Sync {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::QuotaExceeded` if the write does not fit, or
    /// another variant if the backing medium cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key in this scope.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Which storage scope a [`JsonStore`] fronts. Used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Survives restarts.
    Durable,
    /// Lives for one session.
    Session,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Durable => write!(f, "durable"),
            Self::Session => write!(f, "session"),
        }
    }
}

/// Why a read returned the caller's fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Nothing stored under the key.
    Missing,
    /// The stored value is JSON `null`.
    Null,
    /// The stored value does not decode as the requested type.
    Corrupt(String),
    /// The backend failed to read.
    Unavailable(String),
}

/// Result of [`JsonStore::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    /// A stored value decoded successfully.
    Stored(T),
    /// The caller's fallback, and why it was used.
    Fallback {
        /// The fallback passed to `read`.
        value: T,
        /// Why the stored value was not used.
        reason: FallbackReason,
    },
}

impl<T> ReadOutcome<T> {
    /// The decoded value or the fallback.
    pub fn into_value(self) -> T {
        match self {
            Self::Stored(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Borrow the decoded value or the fallback.
    pub const fn value(&self) -> &T {
        match self {
            Self::Stored(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// True if the fallback was used for any reason.
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// True if a value was stored but could not be decoded or read.
    pub const fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::Fallback {
                reason: FallbackReason::Corrupt(_) | FallbackReason::Unavailable(_),
                ..
            }
        )
    }
}

/// JSON view over a [`StorageBackend`].
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct JsonStore {
    backend: Arc<dyn StorageBackend>,
    scope: Scope,
}

impl fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonStore")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl JsonStore {
    /// Wrap a backend for the given scope.
    pub fn new(backend: impl StorageBackend + 'static, scope: Scope) -> Self {
        Self {
            backend: Arc::new(backend),
            scope,
        }
    }

    /// Wrap an already shared backend.
    #[must_use]
    pub fn from_shared(backend: Arc<dyn StorageBackend>, scope: Scope) -> Self {
        Self { backend, scope }
    }

    /// The scope this store fronts.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Read and decode the value under `key`, or hand back `fallback`.
    ///
    /// Never fails: missing keys, `null`, undecodable JSON and backend errors
    /// all produce [`ReadOutcome::Fallback`].
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> ReadOutcome<T> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(scope = %self.scope, key, "No stored value, using fallback");
                return ReadOutcome::Fallback {
                    value: fallback,
                    reason: FallbackReason::Missing,
                };
            }
            Err(e) => {
                tracing::warn!(scope = %self.scope, key, error = %e, "Storage read failed, using fallback");
                return ReadOutcome::Fallback {
                    value: fallback,
                    reason: FallbackReason::Unavailable(e.to_string()),
                };
            }
        };

        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(Some(value)) => ReadOutcome::Stored(value),
            Ok(None) => ReadOutcome::Fallback {
                value: fallback,
                reason: FallbackReason::Null,
            },
            Err(e) => {
                tracing::warn!(scope = %self.scope, key, error = %e, "Stored value is corrupt, using fallback");
                ReadOutcome::Fallback {
                    value: fallback,
                    reason: FallbackReason::Corrupt(e.to_string()),
                }
            }
        }
    }

    /// Encode and store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding fails or the backend rejects the write.
    pub fn try_write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set_item(key, &raw)
    }

    /// Encode and store `value` under `key`, logging any failure.
    ///
    /// Returns whether the value was persisted.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.try_write(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(scope = %self.scope, key, error = %e, "Storage write failed");
                false
            }
        }
    }

    /// Delete `key`, logging any failure.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            tracing::warn!(scope = %self.scope, key, error = %e, "Storage remove failed");
        }
    }

    /// Delete every key in this scope, logging any failure.
    pub fn clear(&self) {
        if let Err(e) = self.backend.clear() {
            tracing::warn!(scope = %self.scope, error = %e, "Storage clear failed");
        }
    }
}

/// Bytes a key/value map occupies for quota purposes.
fn footprint<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> usize {
    entries.map(|(k, v)| k.len() + v.len()).sum()
}

/// Check a prospective write against an optional quota.
fn check_quota(
    key: &str,
    current: usize,
    replaced: usize,
    incoming: usize,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let needed = current - replaced + incoming;
    if needed > quota {
        return Err(StorageError::QuotaExceeded {
            key: key.to_owned(),
            needed,
            quota,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn store() -> JsonStore {
        JsonStore::new(MemoryStorage::new(), Scope::Durable)
    }

    #[test]
    fn test_read_missing_uses_fallback() {
        let outcome = store().read::<Vec<u32>>("nothing", vec![7]);
        assert_eq!(
            outcome,
            ReadOutcome::Fallback {
                value: vec![7],
                reason: FallbackReason::Missing
            }
        );
        assert!(!outcome.is_corrupt());
    }

    #[test]
    fn test_write_then_read() {
        let store = store();
        let mut cart = BTreeMap::new();
        cart.insert("CD-001".to_string(), 2_u32);
        assert!(store.write(keys::CART, &cart));

        let outcome = store.read(keys::CART, BTreeMap::new());
        assert_eq!(outcome, ReadOutcome::Stored(cart));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let backend = MemoryStorage::new();
        backend.set_item("k", "null").unwrap();
        let store = JsonStore::new(backend, Scope::Durable);

        let outcome = store.read("k", 3_u32);
        assert_eq!(outcome.value(), &3);
        assert!(outcome.is_fallback());
        assert!(!outcome.is_corrupt());
    }

    #[test]
    fn test_corrupt_value_is_distinguishable_from_empty() {
        let backend = MemoryStorage::new();
        backend.set_item(keys::ORDERS, "{not json").unwrap();
        let store = JsonStore::new(backend, Scope::Durable);

        let outcome = store.read::<Vec<u32>>(keys::ORDERS, Vec::new());
        assert!(outcome.is_corrupt());
        assert!(matches!(
            outcome,
            ReadOutcome::Fallback {
                reason: FallbackReason::Corrupt(_),
                ..
            }
        ));
        assert!(outcome.into_value().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let store = store();
        store.write("k", "a string");
        let outcome = store.read::<Vec<u32>>("k", Vec::new());
        assert!(outcome.is_corrupt());
    }

    #[test]
    fn test_write_over_quota_is_swallowed() {
        let store = JsonStore::new(MemoryStorage::with_quota(16), Scope::Durable);
        assert!(store.write("k", &"short"));
        assert!(!store.write("k", &"x".repeat(64)));

        // The earlier value survives the failed write.
        assert_eq!(store.read("k", String::new()).into_value(), "short");
        assert!(matches!(
            store.try_write("k", &"x".repeat(64)),
            Err(StorageError::QuotaExceeded { quota: 16, .. })
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let store = store();
        store.write("a", &1);
        store.write("b", &2);
        store.remove("a");
        assert!(store.read("a", 0).is_fallback());
        store.clear();
        assert!(store.read("b", 0).is_fallback());
    }

    #[test]
    fn test_check_quota_accounts_for_replaced_value() {
        assert!(check_quota("k", 10, 4, 4, Some(10)).is_ok());
        assert!(check_quota("k", 10, 4, 5, Some(10)).is_err());
        assert!(check_quota("k", 10, 0, 1_000, None).is_ok());
    }
}
