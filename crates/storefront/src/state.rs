//! Storefront handle shared by every consumer.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::{StorageKind, StorefrontConfig};
use crate::error::AppError;
use crate::services::{AuthService, CartService, OrderLedger};
use crate::storage::{FileStorage, JsonStore, MemoryStorage, Scope, StorageBackend};

/// One shop: its configuration, catalog and the two storage scopes.
///
/// Built once per process and handed to consumers. Cheaply cloneable via
/// `Arc`; services are borrowed views created on demand.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    catalog: Catalog,
    durable: JsonStore,
    session: JsonStore,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("products", &self.inner.catalog.len())
            .field("durable", &self.inner.durable)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Build a storefront from configuration.
    ///
    /// The durable scope follows `config.storage`; the session scope is an
    /// in-process map, gone when the process exits.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if a configured catalog override cannot
    /// be loaded.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, AppError> {
        let durable = durable_store(&config);
        let session = JsonStore::new(memory_backend(config.quota_bytes), Scope::Session);
        Self::with_stores(config, durable, session)
    }

    /// Build a storefront whose session also lives on disk.
    ///
    /// For front ends where each action is a separate process, so the
    /// signed-in identity has to outlive one of them.
    ///
    /// # Errors
    ///
    /// As [`Storefront::from_config`].
    pub fn with_file_session(config: StorefrontConfig) -> Result<Self, AppError> {
        let durable = durable_store(&config);
        let session = JsonStore::new(
            file_backend(config.session_path(), config.quota_bytes),
            Scope::Session,
        );
        Self::with_stores(config, durable, session)
    }

    /// Build a storefront over caller-supplied stores.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if a configured catalog override cannot
    /// be loaded.
    pub fn with_stores(
        config: StorefrontConfig,
        durable: JsonStore,
        session: JsonStore,
    ) -> Result<Self, AppError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_json_file(path)?,
            None => Catalog::builtin()?,
        };
        tracing::info!(
            products = catalog.len(),
            durable = %durable.scope(),
            session = %session.scope(),
            "Storefront ready"
        );

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                config,
                catalog,
                durable,
                session,
            }),
        })
    }

    /// Entirely in-memory storefront with default settings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` only if the bundled catalog is malformed.
    pub fn in_memory() -> Result<Self, AppError> {
        Self::from_config(StorefrontConfig {
            storage: StorageKind::Memory,
            ..StorefrontConfig::default()
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The durable scope (cart, orders, users).
    #[must_use]
    pub fn durable(&self) -> &JsonStore {
        &self.inner.durable
    }

    /// The session scope (signed-in identity).
    #[must_use]
    pub fn session(&self) -> &JsonStore {
        &self.inner.session
    }

    /// Cart manager.
    #[must_use]
    pub fn cart(&self) -> CartService<'_> {
        CartService::new(&self.inner.durable, &self.inner.catalog)
    }

    /// Auth/session manager.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(
            &self.inner.durable,
            &self.inner.session,
            &self.inner.config.login_path,
        )
    }

    /// Order ledger.
    #[must_use]
    pub fn orders(&self) -> OrderLedger<'_> {
        OrderLedger::new(
            &self.inner.durable,
            &self.inner.catalog,
            self.inner.config.delivery_fee,
        )
    }
}

fn durable_store(config: &StorefrontConfig) -> JsonStore {
    match config.storage {
        StorageKind::File => {
            let path = config.durable_path();
            tracing::debug!(path = %path.display(), "Using file-backed durable storage");
            JsonStore::new(file_backend(path, config.quota_bytes), Scope::Durable)
        }
        StorageKind::Memory => JsonStore::new(memory_backend(config.quota_bytes), Scope::Durable),
    }
}

fn file_backend(path: std::path::PathBuf, quota: Option<usize>) -> impl StorageBackend {
    match quota {
        Some(bytes) => FileStorage::with_quota(path, bytes),
        None => FileStorage::new(path),
    }
}

fn memory_backend(quota: Option<usize>) -> impl StorageBackend {
    quota.map_or_else(MemoryStorage::new, MemoryStorage::with_quota)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use yrush_core::{DeliveryInfo, PaymentMethod, ProductId};

    use super::*;
    use crate::models::Fulfillment;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let shop = Storefront::in_memory().unwrap();
        assert_eq!(shop.catalog().len(), 19);

        shop.auth().seed_users().await.unwrap();
        let me = shop
            .auth()
            .login("student@yrush.local", &SecretString::from("student123"))
            .await
            .unwrap();

        shop.cart().add_to_cart(&ProductId::new("DRAW-SHEET-001"), 3);
        let order = shop
            .orders()
            .place_order(
                &me,
                Fulfillment::Delivery(DeliveryInfo::new("ME-A", "7", "12:30 PM").unwrap()),
                PaymentMethod::Cash,
            )
            .unwrap();
        assert_eq!(order.total.display(), "₹20.00");
        assert_eq!(shop.orders().orders_for(&me.email).len(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let shop = Storefront::in_memory().unwrap();
        let other = shop.clone();
        shop.cart().add_to_cart(&ProductId::new("CD-001"), 2);
        assert_eq!(other.cart().cart().quantity(&ProductId::new("CD-001")), Some(2));
    }

    #[test]
    fn test_missing_catalog_override_is_an_error() {
        let config = StorefrontConfig {
            storage: StorageKind::Memory,
            catalog_path: Some("/nonexistent/yrush/catalog.json".into()),
            ..StorefrontConfig::default()
        };
        assert!(matches!(
            Storefront::from_config(config),
            Err(AppError::Catalog(_))
        ));
    }

    #[test]
    fn test_login_path_flows_into_guard() {
        let config = StorefrontConfig {
            storage: StorageKind::Memory,
            login_path: "/signin".to_string(),
            ..StorefrontConfig::default()
        };
        let shop = Storefront::from_config(config).unwrap();
        let err = AppError::from(shop.auth().require_auth().unwrap_err());
        assert!(matches!(err, AppError::Unauthorized(l) if l == "/signin"));
    }
}
