//! Integration tests for the yRush storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p yrush-integration-tests
//! ```
//!
//! Each test gets its own scratch data directory under the system temp
//! directory, removed when the [`TestContext`] drops. Storefronts built from
//! one context share those files the way two browser tabs share an origin.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use yrush_storefront::Storefront;
use yrush_storefront::config::{StorageKind, StorefrontConfig};

/// Scratch data directory plus the configuration pointing at it.
pub struct TestContext {
    dir: PathBuf,
    config: StorefrontConfig,
}

impl TestContext {
    /// Fresh context with file-backed storage and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Fresh context, with `tweak` applied to the configuration.
    #[must_use]
    pub fn with_config(tweak: impl FnOnce(&mut StorefrontConfig)) -> Self {
        let dir = std::env::temp_dir().join(format!("yrush-it-{}", uuid::Uuid::new_v4()));
        let mut config = StorefrontConfig {
            storage: StorageKind::File,
            data_dir: dir.clone(),
            ..StorefrontConfig::default()
        };
        tweak(&mut config);
        Self { dir, config }
    }

    /// A new storefront over this context's files (one "tab").
    ///
    /// # Panics
    ///
    /// Panics if the bundled catalog fails to load.
    #[must_use]
    pub fn open(&self) -> Storefront {
        Storefront::with_file_session(self.config.clone()).expect("storefront should open")
    }

    /// The scratch directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The durable storage file.
    #[must_use]
    pub fn durable_path(&self) -> PathBuf {
        self.config.durable_path()
    }

    /// The session storage file.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.config.session_path()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
