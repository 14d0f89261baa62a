//! yRush Core - Shared types library.
//!
//! This crate provides common types used across all yRush components:
//! - `storefront` - Catalog, cart, session and order ledger over key/value storage
//! - `cli` - Command-line front end driving the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no hashing. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product ids, order tokens, emails,
//!   prices, password digests and account/order enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
