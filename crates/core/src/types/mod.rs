//! Core types for yRush.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod delivery;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use credential::{DigestError, PasswordDigest};
pub use delivery::{DeliveryInfo, DeliveryInfoError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::*;
