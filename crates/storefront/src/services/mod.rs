//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Demo account seeding, password sign-in, session identity
//! - `cart` - Cart mutations and catalog pricing
//! - `orders` - Checkout and the append-only order ledger
//!
//! Services borrow the stores and catalog owned by [`crate::Storefront`];
//! construct them through its accessors.

pub mod auth;
pub mod cart;
pub mod orders;

pub use auth::{AuthError, AuthRejection, AuthService, SeedOutcome};
pub use cart::CartService;
pub use orders::{OrderError, OrderLedger};
