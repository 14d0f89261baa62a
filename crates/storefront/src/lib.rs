//! yRush storefront library.
//!
//! The data layer of the campus stationery desk: a static catalog, a cart
//! priced against it, demo sign-in against seeded accounts and an
//! append-only order ledger, all persisted through two key/value scopes
//! (durable and session). Build a [`Storefront`] once and borrow services
//! from it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

pub use error::AppError;
pub use state::Storefront;
