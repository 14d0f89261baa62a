//! Domain models for the storefront.
//!
//! These are the shapes persisted in storage and returned by the services.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartTotals, LineItem};
pub use order::{Fulfillment, Order, OrderSummary};
pub use product::Product;
pub use session::CurrentUser;
pub use user::User;
