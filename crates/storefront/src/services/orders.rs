//! Order ledger and checkout.
//!
//! Orders are appended to the durable list under [`keys::ORDERS`] and never
//! changed or removed afterwards.

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

use yrush_core::{Email, FulfillmentMethod, OrderToken, PaymentMethod, Price};

use crate::catalog::Catalog;
use crate::models::{CurrentUser, Fulfillment, Order, OrderSummary};
use crate::storage::{JsonStore, StorageError, keys};

use super::CartService;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Nothing priceable in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The ledger write failed; the cart was left as it was.
    #[error("order could not be recorded: {0}")]
    NotRecorded(#[source] StorageError),
}

/// Generate a six-digit order token, uniform over `100000..=999999`.
///
/// Tokens are drawn independently; a repeat of an earlier token is possible
/// and not checked.
#[must_use]
pub fn generate_token() -> OrderToken {
    let value = rand::rng().random_range(OrderToken::MIN..=OrderToken::MAX);
    OrderToken::from_u32(value).unwrap_or(OrderToken::FIRST)
}

/// Append-only order ledger.
pub struct OrderLedger<'a> {
    store: &'a JsonStore,
    catalog: &'a Catalog,
    delivery_fee: Price,
}

impl<'a> OrderLedger<'a> {
    /// Create a new ledger view.
    #[must_use]
    pub const fn new(store: &'a JsonStore, catalog: &'a Catalog, delivery_fee: Price) -> Self {
        Self {
            store,
            catalog,
            delivery_fee,
        }
    }

    /// Every recorded order, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.store.read(keys::ORDERS, Vec::new()).into_value()
    }

    /// Append `order` to the ledger.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated ledger could not be stored.
    pub fn record_order(&self, order: &Order) -> Result<(), StorageError> {
        let mut orders: Vec<Order> = self.orders();
        orders.push(order.clone());
        self.store.try_write(keys::ORDERS, &orders)
    }

    /// Check out the current cart for `customer`.
    ///
    /// Prices the cart, adds the delivery fee for delivery orders, records
    /// the order and empties the cart. The cart is only emptied once the
    /// order is in the ledger.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` if no cart entry resolves to a
    /// catalog product, and `OrderError::NotRecorded` if the ledger write
    /// fails.
    pub fn place_order(
        &self,
        customer: &CurrentUser,
        fulfillment: Fulfillment,
        payment: PaymentMethod,
    ) -> Result<Order, OrderError> {
        let cart = CartService::new(self.store, self.catalog);
        let totals = cart.totals();
        if totals.lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let method = fulfillment.method();
        let delivery_fee = match method {
            FulfillmentMethod::Delivery => self.delivery_fee,
            FulfillmentMethod::Pickup => Price::zero(),
        };

        let order = Order {
            token: generate_token(),
            placed_at: Utc::now(),
            customer: customer.email.clone(),
            lines: totals.lines,
            subtotal: totals.subtotal,
            delivery_fee,
            total: totals.total + delivery_fee,
            fulfillment: method,
            delivery: fulfillment.into_delivery_info(),
            payment,
        };

        if let Err(e) = self.record_order(&order) {
            tracing::warn!(token = %order.token, error = %e, "Order was not recorded, keeping cart");
            return Err(OrderError::NotRecorded(e));
        }
        cart.clear();

        tracing::info!(
            token = %order.token,
            customer = %order.customer,
            total = %order.total,
            fulfillment = %order.fulfillment,
            payment = %order.payment,
            "Order placed"
        );
        Ok(order)
    }

    /// Orders placed by `email`, oldest first.
    #[must_use]
    pub fn orders_for(&self, email: &Email) -> Vec<Order> {
        self.orders()
            .into_iter()
            .filter(|o| &o.customer == email)
            .collect()
    }

    /// Counts and revenue over the whole ledger.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        self.orders()
            .iter()
            .fold(OrderSummary::default(), |mut summary, order| {
                summary.count += 1;
                match order.fulfillment {
                    FulfillmentMethod::Pickup => summary.pickup += 1,
                    FulfillmentMethod::Delivery => summary.delivery += 1,
                }
                summary.revenue = summary.revenue + order.total;
                summary
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use yrush_core::{AccountType, DeliveryInfo, ProductId};

    use super::*;
    use crate::storage::{MemoryStorage, Scope, StorageBackend};

    fn shopper(email: &str) -> CurrentUser {
        CurrentUser {
            email: Email::parse(email).unwrap(),
            name: "Shopper".to_string(),
            account_type: AccountType::Student,
            course: "CSE".to_string(),
        }
    }

    fn to_class() -> Fulfillment {
        Fulfillment::Delivery(DeliveryInfo::new("CSE-B", "42", "After 3rd period").unwrap())
    }

    fn fixture() -> (JsonStore, Catalog) {
        (
            JsonStore::new(MemoryStorage::new(), Scope::Durable),
            Catalog::builtin().unwrap(),
        )
    }

    #[test]
    fn test_generate_token_is_six_digits() {
        for _ in 0..1_000 {
            let token = generate_token().to_string();
            assert_eq!(token.len(), 6);
            assert!(token.chars().all(|c| c.is_ascii_digit()));
            let value: u32 = token.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn test_place_order_pickup() {
        let (store, catalog) = fixture();
        let ledger = OrderLedger::new(&store, &catalog, Price::from_paise(500));
        let cart = CartService::new(&store, &catalog);
        cart.set_quantity(&ProductId::new("DRAW-SHEET-001"), 3);

        let order = ledger
            .place_order(&shopper("student@yrush.local"), Fulfillment::Pickup, PaymentMethod::Cash)
            .unwrap();

        assert_eq!(order.subtotal, Price::from_paise(1500));
        assert!(order.delivery_fee.is_zero());
        assert_eq!(order.total, Price::from_paise(1500));
        assert!(cart.cart().is_empty());
        assert_eq!(ledger.orders(), vec![order]);
    }

    #[test]
    fn test_place_order_delivery_adds_fee() {
        let (store, catalog) = fixture();
        let ledger = OrderLedger::new(&store, &catalog, Price::from_paise(500));
        CartService::new(&store, &catalog).set_quantity(&ProductId::new("CD-001"), 2);

        let order = ledger
            .place_order(&shopper("student@yrush.local"), to_class(), PaymentMethod::Upi)
            .unwrap();

        assert_eq!(order.delivery_fee, Price::from_paise(500));
        assert_eq!(order.total, Price::from_paise(2500));
        assert_eq!(order.payment, PaymentMethod::Upi);
        assert_eq!(order.fulfillment, FulfillmentMethod::Delivery);
        let info = order.delivery.as_ref().unwrap();
        assert_eq!(info.class(), "CSE-B");
        assert_eq!(info.roll(), "42");
        assert_eq!(info.time(), "After 3rd period");
        assert_eq!(ledger.orders()[0].delivery, order.delivery);
    }

    #[test]
    fn test_pickup_order_has_no_delivery_info() {
        let (store, catalog) = fixture();
        let ledger = OrderLedger::new(&store, &catalog, Price::from_paise(500));
        CartService::new(&store, &catalog).set_quantity(&ProductId::new("CD-001"), 1);

        let order = ledger
            .place_order(&shopper("student@yrush.local"), Fulfillment::Pickup, PaymentMethod::Cash)
            .unwrap();

        assert!(order.delivery.is_none());
        let raw = store.read::<Vec<serde_json::Value>>(keys::ORDERS, Vec::new()).into_value();
        assert!(raw[0].get("delivery").is_none());
    }

    #[test]
    fn test_failed_ledger_write_keeps_cart() {
        // Room for the cart entry, not for an order.
        let store = JsonStore::new(MemoryStorage::with_quota(200), Scope::Durable);
        let catalog = Catalog::builtin().unwrap();
        let ledger = OrderLedger::new(&store, &catalog, Price::from_paise(500));
        let cart = CartService::new(&store, &catalog);
        cart.set_quantity(&ProductId::new("DRAW-SHEET-001"), 3);

        let result = ledger.place_order(&shopper("student@yrush.local"), to_class(), PaymentMethod::Upi);

        assert!(matches!(
            result,
            Err(OrderError::NotRecorded(StorageError::QuotaExceeded { .. }))
        ));
        assert_eq!(cart.cart().quantity(&ProductId::new("DRAW-SHEET-001")), Some(3));
        assert!(ledger.orders().is_empty());
    }

    #[test]
    fn test_place_order_empty_cart() {
        let (store, catalog) = fixture();
        let ledger = OrderLedger::new(&store, &catalog, Price::zero());
        CartService::new(&store, &catalog).set_quantity(&ProductId::new("GONE-001"), 2);

        assert!(matches!(
            ledger.place_order(&shopper("a@b.com"), Fulfillment::Pickup, PaymentMethod::Cash),
            Err(OrderError::EmptyCart)
        ));
        assert!(ledger.orders().is_empty());
    }

    #[test]
    fn test_ledger_is_append_only_and_filterable() {
        let (store, catalog) = fixture();
        let ledger = OrderLedger::new(&store, &catalog, Price::from_paise(500));
        let cart = CartService::new(&store, &catalog);

        cart.add_to_cart(&ProductId::new("CD-001"), 1);
        let first = ledger
            .place_order(&shopper("a@b.com"), Fulfillment::Pickup, PaymentMethod::Cash)
            .unwrap();
        cart.add_to_cart(&ProductId::new("DVD-001"), 1);
        let second = ledger
            .place_order(&shopper("c@d.com"), to_class(), PaymentMethod::Upi)
            .unwrap();

        assert_eq!(ledger.orders(), vec![first.clone(), second]);
        assert_eq!(ledger.orders_for(&Email::parse("a@b.com").unwrap()), vec![first]);

        let summary = ledger.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.pickup, 1);
        assert_eq!(summary.delivery, 1);
        assert_eq!(summary.revenue, Price::from_paise(1000 + 1400 + 500));
    }

    #[test]
    fn test_corrupt_ledger_reads_empty() {
        let backend = MemoryStorage::new();
        backend.set_item(keys::ORDERS, "[{\"token\":\"12\"}]").unwrap();
        let store = JsonStore::new(backend, Scope::Durable);
        let catalog = Catalog::builtin().unwrap();
        let ledger = OrderLedger::new(&store, &catalog, Price::zero());

        assert!(ledger.orders().is_empty());
        assert_eq!(ledger.summary(), OrderSummary::default());
    }
}
